//! Values produced by expression evaluation.

use zpp_lir::{Const, Operand};
use zpp_types::{TypeId, TypePool};

/// A compile-time known scalar.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Int(i128),
    Float(f64),
    Str(String),
}

/// Result of evaluating an expression: its type, the IR operand holding it,
/// and its compile-time value when known.
#[derive(Clone, Debug)]
pub struct RealData {
    pub ty: TypeId,
    pub value: Operand,
    pub comptime: Option<ConstValue>,
    /// Set once the type is fixed; literals start out coercible.
    pub coerced: bool,
    /// Read through an immutable pointer.
    pub readonly: bool,
}

impl RealData {
    pub fn runtime(ty: TypeId, value: impl Into<Operand>) -> Self {
        RealData {
            ty,
            value: value.into(),
            comptime: None,
            coerced: false,
            readonly: false,
        }
    }

    pub fn void() -> Self {
        RealData::runtime(TypeId::VOID, Operand::Void)
    }

    /// Comptime scalar of type `ty`, as an int or float depending on `ty`.
    pub fn scalar(pool: &TypePool, ty: TypeId, value: &ConstValue) -> Self {
        let value = convert_scalar(pool, value, ty);
        let operand = scalar_const(pool, ty, &value);
        RealData {
            ty,
            value: operand.into(),
            comptime: Some(value),
            coerced: false,
            readonly: false,
        }
    }

    /// Untyped literal tentatively typed `ty`.
    ///
    /// The operand holds the value converted to `ty`, while the comptime
    /// value stays exact until the type is settled.
    #[expect(
        clippy::cast_precision_loss,
        reason = "float literals hold integers as f64, like runtime conversion"
    )]
    pub fn literal(pool: &TypePool, ty: TypeId, value: ConstValue) -> Self {
        let operand = scalar_const(pool, ty, &convert_scalar(pool, &value, ty));
        let exact = match value {
            ConstValue::Int(v) if pool.is_float(ty) => ConstValue::Float(v as f64),
            other => other,
        };
        RealData {
            ty,
            value: operand.into(),
            comptime: Some(exact),
            coerced: false,
            readonly: false,
        }
    }

    /// Fix the type, converting an exact literal value to it.
    #[must_use]
    pub fn settle(mut self, pool: &TypePool) -> Self {
        if let Some(value) = self.numeric().map(|v| convert_scalar(pool, v, self.ty)) {
            self.comptime = Some(value);
        }
        self.coerced = true;
        self
    }

    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.coerced = true;
        self
    }

    #[must_use]
    pub fn read_only(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    #[inline]
    pub fn is_comptime(&self) -> bool {
        self.comptime.is_some()
    }

    /// Untyped literal whose type may still follow the other operand.
    #[inline]
    pub fn is_coercible(&self) -> bool {
        self.comptime.is_some() && !self.coerced
    }

    pub fn as_int(&self) -> Option<i128> {
        match self.comptime {
            Some(ConstValue::Int(v)) => Some(v),
            _ => None,
        }
    }

    /// Numeric comptime value, if any. Strings have none.
    pub fn numeric(&self) -> Option<&ConstValue> {
        self.comptime
            .as_ref()
            .filter(|v| !matches!(v, ConstValue::Str(_)))
    }

    /// Truthiness of a comptime condition.
    pub fn comptime_truth(&self) -> Option<bool> {
        match self.comptime {
            Some(ConstValue::Int(v)) => Some(v != 0),
            Some(ConstValue::Float(v)) => Some(v != 0.0),
            _ => None,
        }
    }
}

/// Wrap `value` into the range of an integer of `bits` width.
///
/// Signed results are sign-extended back into `i128`.
pub fn wrap_int(value: i128, bits: u8, signed: bool) -> i128 {
    if bits >= 128 {
        return value;
    }
    let mask = (1i128 << bits) - 1;
    let low = value & mask;
    if signed && low >> (bits - 1) & 1 == 1 {
        low - (1i128 << bits)
    } else {
        low
    }
}

/// Convert a numeric comptime value to the representation `ty` uses.
///
/// Floats truncate toward zero into integers; integers wrap to the target
/// width; `f32` targets round through single precision. Non-numeric types
/// keep the value as is.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "comptime conversions follow the target's numeric semantics"
)]
pub fn convert_scalar(pool: &TypePool, value: &ConstValue, ty: TypeId) -> ConstValue {
    let bits = pool.bits(ty).unwrap_or(64);
    if pool.is_int(ty) {
        let signed = pool.is_signed(ty);
        match value {
            ConstValue::Int(v) => ConstValue::Int(wrap_int(*v, bits, signed)),
            ConstValue::Float(f) => ConstValue::Int(wrap_int(*f as i128, bits, signed)),
            ConstValue::Str(_) => value.clone(),
        }
    } else if pool.is_float(ty) {
        let f = match value {
            ConstValue::Int(v) => *v as f64,
            ConstValue::Float(f) => *f,
            ConstValue::Str(_) => return value.clone(),
        };
        ConstValue::Float(if bits == 32 { f64::from(f as f32) } else { f })
    } else {
        value.clone()
    }
}

/// IR constant for a numeric comptime value of type `ty`.
///
/// Pointers only ever hold the null address as a scalar.
pub fn scalar_const(pool: &TypePool, ty: TypeId, value: &ConstValue) -> Const {
    match value {
        _ if pool.is_ptr(ty) => Const::Null { ty },
        ConstValue::Int(v) => Const::Int { ty, value: *v },
        ConstValue::Float(f) => Const::Float { ty, value: *f },
        ConstValue::Str(_) => Const::Undef { ty },
    }
}

#[cfg(test)]
mod tests;
