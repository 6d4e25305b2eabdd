//! Literals.
//!
//! Numeric literals take their type from the expectation when it fits and
//! stay coercible, so the other operand of a binary expression can still
//! retype them. Their comptime value is kept exact until then.

use zpp_diagnostic::ErrorCode;
use zpp_ir::Pos;
use zpp_lir::Const;
use zpp_types::TypeId;

use crate::context::Generator;
use crate::error::{GenError, GenResult};
use crate::value::{ConstValue, RealData};

impl Generator {
    pub(super) fn eval_int(&self, value: u64, expected: Option<TypeId>) -> RealData {
        let ty = self.numeric_or(expected, TypeId::I32);
        RealData::literal(&self.pool, ty, ConstValue::Int(i128::from(value)))
    }

    /// Float literals never take an integer type; folding them into one is
    /// rejected where it happens.
    pub(super) fn eval_float(&self, value: f64, expected: Option<TypeId>) -> RealData {
        let ty = expected
            .filter(|&ty| self.pool.is_float(ty))
            .unwrap_or(TypeId::F32);
        RealData::literal(&self.pool, ty, ConstValue::Float(value))
    }

    pub(super) fn eval_char(&self, c: char, expected: Option<TypeId>) -> RealData {
        let ty = self.int_or(expected, TypeId::U8);
        RealData::scalar(&self.pool, ty, &ConstValue::Int(i128::from(u32::from(c))))
    }

    pub(super) fn eval_bool(&self, value: bool, expected: Option<TypeId>) -> RealData {
        let ty = self.numeric_or(expected, TypeId::U8);
        RealData::scalar(&self.pool, ty, &ConstValue::Int(i128::from(value)))
    }

    /// `(ptr: *u8, len: u64)` over an interned copy of `text`.
    pub(super) fn eval_str(&mut self, text: &str) -> RealData {
        let ptr = self.intern_string(text);
        let value = Const::Struct {
            ty: TypeId::STRING,
            fields: vec![
                ptr,
                Const::Int {
                    ty: TypeId::U64,
                    value: text.len() as i128,
                },
            ],
        };
        RealData {
            ty: TypeId::STRING,
            value: value.into(),
            comptime: Some(ConstValue::Str(text.to_string())),
            coerced: true,
            readonly: false,
        }
    }

    pub(super) fn eval_null(&self, expected: Option<TypeId>) -> RealData {
        let ty = expected
            .filter(|&ty| self.pool.is_numeric(ty) || self.pool.is_ptr(ty))
            .unwrap_or(TypeId::CSTRING);
        RealData::scalar(&self.pool, ty, &ConstValue::Int(0))
    }

    pub(super) fn eval_undefined(&self, expected: Option<TypeId>, pos: Pos) -> GenResult<RealData> {
        let Some(ty) = expected else {
            return Err(GenError::new(
                ErrorCode::TypeMismatch,
                "expression has no clear type here",
                pos,
            ));
        };
        Ok(RealData::runtime(ty, Const::Undef { ty }))
    }
}

#[cold]
pub(super) fn float_to_int(pos: Pos) -> GenError {
    GenError::new(
        ErrorCode::TypeMismatch,
        "unable to coerce float constant expression to int type",
        pos,
    )
}
