//! `expr as T`.

use zpp_diagnostic::ErrorCode;
use zpp_ir::{Expr, Pos, TypeExpr};
use zpp_lir::CastOp;
use zpp_types::{TypeId, TypePool};

use crate::context::Generator;
use crate::error::{GenError, GenResult};
use crate::value::RealData;

impl Generator {
    pub(super) fn eval_cast(&mut self, expr: &Expr, ty: &TypeExpr, pos: Pos) -> GenResult<RealData> {
        let target = self.eval_type(ty)?;
        let data = self.eval_expr(expr, Some(target))?;

        if self.pool.is_ptr(data.ty) && self.pool.is_ptr(target) {
            return Ok(RealData { ty: target, ..data });
        }
        if self.pool.is_numeric(data.ty) && self.pool.is_numeric(target) {
            return Ok(self.numeric_cast(data, target));
        }
        Err(GenError::new(
            ErrorCode::InvalidCast,
            format!(
                "invalid cast from `{}` to `{}`",
                self.ty_name(data.ty),
                self.ty_name(target)
            ),
            pos,
        ))
    }

    /// Convert between numeric types; comptime values are folded.
    pub(crate) fn numeric_cast(&mut self, data: RealData, target: TypeId) -> RealData {
        if let Some(value) = data.numeric() {
            return RealData::scalar(&self.pool, target, value).fixed();
        }
        match numeric_cast_op(&self.pool, data.ty, target) {
            Some(op) => {
                let value = self.builder().emit_cast(op, data.value, target);
                RealData::runtime(target, value)
            }
            None => RealData { ty: target, ..data },
        }
    }
}

/// Instruction converting a `from` value to `to`; `None` when the
/// representation is unchanged.
pub(crate) fn numeric_cast_op(pool: &TypePool, from: TypeId, to: TypeId) -> Option<CastOp> {
    let from_bits = pool.bits(from).unwrap_or(0);
    let to_bits = pool.bits(to).unwrap_or(0);
    match (pool.is_float(from), pool.is_float(to)) {
        (true, true) if to_bits > from_bits => Some(CastOp::FpExt),
        (true, true) if to_bits < from_bits => Some(CastOp::FpTrunc),
        (true, true) => None,
        (true, false) if pool.is_signed(to) => Some(CastOp::FpToSi),
        (true, false) => Some(CastOp::FpToUi),
        (false, true) if pool.is_signed(from) => Some(CastOp::SiToFp),
        (false, true) => Some(CastOp::UiToFp),
        (false, false) if to_bits > from_bits && pool.is_signed(from) => Some(CastOp::SExt),
        (false, false) if to_bits > from_bits => Some(CastOp::ZExt),
        (false, false) if to_bits < from_bits => Some(CastOp::Trunc),
        (false, false) => None,
    }
}
