//! Binary and unary operators, with comptime folding.

use zpp_diagnostic::ErrorCode;
use zpp_ir::{BinaryOp, Expr, Pos, UnaryOp};
use zpp_lir::{BinOp, CastOp, CmpPred, Const};
use zpp_types::TypeId;

use super::literals::float_to_int;
use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::value::{ConstValue, RealData};

impl Generator {
    pub(super) fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        expected: Option<TypeId>,
        pos: Pos,
    ) -> GenResult<RealData> {
        if op.is_short_circuit() {
            return self.lower_short_circuit(op, lhs, rhs, expected, pos);
        }

        let mut left = self.eval_expr_inner(lhs, None)?;
        let mut right = self.eval_expr_inner(rhs, None)?;
        let left_coercible = left.is_coercible();
        let right_coercible = right.is_coercible();

        if left.is_comptime() && right.is_comptime() {
            if left_coercible && right_coercible {
                self.expect_numeric_value(&left, lhs.pos)?;
                self.expect_numeric_value(&right, rhs.pos)?;
            } else {
                if left_coercible {
                    left = self.retype_literal(&left, right.ty, lhs.pos)?;
                }
                if right_coercible {
                    right = self.retype_literal(&right, left.ty, rhs.pos)?;
                }
                self.expect_numeric(&left, lhs.pos)?;
                self.expect_numeric(&right, rhs.pos)?;
                self.expect_compatible(left.ty, right.ty, pos)?;
            }
            return self.fold_binary(op, &left, &right, left_coercible && right_coercible, expected, pos);
        }

        let ptr_allowed = matches!(op, BinaryOp::Eq | BinaryOp::NotEq);
        for (data, expr) in [(&left, lhs), (&right, rhs)] {
            if ptr_allowed && self.pool.is_ptr(data.ty) {
                continue;
            }
            self.expect_numeric(data, expr.pos)?;
        }
        if left.is_comptime() {
            left = self.retype_literal(&left, right.ty, lhs.pos)?;
        }
        if right.is_comptime() {
            right = self.retype_literal(&right, left.ty, rhs.pos)?;
        }
        self.expect_compatible(left.ty, right.ty, pos)?;
        Ok(self.emit_binary_op(op, &left, &right, expected))
    }

    pub(crate) fn emit_binary_op(
        &mut self,
        op: BinaryOp,
        left: &RealData,
        right: &RealData,
        expected: Option<TypeId>,
    ) -> RealData {
        let ty = left.ty;
        let float = self.pool.is_float(ty);
        let signed = !self.pool.is_int(ty) || self.pool.is_signed(ty);
        let (l, r) = (left.value.clone(), right.value.clone());

        if op.is_comparison() {
            let pred = compare_pred(op, float, signed);
            let result_ty = self.int_or(expected, TypeId::U8);
            let builder = self.builder();
            let bit = builder.emit_cmp(pred, l, r);
            let value = builder.emit_cast(CastOp::ZExt, bit.into(), result_ty);
            return RealData::runtime(result_ty, value);
        }

        let bin = arith_op(op, float, signed);
        RealData::runtime(ty, self.builder().emit_binary(bin, ty, l, r))
    }

    /// Fold two comptime operands. The result stays coercible only when
    /// both operands were.
    fn fold_binary(
        &self,
        op: BinaryOp,
        left: &RealData,
        right: &RealData,
        coercible: bool,
        expected: Option<TypeId>,
        pos: Pos,
    ) -> GenResult<RealData> {
        let (Some(l), Some(r)) = (left.numeric(), right.numeric()) else {
            return Err(error::expected_kind("numeric expression", &self.ty_name(left.ty), pos));
        };

        let (value, ty) = if op.is_comparison() {
            let truth = compare_values(op, l, r);
            (
                ConstValue::Int(i128::from(truth)),
                self.int_or(expected, TypeId::U8),
            )
        } else {
            let value = fold_arith(op, l, r).ok_or_else(|| {
                GenError::new(
                    ErrorCode::DivisionByZero,
                    "division by zero in comptime expression",
                    pos,
                )
            })?;
            let ty = match expected.filter(|&t| self.pool.is_numeric(t)) {
                Some(t) if coercible => t,
                _ if coercible && self.pool.is_float(right.ty) => right.ty,
                _ => left.ty,
            };
            (value, ty)
        };

        if matches!(value, ConstValue::Float(_)) && self.pool.is_int(ty) {
            return Err(float_to_int(pos));
        }
        Ok(if coercible {
            RealData::literal(&self.pool, ty, value)
        } else {
            RealData::scalar(&self.pool, ty, &value).fixed()
        })
    }

    /// Give a comptime operand the type of the other operand.
    fn retype_literal(&self, data: &RealData, ty: TypeId, pos: Pos) -> GenResult<RealData> {
        let Some(value) = data.numeric() else {
            return Ok(data.clone());
        };
        if matches!(value, ConstValue::Float(_)) && self.pool.is_int(ty) {
            return Err(float_to_int(pos));
        }
        Ok(if data.coerced {
            RealData::scalar(&self.pool, ty, value).fixed()
        } else {
            RealData::literal(&self.pool, ty, value.clone())
        })
    }

    fn expect_numeric_value(&self, data: &RealData, pos: Pos) -> GenResult<()> {
        if data.numeric().is_some() {
            return Ok(());
        }
        Err(error::expected_kind("numeric expression", &self.ty_name(data.ty), pos))
    }

    pub(crate) fn expect_compatible(&self, lhs: TypeId, rhs: TypeId, pos: Pos) -> GenResult<()> {
        if self.pool.equal(lhs, rhs) {
            return Ok(());
        }
        Err(error::incompatible(&self.ty_name(lhs), &self.ty_name(rhs), pos))
    }

    pub(super) fn eval_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
        expected: Option<TypeId>,
    ) -> GenResult<RealData> {
        match op {
            UnaryOp::Deref => self.eval_deref(operand, expected),
            UnaryOp::Not => self.eval_not(operand, expected),
            UnaryOp::Plus => {
                let data = self.eval_expr(operand, expected)?;
                self.expect_numeric(&data, operand.pos)?;
                Ok(data)
            }
            UnaryOp::Neg => {
                let data = self.eval_expr(operand, expected)?;
                self.expect_numeric(&data, operand.pos)?;
                if let Some(value) = data.numeric() {
                    let negated = match value {
                        ConstValue::Int(v) => ConstValue::Int(-v),
                        ConstValue::Float(f) => ConstValue::Float(-f),
                        ConstValue::Str(_) => value.clone(),
                    };
                    return Ok(if data.coerced {
                        RealData::scalar(&self.pool, data.ty, &negated).fixed()
                    } else {
                        RealData::literal(&self.pool, data.ty, negated)
                    });
                }
                let (op, zero) = if self.pool.is_float(data.ty) {
                    (
                        BinOp::FSub,
                        Const::Float {
                            ty: data.ty,
                            value: -0.0,
                        },
                    )
                } else {
                    (BinOp::Sub, Const::Int { ty: data.ty, value: 0 })
                };
                let value = self
                    .builder()
                    .emit_binary(op, data.ty, zero.into(), data.value.clone());
                Ok(RealData::runtime(data.ty, value))
            }
        }
    }

    fn eval_not(&mut self, operand: &Expr, expected: Option<TypeId>) -> GenResult<RealData> {
        let ty = self.int_or(expected, TypeId::U8);
        let data = self.eval_expr(operand, Some(ty))?;
        self.expect_int(&data, operand.pos)?;
        if let Some(v) = data.as_int() {
            let folded = RealData::scalar(&self.pool, data.ty, &ConstValue::Int(i128::from(v == 0)));
            return Ok(if data.coerced { folded.fixed() } else { folded });
        }
        let zero = Const::Int { ty: data.ty, value: 0 };
        let builder = self.builder();
        let bit = builder.emit_cmp(CmpPred::Eq, data.value.clone(), zero.into());
        let value = builder.emit_cast(CastOp::ZExt, bit.into(), data.ty);
        Ok(RealData::runtime(data.ty, value))
    }

    fn eval_deref(&mut self, operand: &Expr, expected: Option<TypeId>) -> GenResult<RealData> {
        let expected = expected.map(|ty| self.pool.ptr(false, ty));
        let ptr = self.eval_expr(operand, expected)?;
        let Some((mutable, pointee)) = self.pool.pointee(ptr.ty) else {
            return Err(error::expected_kind(
                "pointer expression",
                &self.ty_name(ptr.ty),
                operand.pos,
            ));
        };
        let value = self.builder().emit_load(pointee, ptr.value);
        Ok(RealData::runtime(pointee, value).read_only(!mutable))
    }
}

fn arith_op(op: BinaryOp, float: bool, signed: bool) -> BinOp {
    match (op, float) {
        (BinaryOp::Add, false) => BinOp::Add,
        (BinaryOp::Sub, false) => BinOp::Sub,
        (BinaryOp::Mul, false) => BinOp::Mul,
        (BinaryOp::Div, false) if signed => BinOp::SDiv,
        (BinaryOp::Div, false) => BinOp::UDiv,
        (BinaryOp::Rem, false) if signed => BinOp::SRem,
        (BinaryOp::Rem, false) => BinOp::URem,
        (BinaryOp::Sub, true) => BinOp::FSub,
        (BinaryOp::Mul, true) => BinOp::FMul,
        (BinaryOp::Div, true) => BinOp::FDiv,
        (BinaryOp::Rem, true) => BinOp::FRem,
        _ => BinOp::FAdd,
    }
}

fn compare_pred(op: BinaryOp, float: bool, signed: bool) -> CmpPred {
    match (op, float, signed) {
        (BinaryOp::Eq, false, _) => CmpPred::Eq,
        (BinaryOp::NotEq, false, _) => CmpPred::Ne,
        (BinaryOp::Lt, false, true) => CmpPred::Slt,
        (BinaryOp::Lt, false, false) => CmpPred::Ult,
        (BinaryOp::Gt, false, true) => CmpPred::Sgt,
        (BinaryOp::Gt, false, false) => CmpPred::Ugt,
        (BinaryOp::LtEq, false, true) => CmpPred::Sle,
        (BinaryOp::LtEq, false, false) => CmpPred::Ule,
        (BinaryOp::GtEq, false, true) => CmpPred::Sge,
        (BinaryOp::GtEq, false, false) => CmpPred::Uge,
        (BinaryOp::Eq, true, _) => CmpPred::FEq,
        (BinaryOp::NotEq, true, _) => CmpPred::FNe,
        (BinaryOp::Lt, true, _) => CmpPred::FLt,
        (BinaryOp::Gt, true, _) => CmpPred::FGt,
        (BinaryOp::LtEq, true, _) => CmpPred::FLe,
        _ => CmpPred::FGe,
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "comptime comparisons follow runtime float semantics"
)]
fn compare_values(op: BinaryOp, l: &ConstValue, r: &ConstValue) -> bool {
    use std::cmp::Ordering;

    let ordering = match (l, r) {
        (ConstValue::Int(a), ConstValue::Int(b)) => Some(a.cmp(b)),
        (ConstValue::Int(a), ConstValue::Float(b)) => (*a as f64).partial_cmp(b),
        (ConstValue::Float(a), ConstValue::Int(b)) => a.partial_cmp(&(*b as f64)),
        (ConstValue::Float(a), ConstValue::Float(b)) => a.partial_cmp(b),
        _ => None,
    };
    // NaN compares unequal to everything.
    let Some(ordering) = ordering else {
        return op == BinaryOp::NotEq;
    };
    match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::NotEq => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        _ => ordering != Ordering::Less,
    }
}

/// Integer arithmetic in `i128`, truncating division; `None` on division by
/// zero. Any float operand makes the whole operation a float one.
#[expect(
    clippy::cast_precision_loss,
    reason = "comptime arithmetic follows runtime float semantics"
)]
fn fold_arith(op: BinaryOp, l: &ConstValue, r: &ConstValue) -> Option<ConstValue> {
    let as_float = |v: &ConstValue| match v {
        ConstValue::Int(i) => *i as f64,
        ConstValue::Float(f) => *f,
        ConstValue::Str(_) => 0.0,
    };
    match (l, r) {
        (ConstValue::Int(a), ConstValue::Int(b)) => {
            let value = match op {
                BinaryOp::Add => a.wrapping_add(*b),
                BinaryOp::Sub => a.wrapping_sub(*b),
                BinaryOp::Mul => a.wrapping_mul(*b),
                BinaryOp::Div => a.checked_div(*b)?,
                _ => a.checked_rem(*b)?,
            };
            Some(ConstValue::Int(value))
        }
        _ => {
            let (a, b) = (as_float(l), as_float(r));
            let value = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div if b == 0.0 => return None,
                BinaryOp::Div => a / b,
                _ if b == 0.0 => return None,
                _ => a % b,
            };
            Some(ConstValue::Float(value))
        }
    }
}

#[cfg(test)]
mod tests;
