use pretty_assertions::assert_eq;
use zpp_ir::BinaryOp;
use zpp_lir::{BinOp, CmpPred};

use super::{arith_op, compare_pred, compare_values, fold_arith};
use crate::value::ConstValue;

#[test]
fn fold_int_arithmetic_truncates_division() {
    let l = ConstValue::Int(-7);
    let r = ConstValue::Int(2);
    assert_eq!(fold_arith(BinaryOp::Div, &l, &r), Some(ConstValue::Int(-3)));
    assert_eq!(fold_arith(BinaryOp::Rem, &l, &r), Some(ConstValue::Int(-1)));
    assert_eq!(fold_arith(BinaryOp::Mul, &l, &r), Some(ConstValue::Int(-14)));
}

#[test]
fn fold_division_by_zero_is_none() {
    let zero = ConstValue::Int(0);
    assert_eq!(fold_arith(BinaryOp::Div, &ConstValue::Int(1), &zero), None);
    assert_eq!(fold_arith(BinaryOp::Rem, &ConstValue::Int(1), &zero), None);
    assert_eq!(
        fold_arith(BinaryOp::Div, &ConstValue::Float(1.0), &ConstValue::Float(0.0)),
        None
    );
}

#[test]
fn fold_mixed_operands_become_float() {
    let folded = fold_arith(BinaryOp::Add, &ConstValue::Int(1), &ConstValue::Float(0.5));
    assert_eq!(folded, Some(ConstValue::Float(1.5)));
}

#[test]
fn compare_values_orders_ints_and_floats() {
    let one = ConstValue::Int(1);
    let two = ConstValue::Float(2.0);
    assert!(compare_values(BinaryOp::Lt, &one, &two));
    assert!(compare_values(BinaryOp::NotEq, &one, &two));
    assert!(!compare_values(BinaryOp::GtEq, &one, &two));
    assert!(compare_values(BinaryOp::LtEq, &one, &ConstValue::Int(1)));
}

#[test]
fn nan_is_only_unequal() {
    let nan = ConstValue::Float(f64::NAN);
    assert!(compare_values(BinaryOp::NotEq, &nan, &nan));
    assert!(!compare_values(BinaryOp::Eq, &nan, &nan));
    assert!(!compare_values(BinaryOp::Lt, &nan, &ConstValue::Int(0)));
}

#[test]
fn signedness_selects_instruction() {
    assert_eq!(arith_op(BinaryOp::Div, false, true), BinOp::SDiv);
    assert_eq!(arith_op(BinaryOp::Div, false, false), BinOp::UDiv);
    assert_eq!(arith_op(BinaryOp::Rem, false, false), BinOp::URem);
    assert_eq!(arith_op(BinaryOp::Add, true, true), BinOp::FAdd);
    assert_eq!(compare_pred(BinaryOp::Lt, false, false), CmpPred::Ult);
    assert_eq!(compare_pred(BinaryOp::GtEq, false, true), CmpPred::Sge);
    assert_eq!(compare_pred(BinaryOp::Eq, true, true), CmpPred::FEq);
}
