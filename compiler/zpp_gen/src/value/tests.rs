use super::{convert_scalar, wrap_int, ConstValue, RealData};
use pretty_assertions::assert_eq;
use zpp_ir::StringInterner;
use zpp_lir::{Const, Operand};
use zpp_types::{TypeId, TypePool};

#[test]
fn wrap_int_wraps_to_width() {
    assert_eq!(wrap_int(300, 8, false), 44);
    assert_eq!(wrap_int(255, 8, true), -1);
    assert_eq!(wrap_int(-1, 16, false), 65535);
    assert_eq!(wrap_int(127, 8, true), 127);
    assert_eq!(wrap_int(i128::from(u64::MAX) + 1, 64, false), 0);
}

#[test]
fn convert_scalar_follows_target_type() {
    let interner = StringInterner::new();
    let pool = TypePool::new(&interner);

    assert_eq!(
        convert_scalar(&pool, &ConstValue::Int(-1), TypeId::U8),
        ConstValue::Int(255)
    );
    assert_eq!(
        convert_scalar(&pool, &ConstValue::Float(3.9), TypeId::I32),
        ConstValue::Int(3)
    );
    assert_eq!(
        convert_scalar(&pool, &ConstValue::Int(2), TypeId::F64),
        ConstValue::Float(2.0)
    );
    assert_eq!(
        convert_scalar(&pool, &ConstValue::Float(0.1), TypeId::F32),
        ConstValue::Float(f64::from(0.1f32))
    );
}

#[test]
fn scalar_literals_are_coercible_until_fixed() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);

    let data = RealData::scalar(&pool, TypeId::I16, &ConstValue::Int(7));
    assert!(data.is_coercible());
    assert_eq!(data.as_int(), Some(7));
    assert_eq!(
        data.value,
        Operand::Const(Const::Int {
            ty: TypeId::I16,
            value: 7
        })
    );
    assert!(!data.fixed().is_coercible());

    let ptr = pool.ptr(true, TypeId::I32);
    let null = RealData::scalar(&pool, ptr, &ConstValue::Int(0));
    assert_eq!(null.value, Operand::Const(Const::Null { ty: ptr }));
    assert_eq!(null.comptime_truth(), Some(false));
}

#[test]
fn literals_stay_exact_until_settled() {
    let interner = StringInterner::new();
    let pool = TypePool::new(&interner);

    let data = RealData::literal(&pool, TypeId::I32, ConstValue::Int(3_000_000_000));
    assert!(data.is_coercible());
    assert_eq!(data.as_int(), Some(3_000_000_000));
    assert_eq!(
        data.value,
        Operand::Const(Const::Int {
            ty: TypeId::I32,
            value: -1_294_967_296
        })
    );

    let settled = data.settle(&pool);
    assert!(!settled.is_coercible());
    assert_eq!(settled.as_int(), Some(-1_294_967_296));
}
