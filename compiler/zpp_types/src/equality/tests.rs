use crate::{Field, TypeId, TypePool};
use zpp_ir::StringInterner;

fn pair_struct(pool: &mut TypePool, interner: &StringInterner) -> TypeId {
    let a = interner.intern("a");
    let b = interner.intern("b");
    let ptr = pool.ptr(false, TypeId::I32);
    pool.structure(vec![Field::new(a, TypeId::I32), Field::new(b, ptr)])
}

#[test]
fn separately_built_structs_are_equal() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let first = pair_struct(&mut pool, &interner);
    let second = pair_struct(&mut pool, &interner);
    assert!(first != second);
    assert!(pool.equal(first, second));
    assert!(pool.equal(second, first));
}

#[test]
fn aliases_do_not_affect_equality() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let plain = pair_struct(&mut pool, &interner);
    let named = pair_struct(&mut pool, &interner);
    pool.set_alias(named, "Pair");
    assert!(pool.equal(plain, named));
}

#[test]
fn field_names_and_order_matter() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let (a, b) = (interner.intern("a"), interner.intern("b"));
    let ab = pool.structure(vec![Field::new(a, TypeId::I32), Field::new(b, TypeId::I32)]);
    let ba = pool.structure(vec![Field::new(b, TypeId::I32), Field::new(a, TypeId::I32)]);
    let ab_union = pool.union(vec![Field::new(a, TypeId::I32), Field::new(b, TypeId::I32)]);
    assert!(!pool.equal(ab, ba));
    assert!(!pool.equal(ab, ab_union));
}

#[test]
fn pointer_mutability_and_signedness_matter() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let p = pool.ptr(false, TypeId::I32);
    let p_mut = pool.ptr(true, TypeId::I32);
    let p_u = pool.ptr(false, TypeId::U32);
    assert!(!pool.equal(p, p_mut));
    assert!(!pool.equal(p, p_u));
    assert!(!pool.equal(TypeId::I64, TypeId::U64));
    assert!(!pool.equal(TypeId::F32, TypeId::F64));
}

#[test]
fn arrays_compare_length_and_element() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let a4 = pool.array(4, TypeId::U8);
    let b4 = pool.array(4, TypeId::U8);
    let a5 = pool.array(5, TypeId::U8);
    assert!(pool.equal(a4, b4));
    assert!(!pool.equal(a4, a5));
}

#[test]
fn recursive_structs_through_pointers_terminate() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let (value, next) = (interner.intern("value"), interner.intern("next"));

    let build = |pool: &mut TypePool| {
        let slot = pool.placeholder();
        let ptr = pool.ptr(false, slot);
        let body = pool.structure(vec![Field::new(value, TypeId::I32), Field::new(next, ptr)]);
        pool.complete(slot, body, "Node");
        slot
    };
    let first = build(&mut pool);
    let second = build(&mut pool);

    assert!(pool.equal(first, first));
    assert!(pool.equal(first, second));
    assert!(pool.equal(second, first));
}

#[test]
fn fn_types_compare_params_and_return() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let f1 = pool.function(vec![TypeId::I32], TypeId::VOID);
    let f2 = pool.function(vec![TypeId::I32], TypeId::VOID);
    let f3 = pool.function(vec![TypeId::I32, TypeId::I32], TypeId::VOID);
    assert!(pool.equal(f1, f2));
    assert!(!pool.equal(f1, f3));
    assert!(pool.equal_lists(&[f1, TypeId::U8], &[f2, TypeId::U8]));
    assert!(!pool.equal_lists(&[f1], &[f1, f1]));
}

#[test]
fn distinct_placeholders_are_not_equal() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let a = pool.placeholder();
    let b = pool.placeholder();
    assert!(pool.equal(a, a));
    assert!(!pool.equal(a, b));
}

#[test]
fn equal_types_hash_equally() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let first = pair_struct(&mut pool, &interner);
    let second = pair_struct(&mut pool, &interner);
    assert_eq!(
        pool.structural_hash(&[first, TypeId::U8]),
        pool.structural_hash(&[second, TypeId::U8])
    );
}
