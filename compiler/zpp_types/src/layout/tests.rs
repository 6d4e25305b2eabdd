use crate::{Field, TypeId, TypePool};
use pretty_assertions::assert_eq;
use zpp_ir::StringInterner;

#[test]
fn scalar_sizes() {
    let interner = StringInterner::new();
    let pool = TypePool::new(&interner);
    assert_eq!(pool.size_of(TypeId::I8), 1);
    assert_eq!(pool.size_of(TypeId::U16), 2);
    assert_eq!(pool.size_of(TypeId::I32), 4);
    assert_eq!(pool.size_of(TypeId::U64), 8);
    assert_eq!(pool.size_of(TypeId::F32), 4);
    assert_eq!(pool.size_of(TypeId::CSTRING), 8);
    assert_eq!(pool.size_of(TypeId::STRING), 16);
}

#[test]
fn struct_fields_are_aligned() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let (a, b, c) = (interner.intern("a"), interner.intern("b"), interner.intern("c"));
    let s = pool.structure(vec![
        Field::new(a, TypeId::U8),
        Field::new(b, TypeId::I32),
        Field::new(c, TypeId::U8),
    ]);
    assert_eq!(pool.size_of(s), 12);
    assert_eq!(pool.align_of(s), 4);
}

#[test]
fn union_is_as_large_as_its_largest_member() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let (a, b) = (interner.intern("a"), interner.intern("b"));
    let u = pool.union(vec![Field::new(a, TypeId::U8), Field::new(b, TypeId::I64)]);
    assert_eq!(pool.size_of(u), 8);

    let arr = pool.array(3, TypeId::I16);
    assert_eq!(pool.size_of(arr), 6);
}

#[test]
fn self_containment_by_value_is_found() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let (x, inner) = (interner.intern("x"), interner.intern("inner"));

    let slot = pool.placeholder();
    let body = pool.structure(vec![Field::new(x, TypeId::I32), Field::new(inner, slot)]);
    pool.complete(slot, body, "Bad");

    assert_eq!(pool.find_recursive_layout(slot), Some(slot));
}

#[test]
fn containment_through_array_is_found() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let items = interner.intern("items");

    let slot = pool.placeholder();
    let arr = pool.array(2, slot);
    let body = pool.structure(vec![Field::new(items, arr)]);
    pool.complete(slot, body, "Bad");

    assert_eq!(pool.find_recursive_layout(slot), Some(slot));
}

#[test]
fn containment_through_pointer_is_fine() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let next = interner.intern("next");

    let slot = pool.placeholder();
    let ptr = pool.ptr(false, slot);
    let body = pool.structure(vec![Field::new(next, ptr)]);
    pool.complete(slot, body, "Node");

    assert_eq!(pool.find_recursive_layout(slot), None);
    assert_eq!(pool.size_of(slot), 8);
}
