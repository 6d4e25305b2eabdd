use crate::{Field, TypeId, TypePool};
use pretty_assertions::assert_eq;
use zpp_ir::StringInterner;

#[test]
fn renders_scalars_and_pointers() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let p = pool.ptr(true, TypeId::I32);
    let pp = pool.ptr(false, p);
    assert_eq!(pool.display(TypeId::U16, &interner).to_string(), "u16");
    assert_eq!(pool.display(TypeId::F64, &interner).to_string(), "f64");
    assert_eq!(pool.display(pp, &interner).to_string(), "**mut i32");
    assert_eq!(pool.display(TypeId::CSTRING, &interner).to_string(), "*u8");
}

#[test]
fn renders_aggregates() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let (a, b) = (interner.intern("a"), interner.intern("b"));
    let arr = pool.array(4, TypeId::U8);
    let s = pool.structure(vec![Field::new(a, TypeId::I32), Field::new(b, arr)]);
    let u = pool.union(vec![Field::new(a, TypeId::I32)]);
    let f = pool.function(vec![TypeId::I32, TypeId::U8], TypeId::VOID);

    assert_eq!(pool.display(s, &interner).to_string(), "(a: i32, b: [4 x u8])");
    assert_eq!(pool.display(u, &interner).to_string(), "union(a: i32)");
    assert_eq!(pool.display(f, &interner).to_string(), "fn(i32, u8) -> void");
    assert_eq!(pool.display(TypeId::STRING, &interner).to_string(), "String");
}

#[test]
fn aliases_stop_recursive_rendering() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let next = interner.intern("next");
    let slot = pool.placeholder();
    let ptr = pool.ptr(false, slot);
    let body = pool.structure(vec![Field::new(next, ptr)]);
    pool.complete(slot, body, "Node");

    assert_eq!(pool.display(ptr, &interner).to_string(), "*Node");
    assert_eq!(pool.display_list(&[ptr, TypeId::I8], &interner), "*Node, i8");
}
