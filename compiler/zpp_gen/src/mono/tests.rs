use super::{MonoCache, MonoState};
use crate::symbol::SymbolId;
use pretty_assertions::assert_eq;
use zpp_ir::StringInterner;
use zpp_types::{Field, TypeId, TypePool};

#[test]
fn structurally_equal_args_hit_the_same_entry() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let a = pool.ptr(true, TypeId::I32);
    let b = pool.ptr(true, TypeId::I32);
    assert_ne!(a, b);

    let sym = SymbolId::new(3);
    let mut cache = MonoCache::default();
    cache.insert(&pool, sym, &[a], "first");

    assert_eq!(cache.get(&pool, sym, &[b]), Some((&"first", MonoState::InProgress)));
    cache.finish(&pool, sym, &[b]);
    assert_eq!(cache.get(&pool, sym, &[a]), Some((&"first", MonoState::Done)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn different_symbols_or_args_miss() {
    let interner = StringInterner::new();
    let pool = TypePool::new(&interner);
    let mut cache = MonoCache::default();
    cache.insert(&pool, SymbolId::new(0), &[TypeId::I32], 1);

    assert_eq!(cache.get(&pool, SymbolId::new(1), &[TypeId::I32]), None);
    assert_eq!(cache.get(&pool, SymbolId::new(0), &[TypeId::U32]), None);
    assert_eq!(cache.get(&pool, SymbolId::new(0), &[]), None);
}

#[test]
fn completed_placeholder_keys_are_found_after_rehash() {
    let interner = StringInterner::new();
    let mut pool = TypePool::new(&interner);
    let slot = pool.placeholder();
    let to_slot = pool.ptr(false, slot);

    let sym = SymbolId::new(0);
    let mut cache = MonoCache::default();
    cache.insert(&pool, sym, &[slot], "direct");
    cache.insert(&pool, sym, &[to_slot, TypeId::U8], "behind a pointer");

    let value = interner.intern("value");
    let body = pool.structure(vec![Field::new(value, TypeId::I32)]);
    pool.complete(slot, body, "Node");
    cache.rehash(&pool);

    assert_eq!(cache.get(&pool, sym, &[slot]), Some((&"direct", MonoState::InProgress)));
    assert_eq!(cache.get(&pool, sym, &[body]), Some((&"direct", MonoState::InProgress)));
    let to_body = pool.ptr(false, body);
    assert_eq!(
        cache.get(&pool, sym, &[to_body, TypeId::U8]),
        Some((&"behind a pointer", MonoState::InProgress))
    );
    assert_eq!(cache.len(), 2);
}
