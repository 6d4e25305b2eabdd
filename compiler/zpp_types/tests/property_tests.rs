//! Property tests for structural type equality.
//!
//! Random type trees are built twice into the same pool; the two copies
//! must compare equal, equality must be symmetric, and equal types must
//! hash equally.

#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use zpp_ir::StringInterner;
use zpp_types::{Field, TypeId, TypePool};

#[derive(Clone, Debug)]
enum Shape {
    Scalar(u8),
    Ptr(bool, Box<Shape>),
    Array(u64, Box<Shape>),
    Struct(Vec<Shape>),
    Union(Vec<Shape>),
    Fn(Vec<Shape>, Box<Shape>),
}

const SCALARS: [TypeId; 10] = [
    TypeId::I8,
    TypeId::I16,
    TypeId::I32,
    TypeId::I64,
    TypeId::U8,
    TypeId::U16,
    TypeId::U32,
    TypeId::U64,
    TypeId::F32,
    TypeId::F64,
];

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = (0u8..10).prop_map(Shape::Scalar);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (any::<bool>(), inner.clone()).prop_map(|(m, s)| Shape::Ptr(m, Box::new(s))),
            (1u64..8, inner.clone()).prop_map(|(n, s)| Shape::Array(n, Box::new(s))),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Shape::Struct),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Shape::Union),
            (prop::collection::vec(inner.clone(), 0..3), inner)
                .prop_map(|(p, r)| Shape::Fn(p, Box::new(r))),
        ]
    })
}

fn build(shape: &Shape, pool: &mut TypePool, interner: &StringInterner) -> TypeId {
    match shape {
        Shape::Scalar(i) => SCALARS[usize::from(*i)],
        Shape::Ptr(mutable, inner) => {
            let pointee = build(inner, pool, interner);
            pool.ptr(*mutable, pointee)
        }
        Shape::Array(len, inner) => {
            let elem = build(inner, pool, interner);
            pool.array(*len, elem)
        }
        Shape::Struct(members) | Shape::Union(members) => {
            let fields = members
                .iter()
                .enumerate()
                .map(|(i, m)| Field::new(interner.intern(&format!("f{i}")), build(m, pool, interner)))
                .collect();
            if matches!(shape, Shape::Struct(_)) {
                pool.structure(fields)
            } else {
                pool.union(fields)
            }
        }
        Shape::Fn(params, ret) => {
            let params = params.iter().map(|p| build(p, pool, interner)).collect();
            let ret = build(ret, pool, interner);
            pool.function(params, ret)
        }
    }
}

proptest! {
    #[test]
    fn rebuilt_types_are_equal(shape in shape_strategy()) {
        let interner = StringInterner::new();
        let mut pool = TypePool::new(&interner);
        let a = build(&shape, &mut pool, &interner);
        let b = build(&shape, &mut pool, &interner);
        prop_assert!(pool.equal(a, a));
        prop_assert!(pool.equal(a, b));
        prop_assert!(pool.equal(b, a));
        prop_assert_eq!(pool.structural_hash(&[a]), pool.structural_hash(&[b]));
    }

    #[test]
    fn equality_is_symmetric(x in shape_strategy(), y in shape_strategy()) {
        let interner = StringInterner::new();
        let mut pool = TypePool::new(&interner);
        let a = build(&x, &mut pool, &interner);
        let b = build(&y, &mut pool, &interner);
        prop_assert_eq!(pool.equal(a, b), pool.equal(b, a));
    }
}
