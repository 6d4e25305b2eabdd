//! Zpp type system.
//!
//! Types live in a [`TypePool`] arena and are referenced by [`TypeId`].
//! Unlike a hash-consing interner, the pool does not deduplicate: two
//! evaluations of `(a: i32, b: *i32)` produce two ids, and code compares
//! them with [`TypePool::equal`], which is structural. Memoization of named
//! and generic types happens one level up, in the generator.
//!
//! Self-referential declarations are supported by allocating a
//! [`TypeKind::Placeholder`] slot first and overwriting it in place once the
//! declaration's body is known, so every reference taken in the meantime
//! sees the completed type.

mod equality;
mod format;
mod hash;
mod idx;
mod kind;
mod layout;
mod pool;

pub use format::TypeDisplay;
pub use idx::TypeId;
pub use kind::{Field, TypeKind};
pub use pool::TypePool;
