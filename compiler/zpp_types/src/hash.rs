//! Structural hashing.
//!
//! Used to bucket memoization keys made of type lists. The hash only looks
//! at a bounded prefix of each type (pointees contribute their tag, nested
//! aggregates stop at a fixed depth), so it terminates on cyclic types and
//! never distinguishes two types that [`TypePool::equal`] considers equal.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::{TypeId, TypeKind, TypePool};

const MAX_DEPTH: u32 = 3;

impl TypePool {
    pub fn structural_hash(&self, ids: &[TypeId]) -> u64 {
        let mut hasher = FxHasher::default();
        ids.len().hash(&mut hasher);
        for &id in ids {
            self.hash_type(id, 0, &mut hasher);
        }
        hasher.finish()
    }

    fn hash_type(&self, id: TypeId, depth: u32, hasher: &mut FxHasher) {
        let kind = self.kind(id);
        kind.tag().hash(hasher);
        if depth >= MAX_DEPTH {
            return;
        }
        match kind {
            TypeKind::Int { bits, signed } => {
                bits.hash(hasher);
                signed.hash(hasher);
            }
            TypeKind::Float { bits } => bits.hash(hasher),
            TypeKind::Void | TypeKind::Placeholder => {}
            TypeKind::Ptr { mutable, pointee } => {
                mutable.hash(hasher);
                self.kind(*pointee).tag().hash(hasher);
            }
            TypeKind::Array { len, elem } => {
                len.hash(hasher);
                self.hash_type(*elem, depth + 1, hasher);
            }
            TypeKind::Struct { fields } | TypeKind::Union { fields } => {
                fields.len().hash(hasher);
                for field in fields {
                    field.name.hash(hasher);
                    self.hash_type(field.ty, depth + 1, hasher);
                }
            }
            TypeKind::Fn { params, ret } => {
                params.len().hash(hasher);
                for &param in params {
                    self.hash_type(param, depth + 1, hasher);
                }
                self.hash_type(*ret, depth + 1, hasher);
            }
        }
    }
}
