//! Structural type equality.
//!
//! Equality is coinductive over pointers, structs and unions: a pair of ids
//! already being compared further up the walk is assumed equal. That is
//! what lets two recursive declarations such as
//! `type Node = (value: i32, next: *Node)` compare equal without looping.
//! Aliases are ignored.

use crate::{Field, TypeId, TypeKind, TypePool};

impl TypePool {
    pub fn equal(&self, a: TypeId, b: TypeId) -> bool {
        self.equal_in(a, b, &mut Vec::new())
    }

    /// Pairwise equality of two type lists.
    pub fn equal_lists(&self, a: &[TypeId], b: &[TypeId]) -> bool {
        let mut in_progress = Vec::new();
        a.len() == b.len()
            && a
                .iter()
                .zip(b)
                .all(|(&x, &y)| self.equal_in(x, y, &mut in_progress))
    }

    fn equal_in(&self, a: TypeId, b: TypeId, in_progress: &mut Vec<(TypeId, TypeId)>) -> bool {
        if a == b {
            return true;
        }

        match (self.kind(a), self.kind(b)) {
            (
                TypeKind::Int {
                    bits: b1,
                    signed: s1,
                },
                TypeKind::Int {
                    bits: b2,
                    signed: s2,
                },
            ) => b1 == b2 && s1 == s2,
            (TypeKind::Float { bits: b1 }, TypeKind::Float { bits: b2 }) => b1 == b2,
            (TypeKind::Void, TypeKind::Void) => true,
            (
                TypeKind::Ptr {
                    mutable: m1,
                    pointee: p1,
                },
                TypeKind::Ptr {
                    mutable: m2,
                    pointee: p2,
                },
            ) => {
                if m1 != m2 {
                    return false;
                }
                let (p1, p2) = (*p1, *p2);
                self.assuming_equal(a, b, in_progress, |pool, stack| {
                    pool.equal_in(p1, p2, stack)
                })
            }
            (TypeKind::Array { len: l1, elem: e1 }, TypeKind::Array { len: l2, elem: e2 }) => {
                l1 == l2 && self.equal_in(*e1, *e2, in_progress)
            }
            (TypeKind::Struct { fields: f1 }, TypeKind::Struct { fields: f2 })
            | (TypeKind::Union { fields: f1 }, TypeKind::Union { fields: f2 }) => {
                self.assuming_equal(a, b, in_progress, |pool, stack| {
                    pool.fields_equal(f1, f2, stack)
                })
            }
            (TypeKind::Fn { params: p1, ret: r1 }, TypeKind::Fn { params: p2, ret: r2 }) => {
                p1.len() == p2.len()
                    && p1
                        .iter()
                        .zip(p2)
                        .all(|(&x, &y)| self.equal_in(x, y, in_progress))
                    && self.equal_in(*r1, *r2, in_progress)
            }
            // Two distinct unfinished slots are never known to be equal.
            _ => false,
        }
    }

    fn fields_equal(
        &self,
        f1: &[Field],
        f2: &[Field],
        in_progress: &mut Vec<(TypeId, TypeId)>,
    ) -> bool {
        f1.len() == f2.len()
            && f1
                .iter()
                .zip(f2)
                .all(|(x, y)| x.name == y.name && self.equal_in(x.ty, y.ty, in_progress))
    }

    fn assuming_equal(
        &self,
        a: TypeId,
        b: TypeId,
        in_progress: &mut Vec<(TypeId, TypeId)>,
        compare: impl FnOnce(&Self, &mut Vec<(TypeId, TypeId)>) -> bool,
    ) -> bool {
        if in_progress.contains(&(a, b)) {
            return true;
        }
        in_progress.push((a, b));
        let result = compare(self, in_progress);
        in_progress.pop();
        result
    }
}

#[cfg(test)]
mod tests;
