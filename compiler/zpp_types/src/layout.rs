//! Size, alignment, and the infinite-layout check.

use crate::{TypeId, TypeKind, TypePool};

/// Pointer width of every supported target.
const POINTER_SIZE: u64 = 8;

impl TypePool {
    /// Storage size in bytes, with C struct layout.
    pub fn size_of(&self, id: TypeId) -> u64 {
        match self.kind(id) {
            TypeKind::Int { bits, .. } | TypeKind::Float { bits } => u64::from(*bits).div_ceil(8),
            TypeKind::Void | TypeKind::Fn { .. } | TypeKind::Placeholder => 0,
            TypeKind::Ptr { .. } => POINTER_SIZE,
            TypeKind::Array { len, elem } => len.saturating_mul(self.size_of(*elem)),
            TypeKind::Struct { fields } => {
                let mut offset = 0u64;
                for field in fields {
                    offset = align_to(offset, self.align_of(field.ty)) + self.size_of(field.ty);
                }
                align_to(offset, self.align_of(id))
            }
            TypeKind::Union { fields } => {
                let largest = fields
                    .iter()
                    .map(|f| self.size_of(f.ty))
                    .max()
                    .unwrap_or(0);
                align_to(largest, self.align_of(id))
            }
        }
    }

    pub fn align_of(&self, id: TypeId) -> u64 {
        match self.kind(id) {
            TypeKind::Int { .. } | TypeKind::Float { .. } => self.size_of(id).max(1),
            TypeKind::Void | TypeKind::Fn { .. } | TypeKind::Placeholder => 1,
            TypeKind::Ptr { .. } => POINTER_SIZE,
            TypeKind::Array { elem, .. } => self.align_of(*elem),
            TypeKind::Struct { fields } | TypeKind::Union { fields } => fields
                .iter()
                .map(|f| self.align_of(f.ty))
                .max()
                .unwrap_or(1),
        }
    }

    /// First struct or union that contains itself by value, walking from `id`.
    ///
    /// Containment through a pointer is fine and is not followed.
    pub fn find_recursive_layout(&self, id: TypeId) -> Option<TypeId> {
        self.layout_walk(id, &mut Vec::new())
    }

    fn layout_walk(&self, id: TypeId, path: &mut Vec<TypeId>) -> Option<TypeId> {
        match self.kind(id) {
            TypeKind::Struct { fields } | TypeKind::Union { fields } => {
                if path.contains(&id) {
                    return Some(id);
                }
                path.push(id);
                let found = fields.iter().find_map(|f| self.layout_walk(f.ty, path));
                path.pop();
                found
            }
            TypeKind::Array { elem, .. } => self.layout_walk(*elem, path),
            _ => None,
        }
    }
}

fn align_to(offset: u64, align: u64) -> u64 {
    offset.div_ceil(align) * align
}

#[cfg(test)]
mod tests;
