//! Type descriptor variants.

use zpp_ir::Name;

use crate::TypeId;

/// A named struct or union member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: Name,
    pub ty: TypeId,
}

impl Field {
    #[inline]
    pub const fn new(name: Name, ty: TypeId) -> Self {
        Field { name, ty }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    Int { bits: u8, signed: bool },
    Float { bits: u8 },
    Void,
    Ptr { mutable: bool, pointee: TypeId },
    Array { len: u64, elem: TypeId },
    /// Fields in declaration order.
    Struct { fields: Vec<Field> },
    Union { fields: Vec<Field> },
    Fn { params: Vec<TypeId>, ret: TypeId },
    /// Slot for a declaration whose body is still being evaluated.
    Placeholder,
}

impl TypeKind {
    /// Variant name for diagnostics and tracing.
    pub fn tag(&self) -> &'static str {
        match self {
            TypeKind::Int { .. } => "int",
            TypeKind::Float { .. } => "float",
            TypeKind::Void => "void",
            TypeKind::Ptr { .. } => "pointer",
            TypeKind::Array { .. } => "array",
            TypeKind::Struct { .. } => "struct",
            TypeKind::Union { .. } => "union",
            TypeKind::Fn { .. } => "fn",
            TypeKind::Placeholder => "placeholder",
        }
    }
}
