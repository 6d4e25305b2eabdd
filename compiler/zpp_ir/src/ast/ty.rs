//! Type expressions as written in source.

use super::{Expr, Ident};
use crate::{Name, Pos};

#[derive(Clone, Debug, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeExprKind {
    /// Builtin scalar, declared type, or generic parameter.
    Named(Name),
    /// `Name|A, B|`
    Generic { name: Name, args: Vec<TypeExpr> },
    /// `*T` or `*mut T`
    Ptr { mutable: bool, pointee: Box<TypeExpr> },
    /// `[N x T]`; the length must fold to a comptime integer.
    Array { len: Box<Expr>, elem: Box<TypeExpr> },
    Struct(Vec<FieldDecl>),
    Union(Vec<FieldDecl>),
    /// `fn(A, B) -> R`; only valid behind a pointer.
    Fn {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: Ident,
    pub ty: TypeExpr,
}

impl TypeExpr {
    #[inline]
    pub const fn new(kind: TypeExprKind, pos: Pos) -> Self {
        TypeExpr { kind, pos }
    }

    pub fn named(name: Name, pos: Pos) -> Self {
        TypeExpr::new(TypeExprKind::Named(name), pos)
    }

    pub fn ptr(mutable: bool, pointee: TypeExpr, pos: Pos) -> Self {
        TypeExpr::new(
            TypeExprKind::Ptr {
                mutable,
                pointee: Box::new(pointee),
            },
            pos,
        )
    }
}
