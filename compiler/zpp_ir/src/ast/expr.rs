//! Expression nodes.

use super::{BinaryOp, Ident, TypeExpr, UnaryOp};
use crate::{Name, Pos};

/// An expression with its source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// Integer literal; its type comes from context.
    Int(u64),
    /// Float literal; its type comes from context.
    Float(f64),
    Char(char),
    Str(String),
    True,
    False,
    Null,
    Undefined,
    Ident(Name),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `&expr` or `&mut expr`.
    AddrOf {
        mutable: bool,
        operand: Box<Expr>,
    },
    /// `expr as T`.
    Cast {
        expr: Box<Expr>,
        ty: TypeExpr,
    },
    Call(Call),
    Field {
        base: Box<Expr>,
        field: Ident,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// `[a, b, c]`
    ArrayInit(Vec<Expr>),
    /// `(a: x, b: y)`
    StructInit(Vec<FieldInit>),
    /// Union constructor naming exactly one field.
    UnionInit(Box<FieldInit>),
    /// `then if cond else otherwise`
    InlineIf {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `out name: T` in argument position.
    OutParam {
        name: Ident,
        ty: TypeExpr,
    },
}

/// A call. `intrinsic` marks the `name!(..)` form, which never resolves
/// through the symbol table.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub callee: Ident,
    pub generics: Vec<TypeExpr>,
    pub args: Vec<Expr>,
    pub intrinsic: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldInit {
    pub name: Ident,
    pub value: Expr,
}

impl Expr {
    #[inline]
    pub const fn new(kind: ExprKind, pos: Pos) -> Self {
        Expr { kind, pos }
    }

    pub fn ident(name: Name, pos: Pos) -> Self {
        Expr::new(ExprKind::Ident(name), pos)
    }

    pub fn int(value: u64, pos: Pos) -> Self {
        Expr::new(ExprKind::Int(value), pos)
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, pos: Pos) -> Self {
        Expr::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            pos,
        )
    }

    pub fn addr_of(mutable: bool, operand: Expr, pos: Pos) -> Self {
        Expr::new(
            ExprKind::AddrOf {
                mutable,
                operand: Box::new(operand),
            },
            pos,
        )
    }

    /// Identifier a plain `Ident` expression refers to.
    pub fn as_ident(&self) -> Option<Name> {
        match self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}
