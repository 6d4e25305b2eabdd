//! Statement nodes.

use super::{AssignOp, Expr, Ident, TypeExpr};
use crate::Pos;

pub type Block = Vec<Stmt>;

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    VarDecl(VarDecl),
    Assign(Assign),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Break,
    Continue,
    Return(Option<Expr>),
    Pass,
    /// Statement replayed when the enclosing scope is left.
    Defer(Box<Stmt>),
    Try(TryStmt),
    Match(MatchStmt),
    Expr(Expr),
}

/// `name: T = init`, or `name := init` when `ty` is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: Ident,
    pub ty: Option<TypeExpr>,
    pub init: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    pub target: AssignTarget,
    pub op: AssignOp,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AssignTarget {
    Place(Expr),
    /// `.. = expr` evaluates and drops a value of any type.
    Discard,
}

/// `if`/`elif` chain with an optional `else`.
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub branches: Vec<CondBranch>,
    pub else_body: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CondBranch {
    pub cond: Expr,
    pub body: Block,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
}

/// `for init, cond, step: body`; `init` and `step` may be omitted with `..`.
#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub init: Option<VarDecl>,
    pub cond: Expr,
    pub step: Option<Box<Stmt>>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TryBinding {
    pub name: Ident,
    pub ty: TypeExpr,
}

/// `try expr`, `try x: T = expr`, optionally with a body run on failure.
#[derive(Clone, Debug, PartialEq)]
pub struct TryStmt {
    pub binding: Option<TryBinding>,
    pub expr: Expr,
    pub body: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchCase {
    pub value: Expr,
    pub body: Block,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchStmt {
    pub scrutinee: Expr,
    pub cases: Vec<MatchCase>,
    pub else_body: Option<Block>,
}

impl Stmt {
    #[inline]
    pub const fn new(kind: StmtKind, pos: Pos) -> Self {
        Stmt { kind, pos }
    }

    pub fn assign(target: Expr, value: Expr, pos: Pos) -> Self {
        Stmt::new(
            StmtKind::Assign(Assign {
                target: AssignTarget::Place(target),
                op: AssignOp::Set,
                value,
            }),
            pos,
        )
    }

    pub fn ret(value: Option<Expr>, pos: Pos) -> Self {
        Stmt::new(StmtKind::Return(value), pos)
    }
}
