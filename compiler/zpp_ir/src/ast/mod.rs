//! Typed AST consumed by the generator.
//!
//! The parser produces these trees; the generator never sees token
//! streams. Each node kind is its own variant with named fields, so the
//! lowering passes that build synthetic nodes (short-circuit operators,
//! `try`, `match`, out-parameters) go through the same constructors.

mod expr;
mod item;
mod operators;
mod stmt;
mod ty;

pub use expr::{Call, Expr, ExprKind, FieldInit};
pub use item::{
    FnDecl, GlobalDecl, ImportDecl, ImportName, ImportNames, Item, Param, TestDecl, TypeDecl,
};
pub use operators::{AssignOp, BinaryOp, UnaryOp};
pub use stmt::{
    Assign, AssignTarget, Block, CondBranch, ForStmt, IfStmt, MatchCase, MatchStmt, Stmt,
    StmtKind, TryBinding, TryStmt, VarDecl, WhileStmt,
};
pub use ty::{FieldDecl, TypeExpr, TypeExprKind};

use crate::{Name, Pos};

/// A name together with where it was written.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: Name,
    pub pos: Pos,
}

impl Ident {
    #[inline]
    pub const fn new(name: Name, pos: Pos) -> Self {
        Ident { name, pos }
    }
}
