//! Zpp IR - source-level data structures
//!
//! This crate holds what the generator consumes from the front end:
//! - Positions and the file table for diagnostics
//! - Names for interned identifiers
//! - The typed AST (items, statements, expressions, type expressions)
//!
//! Parsing lives outside this workspace; a parser only has to build these
//! trees and hand them over through the generator's module loader.

pub mod ast;
mod interner;
mod name;
mod pos;

pub use ast::{
    Assign, AssignOp, AssignTarget, BinaryOp, Block, Call, CondBranch, Expr, ExprKind, FieldDecl,
    FieldInit, FnDecl, ForStmt, GlobalDecl, Ident, IfStmt, ImportDecl, ImportName, ImportNames,
    Item, MatchCase, MatchStmt, Param, Stmt, StmtKind, TestDecl, TryBinding, TryStmt, TypeDecl,
    TypeExpr, TypeExprKind, UnaryOp, VarDecl, WhileStmt,
};
pub use interner::StringInterner;
pub use name::Name;
pub use pos::{FileId, Pos, SourceFile, SourceMap};
