//! Top-level declarations.

use std::rc::Rc;

use super::{Block, Expr, Ident, TypeExpr};
use crate::Pos;

/// A top-level declaration.
///
/// Declarations the generator refers back to after the module is mapped are
/// reference counted, so symbols can hold them without borrowing the module.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    Function(Rc<FnDecl>),
    Type(Rc<TypeDecl>),
    Global(Rc<GlobalDecl>),
    Import(ImportDecl),
    Test(Rc<TestDecl>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeExpr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FnDecl {
    pub name: Ident,
    pub generics: Vec<Ident>,
    pub params: Vec<Param>,
    pub ret: TypeExpr,
    pub body: Block,
}

/// `type Name = T` or `type Name|A, B| = T`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDecl {
    pub name: Ident,
    pub generics: Vec<Ident>,
    pub ty: TypeExpr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlobalDecl {
    pub name: Ident,
    pub ty: TypeExpr,
    pub init: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportDecl {
    /// Path as written, relative to the importing file's directory.
    pub path: String,
    pub names: ImportNames,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImportNames {
    All,
    List(Vec<ImportName>),
}

/// `name` or `name as alias`; without `as`, `alias == name`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImportName {
    pub name: Ident,
    pub alias: Ident,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TestDecl {
    pub description: String,
    pub body: Block,
    pub pos: Pos,
}

impl Item {
    pub fn pos(&self) -> Pos {
        match self {
            Item::Function(f) => f.name.pos,
            Item::Type(t) => t.name.pos,
            Item::Global(g) => g.name.pos,
            Item::Import(i) => i.pos,
            Item::Test(t) => t.pos,
        }
    }
}
