//! End-to-end generation over in-memory modules.
//!
//! Modules are built as ASTs through [`Ast`], registered in a
//! [`MemoryLoader`], and generated through the public entry points.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod errors;

use std::path::Path;
use std::rc::Rc;

use zpp_ir::{
    AssignOp, BinaryOp, Block, Call, CondBranch, Expr, ExprKind, FieldDecl, FileId, FnDecl,
    GlobalDecl, Ident, IfStmt, ImportDecl, ImportName, ImportNames, Item, Name, Param, Pos, Stmt,
    StmtKind, StringInterner, TestDecl, TypeDecl, TypeExpr, TypeExprKind, VarDecl,
};
use zpp_lir::{Function, Instr, Terminator};

use crate::{
    generate, generate_tests, Compilation, GenConfig, GenError, GenResult, MemoryLoader,
};

const MAIN: &str = "/app/main.zpp";

/// AST builder for one file. Every node sits on line 1 unless a helper
/// takes a line.
struct Ast<'a> {
    file: FileId,
    interner: &'a StringInterner,
}

impl Ast<'_> {
    fn at(&self, line: u32) -> Pos {
        Pos::new(self.file, line, 1)
    }

    fn pos(&self) -> Pos {
        self.at(1)
    }

    fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    fn ident(&self, text: &str) -> Ident {
        Ident::new(self.name(text), self.pos())
    }

    // Types

    fn ty(&self, text: &str) -> TypeExpr {
        TypeExpr::named(self.name(text), self.pos())
    }

    fn ptr(&self, mutable: bool, pointee: TypeExpr) -> TypeExpr {
        TypeExpr::ptr(mutable, pointee, self.pos())
    }

    fn generic_ty(&self, text: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::new(
            TypeExprKind::Generic {
                name: self.name(text),
                args,
            },
            self.pos(),
        )
    }

    fn struct_ty(&self, fields: &[(&str, TypeExpr)]) -> TypeExpr {
        let fields = fields
            .iter()
            .map(|(name, ty)| FieldDecl {
                name: self.ident(name),
                ty: ty.clone(),
            })
            .collect();
        TypeExpr::new(TypeExprKind::Struct(fields), self.pos())
    }

    fn array_ty(&self, len: u64, elem: TypeExpr) -> TypeExpr {
        TypeExpr::new(
            TypeExprKind::Array {
                len: Box::new(self.int(len)),
                elem: Box::new(elem),
            },
            self.pos(),
        )
    }

    // Expressions

    fn var(&self, text: &str) -> Expr {
        Expr::ident(self.name(text), self.pos())
    }

    fn int(&self, value: u64) -> Expr {
        Expr::int(value, self.pos())
    }

    fn expr(&self, kind: ExprKind) -> Expr {
        Expr::new(kind, self.pos())
    }

    fn str(&self, text: &str) -> Expr {
        self.expr(ExprKind::Str(text.to_string()))
    }

    fn bin(&self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(op, lhs, rhs, self.pos())
    }

    fn field(&self, base: Expr, field: &str) -> Expr {
        self.expr(ExprKind::Field {
            base: Box::new(base),
            field: self.ident(field),
        })
    }

    fn deref(&self, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary {
            op: zpp_ir::UnaryOp::Deref,
            operand: Box::new(operand),
        })
    }

    fn cast(&self, expr: Expr, ty: TypeExpr) -> Expr {
        self.expr(ExprKind::Cast {
            expr: Box::new(expr),
            ty,
        })
    }

    fn call(&self, callee: &str, args: Vec<Expr>) -> Expr {
        self.call_generic(callee, Vec::new(), args)
    }

    fn call_generic(&self, callee: &str, generics: Vec<TypeExpr>, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call(Call {
            callee: self.ident(callee),
            generics,
            args,
            intrinsic: false,
        }))
    }

    fn intrinsic(&self, callee: &str, generics: Vec<TypeExpr>, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call(Call {
            callee: self.ident(callee),
            generics,
            args,
            intrinsic: true,
        }))
    }

    // Statements

    fn stmt(&self, kind: StmtKind) -> Stmt {
        Stmt::new(kind, self.pos())
    }

    fn ret(&self, value: Expr) -> Stmt {
        Stmt::ret(Some(value), self.pos())
    }

    fn let_(&self, name: &str, ty: Option<TypeExpr>, init: Expr) -> Stmt {
        self.stmt(StmtKind::VarDecl(VarDecl {
            name: self.ident(name),
            ty,
            init,
        }))
    }

    fn set(&self, target: Expr, value: Expr) -> Stmt {
        Stmt::assign(target, value, self.pos())
    }

    fn compound(&self, target: Expr, op: AssignOp, value: Expr) -> Stmt {
        self.stmt(StmtKind::Assign(zpp_ir::Assign {
            target: zpp_ir::AssignTarget::Place(target),
            op,
            value,
        }))
    }

    fn if_(&self, cond: Expr, then: Block, otherwise: Option<Block>) -> Stmt {
        self.stmt(StmtKind::If(IfStmt {
            branches: vec![CondBranch {
                cond,
                body: then,
                pos: self.pos(),
            }],
            else_body: otherwise,
        }))
    }

    fn expr_stmt(&self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expr(expr))
    }

    // Items

    fn func(&self, name: &str, params: &[(&str, TypeExpr)], ret: TypeExpr, body: Block) -> Item {
        self.generic_func(name, &[], params, ret, body)
    }

    fn generic_func(
        &self,
        name: &str,
        generics: &[&str],
        params: &[(&str, TypeExpr)],
        ret: TypeExpr,
        body: Block,
    ) -> Item {
        Item::Function(Rc::new(FnDecl {
            name: self.ident(name),
            generics: generics.iter().map(|g| self.ident(g)).collect(),
            params: params
                .iter()
                .map(|(name, ty)| Param {
                    name: self.ident(name),
                    ty: ty.clone(),
                })
                .collect(),
            ret,
            body,
        }))
    }

    /// `fn main(argc: u32, argv: *mut *u8) -> i32`
    fn main(&self, body: Block) -> Item {
        let argv = self.ptr(true, self.ptr(false, self.ty("u8")));
        self.func("main", &[("argc", self.ty("u32")), ("argv", argv)], self.ty("i32"), body)
    }

    fn type_decl(&self, name: &str, generics: &[&str], ty: TypeExpr) -> Item {
        Item::Type(Rc::new(TypeDecl {
            name: self.ident(name),
            generics: generics.iter().map(|g| self.ident(g)).collect(),
            ty,
        }))
    }

    fn global(&self, name: &str, ty: TypeExpr, init: Expr, line: u32) -> Item {
        Item::Global(Rc::new(GlobalDecl {
            name: Ident::new(self.name(name), self.at(line)),
            ty,
            init,
        }))
    }

    fn import(&self, path: &str, names: &[(&str, &str)]) -> Item {
        let names = if names.is_empty() {
            ImportNames::All
        } else {
            ImportNames::List(
                names
                    .iter()
                    .map(|(name, alias)| ImportName {
                        name: self.ident(name),
                        alias: self.ident(alias),
                    })
                    .collect(),
            )
        };
        Item::Import(ImportDecl {
            path: path.to_string(),
            names,
            pos: self.pos(),
        })
    }

    fn test(&self, description: &str, body: Block) -> Item {
        Item::Test(Rc::new(TestDecl {
            description: description.to_string(),
            body,
            pos: self.pos(),
        }))
    }
}

type Build = fn(&Ast<'_>) -> Vec<Item>;

fn loader(modules: &[(&str, Build)]) -> MemoryLoader {
    let mut loader = MemoryLoader::new();
    for &(path, build) in modules {
        loader.insert(path, "", move |file, interner| build(&Ast { file, interner }));
    }
    loader
}

fn compile(build: Build) -> GenResult<Compilation> {
    compile_with(GenConfig::default(), build)
}

fn compile_with(config: GenConfig, build: Build) -> GenResult<Compilation> {
    generate(loader(&[(MAIN, build)]), Path::new(MAIN), config)
}

fn compile_modules(modules: &[(&str, Build)]) -> GenResult<Compilation> {
    generate(loader(modules), Path::new(MAIN), GenConfig::default())
}

fn compile_tests(build: Build) -> GenResult<Compilation> {
    generate_tests(loader(&[(MAIN, build)]), Path::new(MAIN), GenConfig::default())
}

fn failure(result: GenResult<Compilation>) -> GenError {
    match result {
        Ok(c) => panic!("generation succeeded:\n{}", c.display()),
        Err(err) => err,
    }
}

/// Generated function `name` of the entry module.
fn function<'c>(compilation: &'c Compilation, name: &str) -> &'c Function {
    compilation
        .module
        .function_by_name(&format!("{MAIN}::{name}"))
        .unwrap_or_else(|| panic!("no function `{name}` in\n{}", compilation.display()))
}

fn calls(function: &Function) -> usize {
    function
        .instrs()
        .filter(|i| matches!(i, Instr::Call { .. }))
        .count()
}

fn returns(function: &Function) -> Vec<&Terminator> {
    function
        .blocks
        .iter()
        .map(|b| &b.terminator)
        .filter(|t| matches!(t, Terminator::Return(_)))
        .collect()
}
