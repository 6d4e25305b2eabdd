//! Generate IR for a small program built in memory and print it.
//!
//! Run with: cargo run --example generate -p zpp_gen
//!
//! `ZPP_RELEASE=1` selects a release build and `ZPP_LOG=zpp_gen=debug`
//! traces the generator.

use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use zpp_gen::{generate, init_tracing, GenConfig, MemoryLoader};
use zpp_ir::{
    BinaryOp, Call, Expr, ExprKind, FileId, FnDecl, Ident, Item, Param, Pos, Stmt,
    StringInterner, TypeExpr,
};

const ENTRY: &str = "/demo/main.zpp";

const SOURCE: &str = "\
fn answer(x: i32) -> i32 {
    return x * 6
}

fn main(argc: u32, argv: *mut *u8) -> i32 {
    return answer(7)
}
";

fn main() -> ExitCode {
    init_tracing();

    let loader = MemoryLoader::new().with_module(ENTRY, SOURCE, build);
    match generate(loader, Path::new(ENTRY), GenConfig::from_env()) {
        Ok(compilation) => {
            println!("{}", compilation.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// The items of [`SOURCE`], as a parser would produce them.
fn build(file: FileId, interner: &StringInterner) -> Vec<Item> {
    let at = |line| Pos::new(file, line, 1);
    let ident = |text, line| Ident::new(interner.intern(text), at(line));
    let ty = |text, line| TypeExpr::named(interner.intern(text), at(line));

    let answer = FnDecl {
        name: ident("answer", 1),
        generics: Vec::new(),
        params: vec![Param {
            name: ident("x", 1),
            ty: ty("i32", 1),
        }],
        ret: ty("i32", 1),
        body: vec![Stmt::ret(
            Some(Expr::binary(
                BinaryOp::Mul,
                Expr::ident(interner.intern("x"), at(2)),
                Expr::int(6, at(2)),
                at(2),
            )),
            at(2),
        )],
    };

    let argv = TypeExpr::ptr(true, TypeExpr::ptr(false, ty("u8", 5), at(5)), at(5));
    let call = Expr::new(
        ExprKind::Call(Call {
            callee: ident("answer", 6),
            generics: Vec::new(),
            args: vec![Expr::int(7, at(6))],
            intrinsic: false,
        }),
        at(6),
    );
    let main = FnDecl {
        name: ident("main", 5),
        generics: Vec::new(),
        params: vec![
            Param {
                name: ident("argc", 5),
                ty: ty("u32", 5),
            },
            Param {
                name: ident("argv", 5),
                ty: argv,
            },
        ],
        ret: ty("i32", 5),
        body: vec![Stmt::ret(Some(call), at(6))],
    };

    vec![Item::Function(Rc::new(answer)), Item::Function(Rc::new(main))]
}
