use pretty_assertions::assert_eq;
use zpp_diagnostic::ErrorCode;
use zpp_ir::{BinaryOp, ExprKind, StmtKind};

use super::{compile, compile_modules, compile_tests, failure, Ast, MAIN};

#[test]
fn duplicate_global_points_at_the_second_declaration() {
    let err = failure(compile(|a| {
        vec![
            a.global("counter", a.ty("i32"), a.int(0), 1),
            a.global("counter", a.ty("i32"), a.int(1), 2),
            a.main(vec![a.ret(a.int(0))]),
        ]
    }));

    assert_eq!(err.code, ErrorCode::DuplicateDeclaration);
    assert_eq!(err.message, "id `counter` already declared");
    assert_eq!(err.pos.map(|p| p.line), Some(2));
}

#[test]
fn undeclared_symbol() {
    let err = failure(compile(|a| vec![a.main(vec![a.ret(a.var("nope"))])]));

    assert_eq!(err.code, ErrorCode::UndeclaredSymbol);
    assert_eq!(err.message, "id `nope` not declared");
}

#[test]
fn missing_main() {
    let err = failure(compile(|a| {
        vec![a.func("helper", &[], a.ty("i32"), vec![a.ret(a.int(0))])]
    }));

    assert_eq!(err.code, ErrorCode::UndeclaredSymbol);
    assert_eq!(err.pos, None);
}

#[test]
fn invalid_main_prototype() {
    let err = failure(compile(|a| {
        vec![a.func("main", &[("argc", a.ty("u32"))], a.ty("i32"), vec![a.ret(a.int(0))])]
    }));

    assert_eq!(err.code, ErrorCode::InvalidMain);
    assert_eq!(err.message, "invalid `main` prototype");
}

#[test]
fn break_outside_loop() {
    let err = failure(compile(|a| vec![a.main(vec![a.stmt(StmtKind::Break)])]));

    assert_eq!(err.code, ErrorCode::BreakOrContinueOutsideLoop);
    assert_eq!(err.message, "use of `break` statement outside of loop body");
}

#[test]
fn statement_after_return_is_unreachable() {
    let err = failure(compile(|a| {
        vec![a.main(vec![
            a.ret(a.int(0)),
            a.stmt(StmtKind::Return(Some(a.int(1)))),
        ])]
    }));

    assert_eq!(err.code, ErrorCode::UnreachableCode);
}

#[test]
fn missing_return_on_fallthrough() {
    let err = failure(compile(|a| {
        vec![a.main(vec![a.if_(
            a.bin(BinaryOp::Eq, a.var("argc"), a.int(0)),
            vec![a.ret(a.int(1))],
            None,
        )])]
    }));

    assert_eq!(err.code, ErrorCode::MissingReturn);
    assert_eq!(err.message, "not all paths return a value");
}

#[test]
fn undiscarded_expression() {
    let err = failure(compile(|a| {
        vec![a.main(vec![
            a.expr_stmt(a.bin(BinaryOp::Add, a.var("argc"), a.int(1))),
            a.ret(a.int(0)),
        ])]
    }));

    assert_eq!(err.code, ErrorCode::UndiscardedExpression);
    assert_eq!(err.message, "undiscarded expression of type `u32` as statement");
}

#[test]
fn write_through_immutable_pointer() {
    let err = failure(compile(|a| {
        vec![
            a.func(
                "poke",
                &[("p", a.ptr(false, a.ty("i32")))],
                a.ty("void"),
                vec![a.set(a.deref(a.var("p")), a.int(1))],
            ),
            a.main(vec![
                a.expr_stmt(a.call("poke", vec![a.expr(ExprKind::Null)])),
                a.ret(a.int(0)),
            ]),
        ]
    }));

    assert_eq!(err.code, ErrorCode::InvalidAssignmentTarget);
    assert_eq!(err.message, "cannot write to unmutable pointer");
}

#[test]
fn assigning_to_a_literal() {
    let err = failure(compile(|a| {
        vec![a.main(vec![a.set(a.int(1), a.int(2)), a.ret(a.int(0))])]
    }));

    assert_eq!(err.code, ErrorCode::InvalidAssignmentTarget);
}

#[test]
fn comptime_division_by_zero() {
    let err = failure(compile(|a| {
        vec![a.main(vec![a.ret(a.bin(BinaryOp::Div, a.int(1), a.int(0)))])]
    }));

    assert_eq!(err.code, ErrorCode::DivisionByZero);
}

#[test]
fn pointer_to_int_cast_is_rejected() {
    let err = failure(compile(|a| {
        vec![a.main(vec![a.ret(a.cast(a.var("argv"), a.ty("i32")))])]
    }));

    assert_eq!(err.code, ErrorCode::InvalidCast);
}

#[test]
fn string_into_int_is_a_mismatch() {
    let err = failure(compile(|a| {
        vec![a.main(vec![
            a.let_("x", Some(a.ty("i32")), a.str("hi")),
            a.ret(a.var("x")),
        ])]
    }));

    assert_eq!(err.code, ErrorCode::TypeMismatch);
}

#[test]
fn self_containing_struct_has_no_layout() {
    let err = failure(compile(|a| {
        vec![
            a.type_decl("Node", &[], a.struct_ty(&[("next", a.ty("Node"))])),
            a.main(vec![
                a.let_("n", Some(a.ty("Node")), a.expr(ExprKind::Undefined)),
                a.ret(a.int(0)),
            ]),
        ]
    }));

    assert_eq!(err.code, ErrorCode::RecursiveLayout);
    assert_eq!(err.message, "type has infinite recursive layout");
}

#[test]
fn generic_type_argument_count() {
    let err = failure(compile(|a| {
        vec![
            a.type_decl("Box", &["T"], a.struct_ty(&[("v", a.ty("T"))])),
            a.main(vec![
                a.let_(
                    "b",
                    Some(a.generic_ty("Box", vec![a.ty("i32"), a.ty("u8")])),
                    a.expr(ExprKind::Undefined),
                ),
                a.ret(a.int(0)),
            ]),
        ]
    }));

    assert_eq!(err.code, ErrorCode::ArityMismatch);
    assert_eq!(err.message, "expected `1` generic args, got `2`");
}

#[test]
fn call_argument_count() {
    let err = failure(compile(|a| {
        vec![
            a.func("f", &[("x", a.ty("i32"))], a.ty("i32"), vec![a.ret(a.var("x"))]),
            a.main(vec![a.ret(a.call("f", vec![a.int(1), a.int(2)]))]),
        ]
    }));

    assert_eq!(err.code, ErrorCode::ArityMismatch);
    assert_eq!(err.message, "expected `1` args, got `2`");
}

#[test]
fn empty_array_initializer() {
    let err = failure(compile(|a| {
        vec![a.main(vec![
            a.let_(
                "xs",
                Some(a.array_ty(3, a.ty("i32"))),
                a.expr(ExprKind::ArrayInit(Vec::new())),
            ),
            a.ret(a.int(0)),
        ])]
    }));

    assert_eq!(err.code, ErrorCode::ArityMismatch);
    assert_eq!(err.message, "array initializer cannot be empty");
}

#[test]
fn missing_import() {
    let err = failure(compile_modules(&[(MAIN, |a: &Ast<'_>| {
        vec![
            a.import("missing.zpp", &[]),
            a.main(vec![a.ret(a.int(0))]),
        ]
    })]));

    assert_eq!(err.code, ErrorCode::ImportNotFound);
    assert!(err.pos.is_some());
}

#[test]
fn global_reading_itself() {
    let err = failure(compile(|a| {
        vec![
            a.global("a", a.ty("i32"), a.var("a"), 1),
            a.main(vec![a.ret(a.var("a"))]),
        ]
    }));

    assert_eq!(err.code, ErrorCode::RecursiveGlobal);
    assert_eq!(err.message, "global `a` depends on its own value");
}

#[test]
fn unknown_intrinsic() {
    let err = failure(compile(|a| {
        vec![a.main(vec![
            a.expr_stmt(a.intrinsic("frobnicate", vec![], vec![])),
            a.ret(a.int(0)),
        ])]
    }));

    assert_eq!(err.code, ErrorCode::UndeclaredSymbol);
    assert_eq!(err.message, "unknown internal function `frobnicate`");
}

#[test]
fn duplicate_test_description() {
    let err = failure(compile_tests(|a| {
        vec![
            a.test("same", vec![a.ret(a.int(0))]),
            a.test("same", vec![a.ret(a.int(0))]),
        ]
    }));

    assert_eq!(err.code, ErrorCode::DuplicateDeclaration);
    assert_eq!(err.message, "test `same` already declared");
}
