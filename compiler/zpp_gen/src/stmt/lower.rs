//! Constructs rewritten into simpler statements before evaluation.
//!
//! Each rewrite introduces a local named `internal.N`, which no source
//! identifier can spell.

use tracing::trace;
use zpp_ir::{
    BinaryOp, CondBranch, Expr, ExprKind, Ident, IfStmt, MatchStmt, Pos, Stmt, TryStmt, TypeExpr,
};
use zpp_types::TypeId;

use crate::context::Generator;
use crate::error::GenResult;
use crate::value::RealData;

use super::DeclType;

impl Generator {
    fn fresh_internal(&mut self, pos: Pos) -> Ident {
        self.internal_vars += 1;
        let name = self.interner.intern(&format!("internal.{}", self.internal_vars));
        Ident::new(name, pos)
    }

    /// `a and b`: `r = false; if a: r = b`.
    /// `a or b`: `r = undefined; if a: r = true else: r = b`.
    pub(crate) fn lower_short_circuit(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        expected: Option<TypeId>,
        pos: Pos,
    ) -> GenResult<RealData> {
        let ty = self.int_or(expected, TypeId::U8);
        let tmp = self.fresh_internal(pos);
        trace!(op = op.as_symbol(), "lowering short-circuit operator");

        let assign_tmp = |value: Expr| vec![Stmt::assign(Expr::ident(tmp.name, pos), value, pos)];
        let (init, then, otherwise) = if op == BinaryOp::And {
            (ExprKind::False, assign_tmp(rhs.clone()), None)
        } else {
            (
                ExprKind::Undefined,
                assign_tmp(Expr::new(ExprKind::True, pos)),
                Some(assign_tmp(rhs.clone())),
            )
        };

        self.declare_local(tmp, DeclType::Known(ty), &Expr::new(init, pos))?;
        self.eval_if(&IfStmt {
            branches: vec![CondBranch {
                cond: lhs.clone(),
                body: then,
                pos: lhs.pos,
            }],
            else_body: otherwise,
        })?;
        self.eval_expr(&Expr::ident(tmp.name, pos), Some(ty))
    }

    /// `try x: T = expr [body]`: declare, then run `body` (or return the
    /// value) when it is non-zero. Without a binding the value takes the
    /// function's return type.
    pub(super) fn lower_try(&mut self, stmt: &TryStmt, pos: Pos) -> GenResult<()> {
        let name = match &stmt.binding {
            Some(binding) => {
                self.declare_local(binding.name, DeclType::Written(&binding.ty), &stmt.expr)?;
                binding.name
            }
            None => {
                let tmp = self.fresh_internal(stmt.expr.pos);
                let ret = self.ret_type();
                self.declare_local(tmp, DeclType::Known(ret), &stmt.expr)?;
                tmp
            }
        };

        let var = Expr::ident(name.name, name.pos);
        let failed = Expr::binary(BinaryOp::NotEq, var.clone(), Expr::int(0, name.pos), name.pos);
        let body = match &stmt.body {
            Some(body) => body.clone(),
            None => vec![Stmt::ret(Some(var), pos)],
        };
        self.eval_if(&IfStmt {
            branches: vec![CondBranch {
                cond: failed,
                body,
                pos,
            }],
            else_body: None,
        })
    }

    /// `match v: case a: .. case b: .. else: ..` becomes an `if` chain
    /// comparing one evaluation of `v` against each case.
    pub(super) fn lower_match(&mut self, stmt: &MatchStmt) -> GenResult<()> {
        let tmp = self.fresh_internal(stmt.scrutinee.pos);
        self.declare_local(tmp, DeclType::Inferred, &stmt.scrutinee)?;

        let branches = stmt
            .cases
            .iter()
            .map(|case| CondBranch {
                cond: Expr::binary(
                    BinaryOp::Eq,
                    Expr::ident(tmp.name, case.pos),
                    case.value.clone(),
                    case.pos,
                ),
                body: case.body.clone(),
                pos: case.pos,
            })
            .collect();
        trace!(cases = stmt.cases.len(), "lowering match");
        if stmt.cases.is_empty() {
            return match &stmt.else_body {
                Some(body) => self.eval_scoped_block(body),
                None => Ok(()),
            };
        }
        self.eval_if(&IfStmt {
            branches,
            else_body: stmt.else_body.clone(),
        })
    }

    /// `out name: T`: an uninitialized local, passed as `&mut name`.
    pub(crate) fn eval_out_param(&mut self, name: Ident, ty: &TypeExpr, pos: Pos) -> GenResult<RealData> {
        let undefined = Expr::new(ExprKind::Undefined, name.pos);
        self.declare_local(name, DeclType::Written(ty), &undefined)?;
        let operand = Expr::ident(name.name, name.pos);
        self.eval_expr(&Expr::addr_of(true, operand, pos), None)
    }
}

