//! `if`, loops, `break`/`continue`, `return` and inline `if`.
//!
//! A condition known at compile time becomes an unconditional jump, and
//! the branch it rules out is never evaluated.

use tracing::trace;
use zpp_diagnostic::ErrorCode;
use zpp_ir::{Block, Expr, ForStmt, IfStmt, Pos, VarDecl, WhileStmt};
use zpp_lir::BlockId;
use zpp_types::TypeId;

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::function::LoopTargets;
use crate::value::RealData;

use super::DeclType;

impl Generator {
    pub(super) fn eval_if(&mut self, stmt: &IfStmt) -> GenResult<()> {
        let exit = self.builder().new_block("if.exit");
        for branch in &stmt.branches {
            let cond = self.eval_condition(&branch.cond)?;
            match cond.comptime_truth() {
                Some(true) => {
                    trace!("comptime-true branch");
                    self.eval_branch(&branch.body, exit)?;
                    self.builder().position_at(exit);
                    return Ok(());
                }
                Some(false) => {}
                None => {
                    let bit = self.truth(&cond);
                    let builder = self.builder();
                    let then = builder.new_block("if.then");
                    let next = builder.new_block("if.else");
                    builder.terminate_branch(bit, then, next);
                    builder.position_at(then);
                    self.eval_branch(&branch.body, exit)?;
                    self.builder().position_at(next);
                }
            }
        }
        match &stmt.else_body {
            Some(body) => self.eval_branch(body, exit)?,
            None => self.builder().jump_if_open(exit),
        }
        self.builder().position_at(exit);
        Ok(())
    }

    fn eval_branch(&mut self, body: &Block, exit: BlockId) -> GenResult<()> {
        self.eval_scoped_block(body)?;
        self.builder().jump_if_open(exit);
        Ok(())
    }

    /// Branch on `cond` from the current block, folding comptime conditions.
    fn branch_on(&mut self, cond: &Expr, then: BlockId, otherwise: BlockId) -> GenResult<()> {
        let cond = self.eval_condition(cond)?;
        if let Some(truth) = cond.comptime_truth() {
            self.builder()
                .terminate_jump(if truth { then } else { otherwise });
            return Ok(());
        }
        let bit = self.truth(&cond);
        self.builder().terminate_branch(bit, then, otherwise);
        Ok(())
    }

    pub(super) fn eval_while(&mut self, stmt: &WhileStmt) -> GenResult<()> {
        let builder = self.builder();
        let check = builder.new_block("while.cond");
        let body = builder.new_block("while.body");
        let exit = builder.new_block("while.exit");
        builder.terminate_jump(check);

        builder.position_at(check);
        self.branch_on(&stmt.cond, body, exit)?;

        self.builder().position_at(body);
        self.eval_loop_body(&stmt.body, check, exit)?;
        self.builder().jump_if_open(check);

        self.builder().position_at(exit);
        Ok(())
    }

    pub(super) fn eval_for(&mut self, stmt: &ForStmt) -> GenResult<()> {
        self.push_sub_scope();
        if let Some(init) = &stmt.init {
            self.eval_for_init(init)?;
        }

        let builder = self.builder();
        let check = builder.new_block("for.cond");
        let body = builder.new_block("for.body");
        let step = builder.new_block("for.step");
        let exit = builder.new_block("for.exit");
        builder.terminate_jump(check);

        builder.position_at(check);
        self.branch_on(&stmt.cond, body, exit)?;

        self.builder().position_at(body);
        self.eval_loop_body(&stmt.body, step, exit)?;
        self.builder().jump_if_open(step);

        self.builder().position_at(step);
        if let Some(stmt) = &stmt.step {
            self.eval_stmt(stmt)?;
        }
        self.builder().jump_if_open(check);

        self.builder().position_at(exit);
        self.pop_scope()
    }

    fn eval_for_init(&mut self, init: &VarDecl) -> GenResult<()> {
        let ty = init.ty.as_ref().map_or(DeclType::Inferred, DeclType::Written);
        self.declare_local(init.name, ty, &init.init)
    }

    fn eval_loop_body(&mut self, body: &Block, continue_to: BlockId, break_to: BlockId) -> GenResult<()> {
        self.fcx().loops.push(LoopTargets {
            continue_to,
            break_to,
        });
        let result = self.eval_scoped_block(body);
        self.fcx().loops.pop();
        result
    }

    pub(super) fn eval_loop_jump(&mut self, is_break: bool, pos: Pos) -> GenResult<()> {
        let Some(targets) = self.fcx().loops.last().copied() else {
            let keyword = if is_break { "break" } else { "continue" };
            return Err(GenError::new(
                ErrorCode::BreakOrContinueOutsideLoop,
                format!("use of `{keyword}` statement outside of loop body"),
                pos,
            ));
        };
        let target = if is_break {
            targets.break_to
        } else {
            targets.continue_to
        };
        self.builder().terminate_jump(target);
        Ok(())
    }

    pub(super) fn eval_return(&mut self, value: Option<&Expr>, pos: Pos) -> GenResult<()> {
        let ret = self.ret_type();
        let Some(expr) = value else {
            if !self.pool.is_void(ret) {
                return Err(error::type_mismatch(&self.ty_name(ret), "void", pos));
            }
            self.builder().terminate_return(None);
            return Ok(());
        };
        let data = self.eval_expr(expr, Some(ret))?;
        self.expect_type(ret, &data, expr.pos)?;
        self.builder().terminate_return(Some(data.value));
        Ok(())
    }

    /// `then if cond else otherwise`: both arms must agree, and a runtime
    /// condition merges them through a phi.
    pub(crate) fn eval_inline_if(
        &mut self,
        cond: &Expr,
        then: &Expr,
        otherwise: &Expr,
        expected: Option<TypeId>,
    ) -> GenResult<RealData> {
        let cond = self.eval_condition(cond)?;
        if let Some(truth) = cond.comptime_truth() {
            return self.eval_expr(if truth { then } else { otherwise }, expected);
        }

        let bit = self.truth(&cond);
        let builder = self.builder();
        let then_block = builder.new_block("inline.then");
        let else_block = builder.new_block("inline.else");
        let exit = builder.new_block("inline.exit");
        builder.terminate_branch(bit, then_block, else_block);

        builder.position_at(then_block);
        let then_data = self.eval_expr(then, expected)?;
        let then_end = self.builder().current_block();
        self.builder().jump_if_open(exit);

        self.builder().position_at(else_block);
        let else_data = self.eval_expr(otherwise, Some(then_data.ty))?;
        let else_end = self.builder().current_block();
        self.builder().jump_if_open(exit);

        self.expect_compatible(then_data.ty, else_data.ty, otherwise.pos)?;

        let ty = then_data.ty;
        let builder = self.builder();
        builder.position_at(exit);
        let value = builder.emit_phi(
            ty,
            vec![(then_data.value, then_end), (else_data.value, else_end)],
        );
        Ok(RealData::runtime(ty, value))
    }
}
