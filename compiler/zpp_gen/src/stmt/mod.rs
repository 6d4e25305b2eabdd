//! Statement evaluation.
//!
//! Statements emit into the current block of the function being
//! generated. `try`, `match` and short-circuit operators are rewritten into
//! declarations and `if` chains before evaluation (see `lower.rs`).

mod assign;
mod control_flow;
mod lower;

use zpp_diagnostic::ErrorCode;
use zpp_ir::{Block, Expr, Ident, Stmt, StmtKind, TypeExpr};
use zpp_lir::{Const, Operand};
use zpp_types::TypeId;

use crate::context::Generator;
use crate::error::{GenError, GenResult};
use crate::stack::ensure_sufficient_stack;
use crate::symbol::{is_comptime_name, Storage, SymbolKind};

/// Declared type of a local.
#[derive(Copy, Clone, Debug)]
pub(crate) enum DeclType<'a> {
    Written(&'a TypeExpr),
    /// Already evaluated, for locals introduced by lowering.
    Known(TypeId),
    /// Taken from the initializer.
    Inferred,
}

impl Generator {
    /// Evaluate `block` in the current scope. A statement after one that
    /// ended the block is an error.
    pub(crate) fn eval_block(&mut self, block: &Block) -> GenResult<()> {
        for stmt in block {
            if self.builder().is_terminated() {
                return Err(GenError::new(
                    ErrorCode::UnreachableCode,
                    "unreachable code",
                    stmt.pos,
                ));
            }
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    /// Evaluate `block` in a fresh sub-scope.
    pub(crate) fn eval_scoped_block(&mut self, block: &Block) -> GenResult<()> {
        self.push_sub_scope();
        self.eval_block(block)?;
        self.pop_scope()
    }

    pub(crate) fn eval_stmt(&mut self, stmt: &Stmt) -> GenResult<()> {
        ensure_sufficient_stack(|| self.eval_stmt_kind(stmt))
    }

    fn eval_stmt_kind(&mut self, stmt: &Stmt) -> GenResult<()> {
        let pos = stmt.pos;
        match &stmt.kind {
            StmtKind::VarDecl(decl) => {
                let ty = decl.ty.as_ref().map_or(DeclType::Inferred, DeclType::Written);
                self.declare_local(decl.name, ty, &decl.init)
            }
            StmtKind::Assign(assign) => self.eval_assign(assign, pos),
            StmtKind::If(stmt) => self.eval_if(stmt),
            StmtKind::While(stmt) => self.eval_while(stmt),
            StmtKind::For(stmt) => self.eval_for(stmt),
            StmtKind::Break => self.eval_loop_jump(true, pos),
            StmtKind::Continue => self.eval_loop_jump(false, pos),
            StmtKind::Return(value) => self.eval_return(value.as_ref(), pos),
            StmtKind::Pass => Ok(()),
            StmtKind::Defer(stmt) => {
                self.defer((**stmt).clone());
                Ok(())
            }
            StmtKind::Try(stmt) => self.lower_try(stmt, pos),
            StmtKind::Match(stmt) => self.lower_match(stmt),
            StmtKind::Expr(expr) => self.eval_expr_as_stmt(expr),
        }
    }

    /// Declare a local. Comptime names bind the initializer's value
    /// directly; everything else gets a stack slot.
    pub(crate) fn declare_local(
        &mut self,
        name: Ident,
        ty: DeclType<'_>,
        init: &Expr,
    ) -> GenResult<()> {
        let declared = match ty {
            DeclType::Written(te) => Some(self.eval_type(te)?),
            DeclType::Known(ty) => Some(ty),
            DeclType::Inferred => None,
        };
        let data = self.eval_expr(init, declared)?;
        let ty = match declared {
            Some(ty) => {
                self.expect_type(ty, &data, init.pos)?;
                ty
            }
            None => data.ty,
        };

        let storage = if is_comptime_name(self.interner.lookup(name.name)) {
            Self::expect_comptime(&data, init.pos)?;
            Storage::Comptime(data.settle(&self.pool))
        } else {
            let slot = self.alloca(ty);
            if !matches!(data.value, Operand::Const(Const::Undef { .. })) {
                self.builder().emit_store(slot.into(), data.value);
            }
            Storage::Slot(slot.into())
        };
        self.declare(name.name, SymbolKind::Local { ty, storage }, name.pos)?;
        Ok(())
    }

    fn eval_expr_as_stmt(&mut self, expr: &Expr) -> GenResult<()> {
        let data = self.eval_expr_stmt(expr)?;
        if self.pool.is_void(data.ty) {
            return Ok(());
        }
        Err(GenError::new(
            ErrorCode::UndiscardedExpression,
            format!(
                "undiscarded expression of type `{}` as statement",
                self.ty_name(data.ty)
            ),
            expr.pos,
        ))
    }
}
