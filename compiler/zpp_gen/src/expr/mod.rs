//! Expression evaluation.
//!
//! Every expression is evaluated against an optional expected type. The
//! expectation only guides literals and constructors; the caller still
//! checks the resulting type.

mod access;
mod aggregates;
mod calls;
mod cast;
mod intrinsics;
mod literals;
mod operators;

use std::rc::Rc;

use tracing::{debug, trace};
use zpp_diagnostic::ErrorCode;
use zpp_ir::{Expr, ExprKind, GlobalDecl, Name, Pos};
use zpp_lir::{CmpPred, Const, Global, GlobalInit, Linkage, Operand};
use zpp_types::TypeId;

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::stack::ensure_sufficient_stack;
use crate::symbol::{GlobalState, Storage, SymbolId, SymbolKind};
use crate::value::RealData;

impl Generator {
    /// Evaluate a value expression: the result must have a concrete,
    /// non-`void` type.
    pub(crate) fn eval_expr(&mut self, expr: &Expr, expected: Option<TypeId>) -> GenResult<RealData> {
        let data = self.eval_expr_inner(expr, expected)?;
        if self.pool.is_void(data.ty) {
            return Err(GenError::new(
                ErrorCode::VoidNotAllowed,
                "expression not allowed to be `void`",
                expr.pos,
            ));
        }
        self.check_concrete(&data, expr.pos)?;
        Ok(data)
    }

    /// Evaluate an expression statement, where `void` is accepted.
    pub(crate) fn eval_expr_stmt(&mut self, expr: &Expr) -> GenResult<RealData> {
        let data = self.eval_expr_inner(expr, None)?;
        self.check_concrete(&data, expr.pos)?;
        Ok(data)
    }

    /// Evaluate without checking the result type.
    pub(crate) fn eval_expr_inner(
        &mut self,
        expr: &Expr,
        expected: Option<TypeId>,
    ) -> GenResult<RealData> {
        ensure_sufficient_stack(|| self.eval_expr_kind(expr, expected))
    }

    fn check_concrete(&self, data: &RealData, pos: Pos) -> GenResult<()> {
        if self.pool.is_placeholder(data.ty) {
            return Err(GenError::new(
                ErrorCode::TypeMismatch,
                "expression has no clear type here",
                pos,
            ));
        }
        if self.pool.is_fn(data.ty) {
            return Err(GenError::new(
                ErrorCode::TypeMismatch,
                "expression has no concrete type here",
                pos,
            ));
        }
        Ok(())
    }

    fn eval_expr_kind(&mut self, expr: &Expr, expected: Option<TypeId>) -> GenResult<RealData> {
        let pos = expr.pos;
        match &expr.kind {
            ExprKind::Int(value) => Ok(self.eval_int(*value, expected)),
            ExprKind::Float(value) => Ok(self.eval_float(*value, expected)),
            ExprKind::Char(c) => Ok(self.eval_char(*c, expected)),
            ExprKind::Str(text) => Ok(self.eval_str(text)),
            ExprKind::True => Ok(self.eval_bool(true, expected)),
            ExprKind::False => Ok(self.eval_bool(false, expected)),
            ExprKind::Null => Ok(self.eval_null(expected)),
            ExprKind::Undefined => self.eval_undefined(expected, pos),
            ExprKind::Ident(name) => self.eval_ident(*name, pos),
            ExprKind::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs, expected, pos),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, expected),
            ExprKind::AddrOf { mutable, operand } => {
                self.eval_addr_of(*mutable, operand, expected, pos)
            }
            ExprKind::Cast { expr, ty } => self.eval_cast(expr, ty, pos),
            ExprKind::Call(call) if call.intrinsic => self.eval_intrinsic(call, expected, pos),
            ExprKind::Call(call) => self.eval_call(call, pos),
            ExprKind::Field { base, field } => self.eval_field(base, *field),
            ExprKind::Index { base, index } => self.eval_index(base, index),
            ExprKind::ArrayInit(elems) => self.eval_array_init(elems, expected, pos),
            ExprKind::StructInit(fields) => self.eval_struct_init(fields, expected),
            ExprKind::UnionInit(field) => self.eval_union_init(field, expected, pos),
            ExprKind::InlineIf {
                cond,
                then,
                otherwise,
            } => self.eval_inline_if(cond, then, otherwise, expected),
            ExprKind::OutParam { name, ty } => self.eval_out_param(*name, ty, pos),
        }
    }

    // Expectations

    pub(crate) fn numeric_or(&self, expected: Option<TypeId>, fallback: TypeId) -> TypeId {
        expected
            .filter(|&ty| self.pool.is_numeric(ty))
            .unwrap_or(fallback)
    }

    pub(crate) fn int_or(&self, expected: Option<TypeId>, fallback: TypeId) -> TypeId {
        expected
            .filter(|&ty| self.pool.is_int(ty))
            .unwrap_or(fallback)
    }

    // Checks

    pub(crate) fn expect_type(&self, expected: TypeId, data: &RealData, pos: Pos) -> GenResult<()> {
        if self.pool.equal(expected, data.ty) {
            return Ok(());
        }
        Err(error::type_mismatch(
            &self.ty_name(expected),
            &self.ty_name(data.ty),
            pos,
        ))
    }

    pub(crate) fn expect_int(&self, data: &RealData, pos: Pos) -> GenResult<()> {
        if self.pool.is_int(data.ty) {
            return Ok(());
        }
        Err(error::expected_kind("integer", &self.ty_name(data.ty), pos))
    }

    pub(crate) fn expect_numeric(&self, data: &RealData, pos: Pos) -> GenResult<()> {
        if self.pool.is_numeric(data.ty) {
            return Ok(());
        }
        Err(error::expected_kind("numeric expression", &self.ty_name(data.ty), pos))
    }

    pub(crate) fn expect_comptime(data: &RealData, pos: Pos) -> GenResult<()> {
        if data.is_comptime() {
            return Ok(());
        }
        Err(error::not_comptime(pos))
    }

    // Conditions

    /// Evaluate a condition: an integer, `u8` by default.
    pub(crate) fn eval_condition(&mut self, cond: &Expr) -> GenResult<RealData> {
        let data = self.eval_expr(cond, Some(TypeId::U8))?;
        self.expect_int(&data, cond.pos)?;
        Ok(data)
    }

    /// One-bit truth of a runtime condition.
    pub(crate) fn truth(&mut self, data: &RealData) -> Operand {
        let zero = Const::Int {
            ty: data.ty,
            value: 0,
        };
        self.builder()
            .emit_cmp(CmpPred::Ne, data.value.clone(), zero.into())
            .into()
    }

    // Variables

    fn eval_ident(&mut self, name: Name, pos: Pos) -> GenResult<RealData> {
        let sym = self.lookup(name, pos)?;
        let (ty, storage) = match &self.symbol(sym).kind {
            SymbolKind::Local { ty, storage } => (*ty, storage.clone()),
            SymbolKind::Global {
                decl,
                comptime,
                state,
            } => match state {
                GlobalState::Done { ty, storage } => (*ty, storage.clone()),
                GlobalState::Evaluating => {
                    return Err(GenError::new(
                        ErrorCode::RecursiveGlobal,
                        format!(
                            "global `{}` depends on its own value",
                            self.interner.lookup(name)
                        ),
                        pos,
                    ))
                }
                GlobalState::Pending => {
                    let (decl, comptime) = (Rc::clone(decl), *comptime);
                    self.eval_global(sym, &decl, comptime)?
                }
            },
            _ => {
                return Err(error::not_a(
                    ErrorCode::NotAVariable,
                    self.interner.lookup(name),
                    "variable",
                    pos,
                ))
            }
        };
        Ok(self.read_storage(ty, storage))
    }

    fn read_storage(&mut self, ty: TypeId, storage: Storage) -> RealData {
        match storage {
            Storage::Comptime(data) => data.fixed(),
            Storage::Slot(ptr) => RealData::runtime(ty, self.builder().emit_load(ty, ptr)),
        }
    }

    /// Evaluate a global's initializer in its own module, outside any
    /// function, and bind its storage.
    #[tracing::instrument(level = "debug", skip_all, fields(name = self.interner.lookup(decl.name.name)))]
    fn eval_global(
        &mut self,
        sym: SymbolId,
        decl: &GlobalDecl,
        comptime: bool,
    ) -> GenResult<(TypeId, Storage)> {
        self.set_global_state(sym, GlobalState::Evaluating);
        let module = self.symbol(sym).module;

        let outer = std::mem::take(&mut self.fcx_stack);
        let result = self.with_module_scope(module, |g| {
            let ty = g.eval_type(&decl.ty)?;
            let data = g.eval_expr(&decl.init, Some(ty))?;
            g.expect_type(ty, &data, decl.init.pos)?;
            Ok((ty, data))
        });
        self.fcx_stack = outer;
        let (ty, data) = result?;

        let storage = if comptime {
            Self::expect_comptime(&data, decl.init.pos)?;
            Storage::Comptime(data.settle(&self.pool))
        } else {
            let init = match data.value {
                _ if matches!(decl.init.kind, ExprKind::Undefined) => Const::Zero { ty },
                Operand::Const(init) => init,
                _ => return Err(error::not_comptime(decl.init.pos)),
            };
            let name = self.mangle(module, self.interner.lookup(decl.name.name));
            let id = self.output.add_global(Global {
                name,
                ty,
                init: GlobalInit::Const(init),
                linkage: Linkage::Private,
                constant: false,
            });
            Storage::Slot(Const::Global(id).into())
        };
        debug!(comptime, ty = %self.ty_name(ty), "global evaluated");
        self.set_global_state(
            sym,
            GlobalState::Done {
                ty,
                storage: storage.clone(),
            },
        );
        Ok((ty, storage))
    }

    fn set_global_state(&mut self, sym: SymbolId, new: GlobalState) {
        if let SymbolKind::Global { state, .. } = &mut self.symbol_mut(sym).kind {
            trace!(sym = sym.index(), "global state updated");
            *state = new;
        }
    }
}
