//! Calls to user functions.

use std::rc::Rc;

use smallvec::SmallVec;
use zpp_diagnostic::ErrorCode;
use zpp_ir::{Call, Expr, Pos};
use zpp_lir::{Callee, Operand};
use zpp_types::TypeId;

use crate::context::Generator;
use crate::error::{self, GenResult};
use crate::symbol::SymbolKind;
use crate::value::RealData;

impl Generator {
    /// Generate (or reuse) the callee for the evaluated generic arguments,
    /// then check the arguments against its signature.
    pub(super) fn eval_call(&mut self, call: &Call, pos: Pos) -> GenResult<RealData> {
        let callee = call.callee;
        let sym = self.lookup(callee.name, callee.pos)?;
        let SymbolKind::Function(decl) = &self.symbol(sym).kind else {
            return Err(error::not_a(
                ErrorCode::NotAFunction,
                self.interner.lookup(callee.name),
                "function",
                callee.pos,
            ));
        };
        let decl = Rc::clone(decl);

        if call.generics.len() != decl.generics.len() {
            return Err(error::arity(
                "generic args",
                decl.generics.len(),
                call.generics.len(),
                pos,
            ));
        }
        if call.args.len() != decl.params.len() {
            return Err(error::arity("args", decl.params.len(), call.args.len(), pos));
        }

        let generics = call
            .generics
            .iter()
            .map(|g| self.eval_type(g))
            .collect::<GenResult<SmallVec<[TypeId; 4]>>>()?;
        let instance = self.gen_function(sym, &generics)?;
        let args = self.eval_args(&call.args, &instance.params)?;
        Ok(self.emit_call_data(instance.ret, Callee::Direct(instance.func), args))
    }

    /// Evaluate each argument against its parameter type.
    pub(crate) fn eval_args(&mut self, args: &[Expr], params: &[TypeId]) -> GenResult<Vec<Operand>> {
        args.iter()
            .zip(params)
            .map(|(arg, &param)| {
                let data = self.eval_expr(arg, Some(param))?;
                self.expect_type(param, &data, arg.pos)?;
                Ok(data.value)
            })
            .collect()
    }

    pub(crate) fn emit_call_data(&mut self, ret: TypeId, callee: Callee, args: Vec<Operand>) -> RealData {
        let returns_value = !self.pool.is_void(ret);
        match self.builder().emit_call(ret, returns_value, callee, args) {
            Some(value) => RealData::runtime(ret, value),
            None => RealData::void(),
        }
    }
}
