//! Function generation and monomorphization.
//!
//! Each `(symbol, generic args)` key goes through pending, in progress and
//! done exactly once. The signature and the output slot are allocated
//! before the body is evaluated, so a recursive request finds the
//! in-progress entry and calls the slot directly.

use std::rc::Rc;

use tracing::{debug, trace};
use zpp_diagnostic::ErrorCode;
use zpp_ir::FnDecl;
use zpp_lir::{
    prune_unreachable_blocks, BlockId, Const, FuncId, Function, FunctionBuilder, Linkage, Operand,
    ValueId,
};
use zpp_types::TypeId;

use crate::context::Generator;
use crate::error::{GenError, GenResult};
use crate::module::ModuleId;
use crate::stack::ensure_sufficient_stack;
use crate::symbol::{Storage, SymbolId, SymbolKind};

/// A generated (or in-progress) function instance.
#[derive(Clone, Debug)]
pub struct FnInstance {
    pub func: FuncId,
    pub params: Vec<TypeId>,
    pub ret: TypeId,
}

#[derive(Copy, Clone, Debug)]
pub struct LoopTargets {
    pub continue_to: BlockId,
    pub break_to: BlockId,
}

/// Per-function generation state.
pub struct FnCx {
    pub builder: FunctionBuilder,
    /// Block holding every stack slot; jumps to `entry`.
    pub allocas: BlockId,
    pub ret: TypeId,
    /// Source name, for runtime messages.
    pub name: String,
    pub loops: Vec<LoopTargets>,
}

impl FnCx {
    pub fn new(params: &[TypeId], ret: TypeId, name: String) -> Self {
        let mut builder = FunctionBuilder::new(params);
        let allocas = builder.new_block("allocas");
        let entry = builder.new_block("entry");
        builder.position_at(allocas);
        builder.terminate_jump(entry);
        builder.position_at(entry);
        FnCx {
            builder,
            allocas,
            ret,
            name,
            loops: Vec::new(),
        }
    }

    pub fn scratch() -> Self {
        FnCx::new(&[], TypeId::VOID, String::from("<global>"))
    }
}

impl Generator {
    /// Generate `sym` instantiated with `generics`, or return the cached
    /// instance.
    pub(crate) fn gen_function(&mut self, sym: SymbolId, generics: &[TypeId]) -> GenResult<FnInstance> {
        if let Some((instance, state)) = self.fns.get(&self.pool, sym, generics) {
            trace!(func = instance.func.raw(), ?state, "function cache hit");
            return Ok(instance.clone());
        }

        let symbol = self.symbol(sym);
        let module = symbol.module;
        let (decl, is_test) = match &symbol.kind {
            SymbolKind::Function(decl) => (Rc::clone(decl), false),
            SymbolKind::Test(decl) => (Rc::clone(decl), true),
            other => {
                return Err(GenError::new(
                    ErrorCode::NotAFunction,
                    format!("{} is not a function", other.describe()),
                    symbol.pos,
                ))
            }
        };
        ensure_sufficient_stack(|| {
            self.with_module_scope(module, |g| {
                g.gen_function_in_scope(sym, module, &decl, is_test, generics)
            })
        })
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(name = self.interner.lookup(decl.name.name), generics = generics.len())
    )]
    fn gen_function_in_scope(
        &mut self,
        sym: SymbolId,
        module: ModuleId,
        decl: &FnDecl,
        is_test: bool,
        generics: &[TypeId],
    ) -> GenResult<FnInstance> {
        self.declare_generics(&decl.generics, generics)?;
        let params = decl
            .params
            .iter()
            .map(|p| self.eval_type(&p.ty))
            .collect::<GenResult<Vec<_>>>()?;
        let ret = self.eval_ret_type(&decl.ret)?;

        let text = self.interner.lookup(decl.name.name);
        let name = if generics.is_empty() {
            self.mangle(module, text)
        } else {
            let args = self.pool.display_list(generics, &self.interner);
            self.mangle(module, &format!("generic.{text}<{args}>"))
        };
        let func = self
            .output
            .add_function(Function::declaration(name.clone(), params.clone(), ret));
        let instance = FnInstance {
            func,
            params: params.clone(),
            ret,
        };
        self.fns.insert(&self.pool, sym, generics, instance.clone());
        debug!(%name, instances = self.fns.len(), "generating function");

        self.fcx_stack
            .push(FnCx::new(&params, ret, text.to_string()));
        self.push_sub_scope();
        for (i, param) in decl.params.iter().enumerate() {
            let slot = self.alloca(params[i]);
            let value = self.builder().param(i).map_or(Operand::Void, Operand::from);
            self.builder().emit_store(slot.into(), value);
            let kind = SymbolKind::Local {
                ty: params[i],
                storage: Storage::Slot(slot.into()),
            };
            self.declare(param.name.name, kind, param.name.pos)?;
        }

        self.eval_block(&decl.body)?;
        if !self.builder().is_terminated() {
            let current = self.builder().current_block();
            if is_test {
                let zero = Const::Int {
                    ty: TypeId::I32,
                    value: 0,
                };
                self.builder().terminate_return(Some(zero.into()));
            } else if self.pool.is_void(ret) {
                self.builder().terminate_return(None);
            } else if !self.builder().is_reachable(current) {
                self.builder().terminate_unreachable();
            } else {
                return Err(GenError::new(
                    ErrorCode::MissingReturn,
                    "not all paths return a value",
                    decl.name.pos,
                ));
            }
        }
        self.pop_scope()?;

        if let Some(fcx) = self.fcx_stack.pop() {
            let mut function = fcx.builder.finish(name, Linkage::Private, params, ret);
            prune_unreachable_blocks(&mut function);
            *self.output.function_mut(func) = function;
        }
        self.fns.finish(&self.pool, sym, generics);
        Ok(instance)
    }

    /// Stack slot for one `ty`, hoisted into the function's first block.
    pub(crate) fn alloca(&mut self, ty: TypeId) -> ValueId {
        let ptr_ty = self.pool.ptr(true, ty);
        let fcx = self.fcx();
        let block = fcx.allocas;
        fcx.builder.emit_alloca_in(block, ty, ptr_ty)
    }

    /// Return type of the function being generated.
    pub(crate) fn ret_type(&mut self) -> TypeId {
        self.fcx().ret
    }
}
