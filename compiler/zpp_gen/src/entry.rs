//! Entry points: the `main` wrapper and the test runner.

use std::rc::Rc;

use rustc_hash::FxHashSet;
use zpp_diagnostic::ErrorCode;
use zpp_ir::{FnDecl, Ident, TypeExpr};
use zpp_lir::{Callee, CmpPred, Const, Linkage, Operand};
use zpp_types::TypeId;

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::function::{FnCx, FnInstance};
use crate::module::ModuleId;
use crate::symbol::{Symbol, SymbolKind};

impl Generator {
    /// Generate `main` of `module` and an external `main` calling it.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn gen_main(&mut self, module: ModuleId) -> GenResult<()> {
        let main = self.interner.intern("main");
        let Some(&sym) = self.modules[module.index()].base.get(&main) else {
            return Err(GenError::unpositioned(
                ErrorCode::UndeclaredSymbol,
                "id `main` not declared",
            ));
        };
        let symbol = self.symbol(sym);
        let pos = symbol.pos;
        match &symbol.kind {
            SymbolKind::Function(decl) if decl.generics.is_empty() => {}
            SymbolKind::Function(_) => return Err(invalid_main(pos)),
            _ => return Err(error::not_a(ErrorCode::NotAFunction, "main", "function", pos)),
        }

        let instance = self.gen_function(sym, &[])?;
        if !self.is_main_signature(&instance) {
            return Err(invalid_main(pos));
        }

        let params = instance.params.clone();
        self.fcx_stack
            .push(FnCx::new(&params, TypeId::I32, String::from("main")));
        let builder = self.builder();
        let args = (0..params.len())
            .filter_map(|i| builder.param(i))
            .map(Operand::from)
            .collect();
        let result = builder.emit_call(TypeId::I32, true, Callee::Direct(instance.func), args);
        builder.terminate_return(result.map(Operand::from));
        self.finish_entry(params);
        Ok(())
    }

    /// `(u32, *(mut) *u8) -> i32`
    fn is_main_signature(&self, instance: &FnInstance) -> bool {
        let argv_ok = |ty| {
            self.pool
                .pointee(ty)
                .is_some_and(|(_, pointee)| self.pool.equal(pointee, TypeId::CSTRING))
        };
        matches!(instance.params.as_slice(), [argc, argv]
            if self.pool.equal(*argc, TypeId::U32) && argv_ok(*argv))
            && self.pool.equal(instance.ret, TypeId::I32)
    }

    /// Generate every test of `module` and a `main` that runs them in order,
    /// printing one line per test.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn gen_tests(&mut self, module: ModuleId) -> GenResult<()> {
        let tests = self.modules[module.index()].tests.clone();
        let i32_name = self.interner.intern("i32");
        let mut seen = FxHashSet::default();
        let mut generated = Vec::with_capacity(tests.len());
        for test in &tests {
            if !seen.insert(test.description.as_str()) {
                return Err(GenError::new(
                    ErrorCode::DuplicateDeclaration,
                    format!("test `{}` already declared", test.description),
                    test.pos,
                ));
            }
            let name = self.interner.intern(&format!("test.`{}`", test.description));
            let decl = FnDecl {
                name: Ident::new(name, test.pos),
                generics: Vec::new(),
                params: Vec::new(),
                ret: TypeExpr::named(i32_name, test.pos),
                body: test.body.clone(),
            };
            let sym = self.alloc_symbol(Symbol {
                kind: SymbolKind::Test(Rc::new(decl)),
                module,
                pos: test.pos,
            });
            let instance = self.gen_function(sym, &[])?;
            generated.push((Rc::clone(test), instance.func));
        }
        tracing::debug!(tests = generated.len(), "tests generated");

        self.fcx_stack
            .push(FnCx::new(&[], TypeId::I32, String::from("main")));
        for (test, func) in generated {
            let location = self.location(test.pos);
            let builder = self.builder();
            let failure = builder.new_block("test.failure");
            let success = builder.new_block("test.success");
            let next = builder.new_block("test.next");

            let result = builder
                .emit_call(TypeId::I32, true, Callee::Direct(func), Vec::new())
                .map_or(Operand::Void, Operand::from);
            let failed = builder.emit_cmp(CmpPred::Ne, result, i32_const(0));
            builder.terminate_branch(failed.into(), failure, success);

            self.builder().position_at(success);
            self.emit_puts(&format!("[.] passed test at {location}: {}", test.description));
            self.builder().terminate_jump(next);

            self.builder().position_at(failure);
            self.emit_puts(&format!("[X] failed test at {location}: {}", test.description));
            self.builder().terminate_jump(next);

            self.builder().position_at(next);
        }
        self.builder().terminate_return(Some(i32_const(0)));
        self.finish_entry(Vec::new());
        Ok(())
    }

    fn finish_entry(&mut self, params: Vec<TypeId>) {
        if let Some(fcx) = self.fcx_stack.pop() {
            let main = fcx
                .builder
                .finish(String::from("main"), Linkage::External, params, TypeId::I32);
            self.output.add_function(main);
        }
    }
}

fn i32_const(value: i128) -> Operand {
    Const::Int {
        ty: TypeId::I32,
        value,
    }
    .into()
}

#[cold]
fn invalid_main(pos: zpp_ir::Pos) -> GenError {
    GenError::new(ErrorCode::InvalidMain, "invalid `main` prototype", pos)
}
