//! The compilation context.

use std::fmt;
use std::path::PathBuf;

use rustc_hash::FxHashMap;
use zpp_ir::{Pos, SourceMap, StringInterner};
use zpp_lir::{
    Const, FuncId, Function, FunctionBuilder, Global, GlobalId, GlobalInit, Linkage, Module,
    Operand,
};
use zpp_types::{TypeId, TypePool};

use crate::config::GenConfig;
use crate::function::{FnCx, FnInstance};
use crate::loader::ModuleLoader;
use crate::mono::MonoCache;
use crate::module::{ModuleData, ModuleId};
use crate::scope::Frame;
use crate::symbol::{Symbol, SymbolId};

/// Everything one compilation shares: the type pool, the output module,
/// the module graph, symbols, scopes and every cache.
///
/// There is exactly one evaluation thread, so caches are plain fields
/// mutated in place.
pub struct Generator {
    pub(crate) interner: StringInterner,
    pub(crate) pool: TypePool,
    pub(crate) output: Module,
    pub(crate) sources: SourceMap,
    pub(crate) loader: Box<dyn ModuleLoader>,
    pub(crate) config: GenConfig,

    pub(crate) modules: Vec<ModuleData>,
    pub(crate) module_by_path: FxHashMap<PathBuf, ModuleId>,
    pub(crate) symbols: Vec<Symbol>,
    pub(crate) scopes: Vec<Frame>,

    pub(crate) fns: MonoCache<FnInstance>,
    /// Completed (or in-progress placeholder) type of each named type.
    pub(crate) named_types: FxHashMap<SymbolId, TypeId>,
    pub(crate) generic_types: MonoCache<TypeId>,

    strings: FxHashMap<String, GlobalId>,
    lib_fns: FxHashMap<String, FuncId>,
    lib_vars: FxHashMap<String, GlobalId>,

    pub(crate) fcx_stack: Vec<FnCx>,
    /// Target for code evaluated outside any function, such as global
    /// initializers and array lengths. Only comptime values are accepted
    /// there, so nothing lands in it.
    scratch: FnCx,
    /// Counter for temporaries introduced by lowering.
    pub(crate) internal_vars: u32,
}

impl Generator {
    pub fn new(loader: impl ModuleLoader + 'static, config: GenConfig) -> Self {
        let interner = StringInterner::new();
        let pool = TypePool::new(&interner);
        Generator {
            interner,
            pool,
            output: Module::default(),
            sources: SourceMap::new(),
            loader: Box::new(loader),
            config,
            modules: Vec::new(),
            module_by_path: FxHashMap::default(),
            symbols: Vec::new(),
            scopes: Vec::new(),
            fns: MonoCache::default(),
            named_types: FxHashMap::default(),
            generic_types: MonoCache::default(),
            strings: FxHashMap::default(),
            lib_fns: FxHashMap::default(),
            lib_vars: FxHashMap::default(),
            fcx_stack: Vec::new(),
            scratch: FnCx::scratch(),
            internal_vars: 0,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn pool(&self) -> &TypePool {
        &self.pool
    }

    pub fn output(&self) -> &Module {
        &self.output
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn finish(self) -> Compilation {
        Compilation {
            module: self.output,
            pool: self.pool,
            interner: self.interner,
            sources: self.sources,
        }
    }

    // Function context

    /// Context of the function being generated.
    pub(crate) fn fcx(&mut self) -> &mut FnCx {
        match self.fcx_stack.last_mut() {
            Some(fcx) => fcx,
            None => &mut self.scratch,
        }
    }

    #[inline]
    pub(crate) fn builder(&mut self) -> &mut FunctionBuilder {
        &mut self.fcx().builder
    }

    // Naming

    pub(crate) fn mangle(&self, module: ModuleId, name: &str) -> String {
        format!("{}::{name}", self.module_path(module))
    }

    /// `'path' [line: L, col: C]`
    pub(crate) fn location(&self, pos: Pos) -> String {
        let path = self
            .sources
            .path(pos.file)
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        format!("'{path}' [line: {}, col: {}]", pos.line, pos.col)
    }

    // Shared output entities

    /// Address of a NUL-terminated global holding `text`, interned once per
    /// content.
    pub(crate) fn intern_string(&mut self, text: &str) -> Const {
        if let Some(&id) = self.strings.get(text) {
            return Const::Global(id);
        }
        let module = self.current_module();
        let n = self.modules[module.index()].strings;
        self.modules[module.index()].strings += 1;

        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        let ty = self.pool.array(bytes.len() as u64, TypeId::U8);
        let id = self.output.add_global(Global {
            name: self.mangle(module, &format!("str.{n}")),
            ty,
            init: GlobalInit::Bytes(bytes),
            linkage: Linkage::Private,
            constant: true,
        });
        self.strings.insert(text.to_string(), id);
        Const::Global(id)
    }

    /// Declaration of the external function `name`, created on first use.
    pub(crate) fn lib_fn(&mut self, name: &str, params: Vec<TypeId>, ret: TypeId) -> FuncId {
        if let Some(&id) = self.lib_fns.get(name) {
            return id;
        }
        let id = self
            .output
            .add_function(Function::declaration(name.to_string(), params, ret));
        self.lib_fns.insert(name.to_string(), id);
        id
    }

    /// External global `name`, created on first use.
    pub(crate) fn lib_var(&mut self, name: &str, ty: TypeId) -> GlobalId {
        if let Some(&id) = self.lib_vars.get(name) {
            return id;
        }
        let id = self.output.add_global(Global {
            name: name.to_string(),
            ty,
            init: GlobalInit::External,
            linkage: Linkage::External,
            constant: false,
        });
        self.lib_vars.insert(name.to_string(), id);
        id
    }

    /// Print `message` on its own line through `puts`.
    pub(crate) fn emit_puts(&mut self, message: &str) {
        let puts = self.lib_fn("puts", vec![TypeId::CSTRING], TypeId::I32);
        let text = self.intern_string(message);
        self.builder().emit_call(
            TypeId::I32,
            true,
            zpp_lir::Callee::Direct(puts),
            vec![Operand::Const(text)],
        );
    }
}

/// Output of a successful compilation.
pub struct Compilation {
    pub module: Module,
    pub pool: TypePool,
    pub interner: StringInterner,
    pub sources: SourceMap,
}

impl Compilation {
    /// LLVM-flavoured text of the module.
    pub fn display(&self) -> impl fmt::Display + '_ {
        self.module.display(&self.pool)
    }
}
