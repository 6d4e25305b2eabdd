//! Scope stack: declaration, lookup and deferred statements.
//!
//! Every frame is a persistent map, so entering a block copies the current
//! frame and entering a function copies its module's base frame in O(1).
//! Only the top frame is ever searched: it already holds everything visible
//! from the enclosing frames.

use zpp_ir::{ImportNames, Name, Pos, Stmt};
use zpp_types::TypePool;

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::module::ModuleId;
use crate::symbol::{Symbol, SymbolId, SymbolKind};

#[derive(Clone, Debug)]
pub struct Frame {
    pub module: ModuleId,
    pub bindings: im::HashMap<Name, SymbolId>,
    /// Replayed in order when the frame is popped.
    pub defers: Vec<Stmt>,
}

impl Generator {
    /// Module of the innermost scope.
    pub(crate) fn current_module(&self) -> ModuleId {
        self.scopes.last().map_or(ModuleId::ENTRY, |f| f.module)
    }

    /// Enter a function or generic scope of `module`, starting from its
    /// top-level declarations.
    pub(crate) fn push_scope(&mut self, module: ModuleId) {
        let bindings = self.modules[module.index()].base.clone();
        self.scopes.push(Frame {
            module,
            bindings,
            defers: Vec::new(),
        });
    }

    /// Enter a block scope that sees the current locals.
    pub(crate) fn push_sub_scope(&mut self) {
        let frame = match self.scopes.last() {
            Some(top) => Frame {
                module: top.module,
                bindings: top.bindings.clone(),
                defers: Vec::new(),
            },
            None => Frame {
                module: ModuleId::ENTRY,
                bindings: im::HashMap::new(),
                defers: Vec::new(),
            },
        };
        self.scopes.push(frame);
    }

    /// Leave the innermost scope, replaying its deferred statements first.
    ///
    /// Deferred statements go before the current block's terminator when it
    /// already has one.
    pub(crate) fn pop_scope(&mut self) -> GenResult<()> {
        let defers = self
            .scopes
            .last_mut()
            .map(|f| std::mem::take(&mut f.defers))
            .unwrap_or_default();
        if !defers.is_empty() {
            tracing::trace!(count = defers.len(), "replaying deferred statements");
            let terminator = self.builder().take_terminator();
            for stmt in &defers {
                self.eval_stmt(stmt)?;
            }
            self.builder().restore_terminator(terminator);
        }
        self.scopes.pop();
        Ok(())
    }

    /// Run `f` with `module`'s top-level scope active.
    pub(crate) fn with_module_scope<R>(
        &mut self,
        module: ModuleId,
        f: impl FnOnce(&mut Self) -> GenResult<R>,
    ) -> GenResult<R> {
        self.push_scope(module);
        let result = f(self);
        self.scopes.pop();
        result
    }

    pub(crate) fn defer(&mut self, stmt: Stmt) {
        if let Some(frame) = self.scopes.last_mut() {
            frame.defers.insert(0, stmt);
        }
    }

    /// Bind `name` in the innermost scope.
    pub(crate) fn declare(&mut self, name: Name, kind: SymbolKind, pos: Pos) -> GenResult<SymbolId> {
        let text = self.interner.lookup(name);
        if TypePool::builtin(text).is_some() {
            return Err(GenError::new(
                zpp_diagnostic::ErrorCode::DuplicateDeclaration,
                format!("id `{text}` is reserved"),
                pos,
            ));
        }
        let module = self.current_module();
        if let Some(import_pos) = self.imported_by(module, name) {
            return Err(error::declared_by_import(text, import_pos, pos));
        }
        if self
            .scopes
            .last()
            .is_some_and(|f| f.bindings.contains_key(&name))
        {
            return Err(error::already_declared(text, pos));
        }

        tracing::trace!(name = text, kind = kind.describe(), "declare");
        let id = self.alloc_symbol(Symbol { kind, module, pos });
        if let Some(frame) = self.scopes.last_mut() {
            frame.bindings.insert(name, id);
        }
        Ok(id)
    }

    /// Resolve `name`: imports of the current module first, then the
    /// innermost scope.
    pub(crate) fn lookup(&self, name: Name, pos: Pos) -> GenResult<SymbolId> {
        let module = self.current_module();
        for import in &self.modules[module.index()].imports {
            let source = match &import.names {
                ImportNames::All => name,
                ImportNames::List(list) => {
                    match list.iter().find(|n| n.alias.name == name) {
                        Some(entry) => entry.name.name,
                        None => continue,
                    }
                }
            };
            if let Some(&id) = self.modules[import.module.index()].base.get(&source) {
                return Ok(id);
            }
            if matches!(import.names, ImportNames::List(_)) {
                return Err(error::undeclared(self.interner.lookup(source), pos));
            }
        }

        self.scopes
            .last()
            .and_then(|f| f.bindings.get(&name).copied())
            .ok_or_else(|| error::undeclared(self.interner.lookup(name), pos))
    }

    /// Position of the import that makes `name` visible in `module`.
    fn imported_by(&self, module: ModuleId, name: Name) -> Option<Pos> {
        self.modules[module.index()]
            .imports
            .iter()
            .find_map(|import| match &import.names {
                ImportNames::All => self.modules[import.module.index()]
                    .base
                    .contains_key(&name)
                    .then_some(import.pos),
                ImportNames::List(list) => list
                    .iter()
                    .find(|n| n.alias.name == name)
                    .map(|n| n.alias.pos),
            })
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "a compilation never declares 4 billion symbols"
    )]
    pub(crate) fn alloc_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId::new(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    #[inline]
    pub(crate) fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    #[inline]
    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }
}
