//! Module graph: loading, item mapping and import checks.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use zpp_diagnostic::ErrorCode;
use zpp_ir::{Ident, ImportNames, Item, Name, Pos, TestDecl};
use zpp_types::TypePool;

use crate::context::Generator;
use crate::error::{self, GenError, GenResult};
use crate::loader::{absolute_path, resolve_sibling};
use crate::stack::ensure_sufficient_stack;
use crate::symbol::{is_comptime_name, GlobalState, Symbol, SymbolId, SymbolKind};

/// Handle of a loaded source file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ModuleId(u32);

impl ModuleId {
    /// The module compilation started from.
    pub const ENTRY: ModuleId = ModuleId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct Import {
    pub module: ModuleId,
    pub names: ImportNames,
    pub pos: Pos,
}

#[derive(Clone, Debug)]
pub struct ModuleData {
    pub path: PathBuf,
    /// Top-level declarations.
    pub base: im::HashMap<Name, SymbolId>,
    pub imports: Vec<Import>,
    pub tests: Vec<Rc<TestDecl>>,
    /// Counter for interned string globals.
    pub strings: u32,
}

impl Generator {
    /// Load the entry file and everything it imports, then validate every
    /// module's imports.
    pub fn load_entry(&mut self, path: &Path) -> GenResult<ModuleId> {
        let path = absolute_path(path).map_err(|err| {
            GenError::unpositioned(
                ErrorCode::ImportNotFound,
                format!("cannot resolve `{}`: {err}", path.display()),
            )
        })?;
        self.output.name = path.display().to_string();
        let entry = self.load_module(path, None)?;
        for index in 0..self.modules.len() {
            self.check_imports(ModuleId(module_index(index)))?;
        }
        debug!(modules = self.modules.len(), "module graph loaded");
        Ok(entry)
    }

    /// Load `path` unless it is already cached, mapping its declarations
    /// and recursively loading its imports.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    fn load_module(&mut self, path: PathBuf, import_pos: Option<Pos>) -> GenResult<ModuleId> {
        if let Some(&id) = self.module_by_path.get(&path) {
            trace!("module cache hit");
            return Ok(id);
        }

        let file = self.sources.reserve(&path);
        let Some(loaded) = self.loader.load(&path, file, &self.interner) else {
            let message = format!("file not found (`{}`)", path.display());
            return Err(match import_pos {
                Some(pos) => GenError::new(ErrorCode::ImportNotFound, message, pos),
                None => GenError::unpositioned(ErrorCode::ImportNotFound, message),
            });
        };
        self.sources.set_text(file, loaded.source);

        let id = ModuleId(module_index(self.modules.len()));
        self.modules.push(ModuleData {
            path: path.clone(),
            base: im::HashMap::new(),
            imports: Vec::new(),
            tests: Vec::new(),
            strings: 0,
        });
        self.module_by_path.insert(path.clone(), id);

        let mut imports = Vec::new();
        for item in loaded.items {
            match item {
                Item::Import(decl) => imports.push(decl),
                Item::Test(test) => self.modules[id.index()].tests.push(test),
                Item::Function(decl) => {
                    let name = decl.name;
                    self.map_item(id, name, SymbolKind::Function(decl))?;
                }
                Item::Type(decl) => {
                    let name = decl.name;
                    let kind = if decl.generics.is_empty() {
                        SymbolKind::Type(decl)
                    } else {
                        SymbolKind::GenericType(decl)
                    };
                    self.map_item(id, name, kind)?;
                }
                Item::Global(decl) => {
                    let name = decl.name;
                    let comptime = is_comptime_name(self.interner.lookup(name.name));
                    let kind = SymbolKind::Global {
                        decl,
                        comptime,
                        state: GlobalState::Pending,
                    };
                    self.map_item(id, name, kind)?;
                }
            }
        }

        let mut seen = FxHashSet::default();
        for decl in imports {
            let target = resolve_sibling(&path, &decl.path);
            if !seen.insert(target.clone()) {
                return Err(GenError::new(
                    ErrorCode::ImportConflict,
                    format!("module `{}` already imported", decl.path),
                    decl.pos,
                ));
            }
            let module = ensure_sufficient_stack(|| self.load_module(target, Some(decl.pos)))?;
            self.modules[id.index()].imports.push(Import {
                module,
                names: decl.names,
                pos: decl.pos,
            });
        }
        Ok(id)
    }

    fn map_item(&mut self, module: ModuleId, name: Ident, kind: SymbolKind) -> GenResult<()> {
        let text = self.interner.lookup(name.name);
        if TypePool::builtin(text).is_some() {
            return Err(GenError::new(
                ErrorCode::DuplicateDeclaration,
                format!("id `{text}` is reserved"),
                name.pos,
            ));
        }
        if self.modules[module.index()].base.contains_key(&name.name) {
            return Err(error::already_declared(text, name.pos));
        }
        let id = self.alloc_symbol(Symbol {
            kind,
            module,
            pos: name.pos,
        });
        self.modules[module.index()].base.insert(name.name, id);
        Ok(())
    }

    fn check_imports(&self, module: ModuleId) -> GenResult<()> {
        let data = &self.modules[module.index()];
        for (i, import) in data.imports.iter().enumerate() {
            let source = &self.modules[import.module.index()].base;
            let ImportNames::List(list) = &import.names else {
                if let Some(name) = source.keys().find(|n| data.base.contains_key(*n)) {
                    return Err(self.import_conflict(*name, import.pos));
                }
                continue;
            };

            let mut names = FxHashSet::default();
            let mut aliases = FxHashSet::default();
            for entry in list {
                if !names.insert(entry.name.name) {
                    return Err(self.import_conflict(entry.name.name, entry.name.pos));
                }
                if !aliases.insert(entry.alias.name) {
                    return Err(self.import_conflict(entry.alias.name, entry.alias.pos));
                }
                if !source.contains_key(&entry.name.name) {
                    return Err(error::undeclared(
                        self.interner.lookup(entry.name.name),
                        entry.name.pos,
                    ));
                }
                let clashes_with_other = data
                    .imports
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && self.exposes(other, entry.alias.name));
                if data.base.contains_key(&entry.alias.name) || clashes_with_other {
                    return Err(self.import_conflict(entry.alias.name, entry.alias.pos));
                }
            }
        }
        Ok(())
    }

    fn exposes(&self, import: &Import, name: Name) -> bool {
        match &import.names {
            ImportNames::All => self.modules[import.module.index()].base.contains_key(&name),
            ImportNames::List(list) => list.iter().any(|n| n.alias.name == name),
        }
    }

    #[cold]
    fn import_conflict(&self, name: Name, pos: Pos) -> GenError {
        GenError::new(
            ErrorCode::ImportConflict,
            format!("id `{}` conflicts with another import or declaration", self.interner.lookup(name)),
            pos,
        )
    }

    /// Path of `module` as it appears in mangled names and messages.
    pub(crate) fn module_path(&self, module: ModuleId) -> String {
        self.modules[module.index()].path.display().to_string()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "a compilation never loads 4 billion modules"
)]
fn module_index(index: usize) -> u32 {
    index as u32
}
