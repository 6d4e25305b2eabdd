//! Symbols bound by scopes.

use std::rc::Rc;

use zpp_ir::{FnDecl, GlobalDecl, Pos, TypeDecl};
use zpp_lir::Operand;
use zpp_types::TypeId;

use crate::module::ModuleId;
use crate::value::RealData;

/// Index into the generator's symbol arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        SymbolId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// Module whose scope declared the symbol.
    pub module: ModuleId,
    pub pos: Pos,
}

/// Where a variable's value lives.
#[derive(Clone, Debug)]
pub enum Storage {
    /// Address of a stack slot or global.
    Slot(Operand),
    /// Comptime binding; nothing is emitted.
    Comptime(RealData),
}

#[derive(Clone, Debug)]
pub enum GlobalState {
    Pending,
    /// Initializer under evaluation; reaching it again is a cycle.
    Evaluating,
    Done { ty: TypeId, storage: Storage },
}

#[derive(Clone, Debug)]
pub enum SymbolKind {
    Function(Rc<FnDecl>),
    Type(Rc<TypeDecl>),
    GenericType(Rc<TypeDecl>),
    Global {
        decl: Rc<GlobalDecl>,
        comptime: bool,
        state: GlobalState,
    },
    Local {
        ty: TypeId,
        storage: Storage,
    },
    TypeAlias(TypeId),
    /// Synthetic function wrapping a test body.
    Test(Rc<FnDecl>),
}

impl SymbolKind {
    /// Noun used in "is not a ..." diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            SymbolKind::Function(_) => "function",
            SymbolKind::Type(_) | SymbolKind::TypeAlias(_) => "type",
            SymbolKind::GenericType(_) => "generic type",
            SymbolKind::Global { .. } => "global variable",
            SymbolKind::Local { .. } => "local variable",
            SymbolKind::Test(_) => "test",
        }
    }
}

/// Names starting with an uppercase letter bind compile-time values.
pub fn is_comptime_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
