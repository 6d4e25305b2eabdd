//! The compilation's output module.

use std::collections::BTreeSet;
use std::path::PathBuf;

use zpp_types::TypeId;

use crate::{Const, FuncId, Function, GlobalId, Linkage};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum GlobalInit {
    Const(Const),
    /// Byte string with a trailing NUL, typed `[N x u8]`.
    Bytes(Vec<u8>),
    /// Defined in a library the module links against.
    External,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Global {
    pub name: String,
    pub ty: TypeId,
    pub init: GlobalInit,
    pub linkage: Linkage,
    pub constant: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
    pub globals: Vec<Global>,
    /// Libraries referenced by `extern_*` intrinsics.
    pub libs: BTreeSet<PathBuf>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            ..Module::default()
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "function counts never exceed u32"
    )]
    pub fn add_function(&mut self, function: Function) -> FuncId {
        let id = FuncId::new(self.functions.len() as u32);
        self.functions.push(function);
        id
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "global counts never exceed u32"
    )]
    pub fn add_global(&mut self, global: Global) -> GlobalId {
        let id = GlobalId::new(self.globals.len() as u32);
        self.globals.push(global);
        id
    }

    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }

    pub fn function_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.index()]
    }

    pub fn global(&self, id: GlobalId) -> &Global {
        &self.globals[id.index()]
    }

    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn global_by_name(&self, name: &str) -> Option<&Global> {
        self.globals.iter().find(|g| g.name == name)
    }
}
