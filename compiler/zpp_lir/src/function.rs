//! Functions and blocks.

use zpp_types::TypeId;

use crate::{BlockId, Instr, Terminator, ValueId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Linkage {
    /// Visible only inside the module.
    Private,
    /// Visible to the linker; used for `main` and declarations.
    External,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub id: BlockId,
    /// Unique within the function.
    pub label: String,
    pub instrs: Vec<Instr>,
    pub terminator: Terminator,
}

/// A function declaration or definition.
///
/// A declaration has no blocks. Parameters are values `0..params.len()`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    pub linkage: Linkage,
    pub params: Vec<TypeId>,
    pub ret: TypeId,
    pub blocks: Vec<Block>,
    /// Type of every value, indexed by [`ValueId`].
    pub value_types: Vec<TypeId>,
}

impl Function {
    pub fn declaration(name: String, params: Vec<TypeId>, ret: TypeId) -> Self {
        let value_types = params.clone();
        Function {
            name,
            linkage: Linkage::External,
            params,
            ret,
            blocks: Vec::new(),
            value_types,
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "parameter counts never exceed u32"
    )]
    pub fn param_value(&self, index: usize) -> ValueId {
        ValueId::new(index as u32)
    }

    pub fn value_type(&self, value: ValueId) -> TypeId {
        self.value_types
            .get(value.index())
            .copied()
            .unwrap_or(TypeId::VOID)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_by_label(&self, label: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.label == label)
    }

    /// Blocks whose terminator can transfer control to `id`.
    pub fn predecessors(&self, id: BlockId) -> Vec<BlockId> {
        self.blocks
            .iter()
            .filter(|b| b.terminator.successors().any(|s| s == id))
            .map(|b| b.id)
            .collect()
    }

    pub fn instrs(&self) -> impl Iterator<Item = &Instr> {
        self.blocks.iter().flat_map(|b| b.instrs.iter())
    }
}
