//! Function builder.
//!
//! Owns block and value state while a function body is being generated and
//! is consumed by [`finish`](FunctionBuilder::finish). Follows the "position
//! at a block, emit instructions, terminate" pattern of LLVM's `IRBuilder`.

use rustc_hash::FxHashSet;
use zpp_types::TypeId;

use crate::{
    BinOp, Block, BlockId, Callee, CastOp, CmpPred, Function, Instr, Linkage, Operand,
    Terminator, ValueId,
};

struct BlockBuilder {
    id: BlockId,
    label: String,
    instrs: Vec<Instr>,
    terminator: Option<Terminator>,
}

pub struct FunctionBuilder {
    blocks: Vec<BlockBuilder>,
    current_block: BlockId,
    value_types: Vec<TypeId>,
    labels: FxHashSet<String>,
    param_count: usize,
}

impl FunctionBuilder {
    /// Create a builder with one value per parameter and no blocks.
    pub fn new(params: &[TypeId]) -> Self {
        FunctionBuilder {
            blocks: Vec::new(),
            current_block: BlockId::new(0),
            value_types: params.to_vec(),
            labels: FxHashSet::default(),
            param_count: params.len(),
        }
    }

    // Block management

    /// Allocate a new empty block. The label is made unique by suffixing a
    /// counter.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "block indices never exceed u32"
    )]
    pub fn new_block(&mut self, label: &str) -> BlockId {
        let id = BlockId::new(self.blocks.len() as u32);
        let mut unique = label.to_string();
        let mut n = 1;
        while self.labels.contains(&unique) {
            unique = format!("{label}{n}");
            n += 1;
        }
        self.labels.insert(unique.clone());
        self.blocks.push(BlockBuilder {
            id,
            label: unique,
            instrs: Vec::new(),
            terminator: None,
        });
        id
    }

    pub fn position_at(&mut self, block: BlockId) {
        debug_assert!(
            block.index() < self.blocks.len(),
            "BlockId {} out of bounds (have {} blocks)",
            block.raw(),
            self.blocks.len(),
        );
        self.current_block = block;
    }

    #[inline]
    pub fn current_block(&self) -> BlockId {
        self.current_block
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.block_is_terminated(self.current_block)
    }

    pub fn block_is_terminated(&self, block: BlockId) -> bool {
        self.blocks
            .get(block.index())
            .is_some_and(|b| b.terminator.is_some())
    }

    /// Whether `block` can be reached from the first block, following the
    /// terminators emitted so far.
    pub fn is_reachable(&self, block: BlockId) -> bool {
        if self.blocks.is_empty() {
            return false;
        }
        let mut seen = vec![false; self.blocks.len()];
        let mut stack = vec![BlockId::new(0)];
        while let Some(b) = stack.pop() {
            if b == block {
                return true;
            }
            if std::mem::replace(&mut seen[b.index()], true) {
                continue;
            }
            if let Some(term) = &self.blocks[b.index()].terminator {
                stack.extend(term.successors());
            }
        }
        false
    }

    // Values

    pub fn param(&self, index: usize) -> Option<ValueId> {
        (index < self.param_count).then(|| value_id(index))
    }

    pub fn value_type(&self, value: ValueId) -> TypeId {
        self.value_types
            .get(value.index())
            .copied()
            .unwrap_or(TypeId::VOID)
    }

    fn fresh_value(&mut self, ty: TypeId) -> ValueId {
        let id = value_id(self.value_types.len());
        self.value_types.push(ty);
        id
    }

    fn push(&mut self, instr: Instr) {
        self.blocks[self.current_block.index()].instrs.push(instr);
    }

    // Instruction emission

    /// Emit a stack slot into `block` rather than the current block, so all
    /// slots can be hoisted into the function's first block.
    pub fn emit_alloca_in(&mut self, block: BlockId, ty: TypeId, ptr_ty: TypeId) -> ValueId {
        let dst = self.fresh_value(ptr_ty);
        self.blocks[block.index()]
            .instrs
            .push(Instr::Alloca { dst, ty });
        dst
    }

    pub fn emit_load(&mut self, ty: TypeId, ptr: Operand) -> ValueId {
        let dst = self.fresh_value(ty);
        self.push(Instr::Load { dst, ty, ptr });
        dst
    }

    pub fn emit_store(&mut self, ptr: Operand, value: Operand) {
        self.push(Instr::Store { ptr, value });
    }

    pub fn emit_binary(&mut self, op: BinOp, ty: TypeId, lhs: Operand, rhs: Operand) -> ValueId {
        let dst = self.fresh_value(ty);
        self.push(Instr::Binary {
            dst,
            op,
            ty,
            lhs,
            rhs,
        });
        dst
    }

    pub fn emit_cmp(&mut self, pred: CmpPred, lhs: Operand, rhs: Operand) -> ValueId {
        let dst = self.fresh_value(TypeId::BOOL);
        self.push(Instr::Cmp {
            dst,
            pred,
            lhs,
            rhs,
        });
        dst
    }

    pub fn emit_cast(&mut self, op: CastOp, value: Operand, to: TypeId) -> ValueId {
        let dst = self.fresh_value(to);
        self.push(Instr::Cast { dst, op, value, to });
        dst
    }

    pub fn emit_element_ptr(
        &mut self,
        result_ty: TypeId,
        source_ty: TypeId,
        base: Operand,
        indices: Vec<Operand>,
    ) -> ValueId {
        let dst = self.fresh_value(result_ty);
        self.push(Instr::ElementPtr {
            dst,
            source_ty,
            base,
            indices,
        });
        dst
    }

    pub fn emit_extract_value(&mut self, ty: TypeId, agg: Operand, index: u32) -> ValueId {
        let dst = self.fresh_value(ty);
        self.push(Instr::ExtractValue { dst, agg, index });
        dst
    }

    pub fn emit_insert_value(
        &mut self,
        agg_ty: TypeId,
        agg: Operand,
        value: Operand,
        index: u32,
    ) -> ValueId {
        let dst = self.fresh_value(agg_ty);
        self.push(Instr::InsertValue {
            dst,
            agg,
            value,
            index,
        });
        dst
    }

    /// Emit a call. `void` calls define no value.
    pub fn emit_call(
        &mut self,
        ret: TypeId,
        returns_value: bool,
        callee: Callee,
        args: Vec<Operand>,
    ) -> Option<ValueId> {
        let dst = returns_value.then(|| self.fresh_value(ret));
        self.push(Instr::Call {
            dst,
            ret,
            callee,
            args,
        });
        dst
    }

    pub fn emit_phi(&mut self, ty: TypeId, incoming: Vec<(Operand, BlockId)>) -> ValueId {
        let dst = self.fresh_value(ty);
        self.push(Instr::Phi { dst, ty, incoming });
        dst
    }

    /// Drop the load defining `value` from the current block.
    ///
    /// Used when an expression that was read as a value turns out to be
    /// needed as an address instead. Returns the loaded-from pointer.
    pub fn take_load(&mut self, value: ValueId) -> Option<Operand> {
        let instrs = &mut self.blocks[self.current_block.index()].instrs;
        let pos = instrs
            .iter()
            .rposition(|i| matches!(i, Instr::Load { dst, .. } if *dst == value))?;
        match instrs.remove(pos) {
            Instr::Load { ptr, .. } => Some(ptr),
            _ => None,
        }
    }

    // Terminators

    fn terminate(&mut self, terminator: Terminator) {
        let block = &mut self.blocks[self.current_block.index()];
        debug_assert!(
            block.terminator.is_none(),
            "block {} already terminated",
            self.current_block.raw()
        );
        block.terminator = Some(terminator);
    }

    pub fn terminate_return(&mut self, value: Option<Operand>) {
        self.terminate(Terminator::Return(value));
    }

    pub fn terminate_jump(&mut self, target: BlockId) {
        self.terminate(Terminator::Jump(target));
    }

    pub fn terminate_branch(&mut self, cond: Operand, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::Branch {
            cond,
            then_block,
            else_block,
        });
    }

    pub fn terminate_unreachable(&mut self) {
        self.terminate(Terminator::Unreachable);
    }

    /// Jump to `target` unless the current block already ends.
    pub fn jump_if_open(&mut self, target: BlockId) {
        if !self.is_terminated() {
            self.terminate_jump(target);
        }
    }

    /// Detach the current block's terminator so more instructions can be
    /// appended before it; pair with [`restore_terminator`](Self::restore_terminator).
    pub fn take_terminator(&mut self) -> Option<Terminator> {
        self.blocks[self.current_block.index()].terminator.take()
    }

    pub fn restore_terminator(&mut self, terminator: Option<Terminator>) {
        if terminator.is_some() {
            self.blocks[self.current_block.index()].terminator = terminator;
        }
    }

    // Finalization

    /// Consume the builder and produce a finished [`Function`].
    ///
    /// Unterminated blocks get `Unreachable`, with a tracing warning.
    pub fn finish(self, name: String, linkage: Linkage, params: Vec<TypeId>, ret: TypeId) -> Function {
        let blocks = self
            .blocks
            .into_iter()
            .map(|bb| {
                let terminator = bb.terminator.unwrap_or_else(|| {
                    tracing::warn!(block = %bb.label, "unterminated block, adding unreachable");
                    Terminator::Unreachable
                });
                Block {
                    id: bb.id,
                    label: bb.label,
                    instrs: bb.instrs,
                    terminator,
                }
            })
            .collect();

        Function {
            name,
            linkage,
            params,
            ret,
            blocks,
            value_types: self.value_types,
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value counts never exceed u32"
)]
fn value_id(index: usize) -> ValueId {
    ValueId::new(index as u32)
}
