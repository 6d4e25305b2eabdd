//! Removal of unreachable blocks.

use rustc_hash::FxHashSet;

use crate::{BlockId, Function, Instr};

/// Blocks reachable from the function's first block.
pub fn reachable_blocks(func: &Function) -> FxHashSet<BlockId> {
    let mut seen = FxHashSet::default();
    let Some(first) = func.blocks.first() else {
        return seen;
    };
    let mut stack = vec![first.id];
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        if let Some(block) = func.block(id) {
            stack.extend(block.terminator.successors());
        }
    }
    seen
}

/// Remove blocks with no path from the first block, and the phi inputs
/// coming from them. Returns how many blocks were removed.
pub fn prune_unreachable_blocks(func: &mut Function) -> usize {
    let reachable = reachable_blocks(func);
    let before = func.blocks.len();
    func.blocks.retain(|b| reachable.contains(&b.id));
    let removed = before - func.blocks.len();

    if removed > 0 {
        for block in &mut func.blocks {
            for instr in &mut block.instrs {
                if let Instr::Phi { incoming, .. } = instr {
                    incoming.retain(|(_, from)| reachable.contains(from));
                }
            }
        }
        tracing::debug!(function = %func.name, removed, "pruned unreachable blocks");
    }
    removed
}

#[cfg(test)]
mod tests;
