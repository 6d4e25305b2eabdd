use crate::{
    prune_unreachable_blocks, reachable_blocks, Const, FunctionBuilder, Instr, Linkage, Operand,
};
use pretty_assertions::assert_eq;
use zpp_types::TypeId;

fn int(value: i128) -> Operand {
    Operand::Const(Const::Int {
        ty: TypeId::I32,
        value,
    })
}

#[test]
fn removes_blocks_without_a_path_from_entry() {
    let mut b = FunctionBuilder::new(&[]);
    let entry = b.new_block("entry");
    let exit = b.new_block("exit");
    let dead = b.new_block("dead");
    let dead_loop = b.new_block("dead.loop");

    b.position_at(entry);
    b.terminate_jump(exit);
    b.position_at(exit);
    b.terminate_return(Some(int(0)));
    b.position_at(dead);
    b.terminate_jump(dead_loop);
    b.position_at(dead_loop);
    b.terminate_jump(dead);

    let mut f = b.finish("f".into(), Linkage::Private, vec![], TypeId::I32);
    assert_eq!(reachable_blocks(&f).len(), 2);
    assert_eq!(prune_unreachable_blocks(&mut f), 2);
    let labels: Vec<&str> = f.blocks.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["entry", "exit"]);
}

#[test]
fn phi_inputs_from_pruned_blocks_are_dropped() {
    let mut b = FunctionBuilder::new(&[]);
    let entry = b.new_block("entry");
    let merge = b.new_block("merge");
    let dead = b.new_block("dead");

    b.position_at(entry);
    b.terminate_jump(merge);
    b.position_at(dead);
    b.terminate_jump(merge);
    b.position_at(merge);
    let phi = b.emit_phi(TypeId::I32, vec![(int(1), entry), (int(2), dead)]);
    b.terminate_return(Some(Operand::Value(phi)));

    let mut f = b.finish("f".into(), Linkage::Private, vec![], TypeId::I32);
    prune_unreachable_blocks(&mut f);
    let merge_block = f.block_by_label("merge");
    assert_eq!(
        merge_block.map(|b| b.instrs.clone()),
        Some(vec![Instr::Phi {
            dst: phi,
            ty: TypeId::I32,
            incoming: vec![(int(1), entry)],
        }])
    );
    assert_eq!(f.predecessors(merge), vec![entry]);
}
