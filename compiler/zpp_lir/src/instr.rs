//! Instructions and terminators.

use zpp_types::TypeId;

use crate::{BlockId, FuncId, Operand, ValueId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    UDiv,
    SRem,
    URem,
    FAdd,
    FSub,
    FMul,
    FDiv,
    FRem,
}

impl BinOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
            BinOp::UDiv => "udiv",
            BinOp::SRem => "srem",
            BinOp::URem => "urem",
            BinOp::FAdd => "fadd",
            BinOp::FSub => "fsub",
            BinOp::FMul => "fmul",
            BinOp::FDiv => "fdiv",
            BinOp::FRem => "frem",
        }
    }
}

/// Comparison predicate. Integer predicates carry signedness; float
/// predicates are ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CmpPred {
    Eq,
    Ne,
    Slt,
    Sgt,
    Sle,
    Sge,
    Ult,
    Ugt,
    Ule,
    Uge,
    FEq,
    FNe,
    FLt,
    FGt,
    FLe,
    FGe,
}

impl CmpPred {
    pub fn is_float(self) -> bool {
        matches!(
            self,
            CmpPred::FEq | CmpPred::FNe | CmpPred::FLt | CmpPred::FGt | CmpPred::FLe | CmpPred::FGe
        )
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            CmpPred::Eq => "eq",
            CmpPred::Ne => "ne",
            CmpPred::Slt => "slt",
            CmpPred::Sgt => "sgt",
            CmpPred::Sle => "sle",
            CmpPred::Sge => "sge",
            CmpPred::Ult => "ult",
            CmpPred::Ugt => "ugt",
            CmpPred::Ule => "ule",
            CmpPred::Uge => "uge",
            CmpPred::FEq => "oeq",
            CmpPred::FNe => "one",
            CmpPred::FLt => "olt",
            CmpPred::FGt => "ogt",
            CmpPred::FLe => "ole",
            CmpPred::FGe => "oge",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CastOp {
    Trunc,
    ZExt,
    SExt,
    FpTrunc,
    FpExt,
    FpToSi,
    FpToUi,
    SiToFp,
    UiToFp,
    PtrToInt,
    IntToPtr,
}

impl CastOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            CastOp::Trunc => "trunc",
            CastOp::ZExt => "zext",
            CastOp::SExt => "sext",
            CastOp::FpTrunc => "fptrunc",
            CastOp::FpExt => "fpext",
            CastOp::FpToSi => "fptosi",
            CastOp::FpToUi => "fptoui",
            CastOp::SiToFp => "sitofp",
            CastOp::UiToFp => "uitofp",
            CastOp::PtrToInt => "ptrtoint",
            CastOp::IntToPtr => "inttoptr",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Callee {
    Direct(FuncId),
    /// Call through a function pointer of type `*fn_ty`.
    Indirect { ptr: Operand, fn_ty: TypeId },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Instr {
    /// Stack slot holding one `ty`.
    Alloca { dst: ValueId, ty: TypeId },
    Load { dst: ValueId, ty: TypeId, ptr: Operand },
    Store { ptr: Operand, value: Operand },
    Binary {
        dst: ValueId,
        op: BinOp,
        ty: TypeId,
        lhs: Operand,
        rhs: Operand,
    },
    /// Comparison producing a one-bit value.
    Cmp {
        dst: ValueId,
        pred: CmpPred,
        lhs: Operand,
        rhs: Operand,
    },
    Cast {
        dst: ValueId,
        op: CastOp,
        value: Operand,
        to: TypeId,
    },
    /// Address computation into `source_ty` starting at `base`.
    ElementPtr {
        dst: ValueId,
        source_ty: TypeId,
        base: Operand,
        indices: Vec<Operand>,
    },
    ExtractValue {
        dst: ValueId,
        agg: Operand,
        index: u32,
    },
    InsertValue {
        dst: ValueId,
        agg: Operand,
        value: Operand,
        index: u32,
    },
    Call {
        dst: Option<ValueId>,
        ret: TypeId,
        callee: Callee,
        args: Vec<Operand>,
    },
    Phi {
        dst: ValueId,
        ty: TypeId,
        incoming: Vec<(Operand, BlockId)>,
    },
}

impl Instr {
    /// Value defined by this instruction, if any.
    pub fn dst(&self) -> Option<ValueId> {
        match self {
            Instr::Alloca { dst, .. }
            | Instr::Load { dst, .. }
            | Instr::Binary { dst, .. }
            | Instr::Cmp { dst, .. }
            | Instr::Cast { dst, .. }
            | Instr::ElementPtr { dst, .. }
            | Instr::ExtractValue { dst, .. }
            | Instr::InsertValue { dst, .. }
            | Instr::Phi { dst, .. } => Some(*dst),
            Instr::Call { dst, .. } => *dst,
            Instr::Store { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminator {
    Return(Option<Operand>),
    Jump(BlockId),
    Branch {
        cond: Operand,
        then_block: BlockId,
        else_block: BlockId,
    },
    Unreachable,
}

impl Terminator {
    /// Blocks control can transfer to.
    pub fn successors(&self) -> impl Iterator<Item = BlockId> {
        let (a, b) = match self {
            Terminator::Jump(target) => (Some(*target), None),
            Terminator::Branch {
                then_block,
                else_block,
                ..
            } => (Some(*then_block), Some(*else_block)),
            Terminator::Return(_) | Terminator::Unreachable => (None, None),
        };
        a.into_iter().chain(b)
    }
}
