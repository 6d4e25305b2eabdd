//! Constants and instruction operands.

use zpp_types::TypeId;

use crate::{FuncId, GlobalId, ValueId};

/// A constant operand.
///
/// Integers are stored already wrapped to their type's width, sign-extended
/// into `i128` for signed types.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Const {
    Int { ty: TypeId, value: i128 },
    Float { ty: TypeId, value: f64 },
    /// Null pointer, or zero for non-pointer types.
    Null { ty: TypeId },
    Undef { ty: TypeId },
    Zero { ty: TypeId },
    Struct { ty: TypeId, fields: Vec<Const> },
    Array { ty: TypeId, elems: Vec<Const> },
    /// Address of a global.
    Global(GlobalId),
    /// Address of a function.
    Func(FuncId),
}

impl Const {
    /// Type of the constant. Addresses are typed `*u8`; every pointer
    /// lowers to the same target type.
    pub fn ty(&self) -> TypeId {
        match self {
            Const::Int { ty, .. }
            | Const::Float { ty, .. }
            | Const::Null { ty }
            | Const::Undef { ty }
            | Const::Zero { ty }
            | Const::Struct { ty, .. }
            | Const::Array { ty, .. } => *ty,
            Const::Global(_) | Const::Func(_) => TypeId::CSTRING,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Const::Int { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// Instruction operand.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    Value(ValueId),
    Const(Const),
    /// Result of a `void` expression; never consumed by an instruction.
    Void,
}

impl Operand {
    pub fn as_value(&self) -> Option<ValueId> {
        match self {
            Operand::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_const(&self) -> Option<&Const> {
        match self {
            Operand::Const(c) => Some(c),
            _ => None,
        }
    }
}

impl From<ValueId> for Operand {
    fn from(value: ValueId) -> Self {
        Operand::Value(value)
    }
}

impl From<Const> for Operand {
    fn from(value: Const) -> Self {
        Operand::Const(value)
    }
}
