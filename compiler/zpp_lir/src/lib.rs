//! Zpp LIR - the generator's output IR.
//!
//! A typed, SSA-style, basic-block IR modelled on LLVM:
//!
//! - **[`Module`]**: functions, globals (string data included), and the
//!   external library paths the link step needs
//! - **[`Function`]**: a declaration, or a definition with blocks
//! - **[`Block`]**: instructions plus exactly one [`Terminator`]
//! - **[`Instr`]**: stack slots, memory, arithmetic, casts, aggregates,
//!   calls, phis
//!
//! Types are [`zpp_types::TypeId`]s into the compilation's type pool; the
//! printer lowers them to LLVM spelling. Functions are built with
//! [`FunctionBuilder`], which follows the position/emit/terminate pattern
//! of LLVM's `IRBuilder`.

mod builder;
mod constant;
mod function;
mod ids;
mod instr;
mod module;
mod printer;
mod prune;

pub use builder::FunctionBuilder;
pub use constant::{Const, Operand};
pub use function::{Block, Function, Linkage};
pub use ids::{BlockId, FuncId, GlobalId, ValueId};
pub use instr::{BinOp, Callee, CastOp, CmpPred, Instr, Terminator};
pub use module::{Global, GlobalInit, Module};
pub use printer::ModuleDisplay;
pub use prune::{prune_unreachable_blocks, reachable_blocks};
