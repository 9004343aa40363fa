//! Control flow graph data model.
//!
//! A method body is represented as a set of [`BasicBlock`]s owned by a
//! [`Cfg`] arena and linked by a structured two-way exit per block. Each
//! block carries an ordered list of three-address [`Binding`]s, a
//! predecessor list, a loop nesting depth and a flag set.
//!
//! The model is deliberately id-based: blocks reference each other through
//! dense [`BlockId`]s, which keeps the mutable graph surgery performed by
//! the optimization passes free of dangling references and lets analyses
//! use flat scratch arrays indexed by id.

mod block;
mod graph;
mod instruction;

pub use block::{BasicBlock, BlockExit, BlockFlags, BlockId, Binding};
pub use graph::Cfg;
pub use instruction::{Instruction, LocalVariable};
