//! Basic blocks: bindings, structured exits and block metadata.
//!
//! A basic block is a maximal straight-line sequence of [`Binding`]s with a
//! single structured two-way exit. Blocks are owned by the graph arena and
//! referenced everywhere else by their dense [`BlockId`]; the predecessor
//! list and the exit targets are ids, never pointers, so graph surgery in
//! the simplifier cannot leave dangling references.

use bitflags::bitflags;
use std::fmt;

use crate::cfg::instruction::{Instruction, LocalVariable};

/// Dense identifier of a basic block within one graph.
///
/// Ids are assigned on creation and never reused; removing a block leaves a
/// hole in the arena. Scratch arrays in the analyses are therefore sized to
/// the id bound, not to the live block count.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(u32);

impl BlockId {
    /// Creates a block id from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

bitflags! {
    /// Per-block flag set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlockFlags: u8 {
        /// The block is the entry of a loop: at least one predecessor sits
        /// at a strictly shallower loop depth.
        const LOOP_HEADER = 0b0000_0001;
        /// Visited marker for the forward (postorder) traversal.
        const VISITED_FORWARD = 0b0000_0010;
        /// Visited marker for the backward (nesting-order) traversal.
        const VISITED_BACKWARD = 0b0000_0100;
    }
}

/// The structured two-way exit of a basic block.
///
/// When `on_true == on_false` the exit is unconditional and `cond` is
/// irrelevant. A `cond` of `None` models an exit that never had a condition
/// variable attached (unconditional jumps, the dead block's self-loop).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockExit {
    /// Condition variable, if the exit branches on one.
    pub cond: Option<LocalVariable>,
    /// Successor taken when the condition holds.
    pub on_true: BlockId,
    /// Successor taken when the condition does not hold.
    pub on_false: BlockId,
}

impl BlockExit {
    /// Returns `true` if both successors coincide.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.on_true == self.on_false
    }
}

/// One three-address binding: a variable assigned the result of an
/// instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Variable being assigned.
    pub bind: LocalVariable,
    /// Right-hand side.
    pub value: Instruction,
}

impl Binding {
    /// Creates a binding.
    #[must_use]
    pub fn new(bind: LocalVariable, value: Instruction) -> Self {
        Self { bind, value }
    }
}

/// A basic block owned by the graph arena.
#[derive(Debug, Clone)]
pub struct BasicBlock {
    /// Dense id of this block, assigned by the arena on creation.
    pub id: BlockId,
    /// Bindings in execution order.
    pub bindings: Vec<Binding>,
    /// Structured two-way exit.
    pub exit: BlockExit,
    /// Predecessor blocks. Duplicates may accumulate during construction;
    /// the simplifier sorts and deduplicates this list.
    pub preds: Vec<BlockId>,
    /// Loop nesting depth of this block, fixed at construction.
    pub loop_depth: u32,
    /// Formal parameters of the block: every variable live across the block
    /// boundary, filled in by block-argument inference. Sorted by name id.
    pub args: Vec<LocalVariable>,
    /// Flag set.
    pub flags: BlockFlags,
}

impl BasicBlock {
    pub(crate) fn new(id: BlockId, loop_depth: u32, exit_to: BlockId) -> Self {
        Self {
            id,
            bindings: Vec::new(),
            exit: BlockExit {
                cond: None,
                on_true: exit_to,
                on_false: exit_to,
            },
            preds: Vec::new(),
            loop_depth,
            args: Vec::new(),
            flags: BlockFlags::empty(),
        }
    }

    /// Returns `true` if the block is the entry of a loop.
    #[must_use]
    pub fn is_loop_header(&self) -> bool {
        self.flags.contains(BlockFlags::LOOP_HEADER)
    }
}
