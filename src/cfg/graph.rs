//! The control flow graph: an arena of basic blocks plus derived orderings.
//!
//! The graph owns its blocks in a dense arena indexed by [`BlockId`]. All
//! cross-references (exit targets, predecessor lists, traversal orders) are
//! ids. Removing a block leaves a hole in the arena rather than shifting
//! ids, so analysis scratch arrays can be indexed by id directly as long as
//! they are sized to [`id_bound`](Cfg::id_bound).
//!
//! Two distinguished blocks exist for the whole lifetime of the graph:
//!
//! - the **entry** block, where execution starts;
//! - the **dead** block, a sink that terminating exits (returns, raises)
//!   jump to. Its own exit is a self-loop and it is never simplified away.
//!
//! # Construction
//!
//! The frontend creates blocks with [`fresh_block`](Cfg::fresh_block) and
//! wires them with [`set_exit`](Cfg::set_exit), which keeps predecessor
//! lists consistent with exit targets. Everything else in this crate
//! assumes that consistency and checks it in debug builds.

use std::fmt::Write as _;
use std::ops::{Index, IndexMut};

use rustc_hash::FxHashMap;

use crate::cfg::block::{BasicBlock, BlockId};
use crate::cfg::instruction::LocalVariable;
use crate::symbols::Context;
use crate::{Error, Result};

/// A per-method control flow graph.
#[derive(Debug)]
pub struct Cfg {
    blocks: Vec<Option<BasicBlock>>,
    entry: BlockId,
    dead: BlockId,
    /// Forward traversal order: depth-first postorder from the entry, leaves
    /// first. Iterated from the back this is a reverse postorder.
    pub(crate) postorder: Vec<BlockId>,
    /// Loop-aware order in which predecessors precede their successors and
    /// outer loops precede loop headers, which precede loop bodies.
    pub(crate) nesting_order: Vec<BlockId>,
    /// Minimal loop depth at which each variable is accessed.
    pub(crate) min_loops: FxHashMap<LocalVariable, u32>,
    /// Maximal loop depth at which each variable is written.
    pub(crate) max_loop_write: FxHashMap<LocalVariable, u32>,
}

impl Cfg {
    /// Creates a graph containing only the entry and dead blocks.
    ///
    /// The entry initially jumps straight to the dead block; the frontend
    /// retargets it as it emits code.
    #[must_use]
    pub fn new() -> Self {
        let entry = BlockId::new(0);
        let dead = BlockId::new(1);
        let mut entry_block = BasicBlock::new(entry, 0, dead);
        entry_block.preds = Vec::new();
        let mut dead_block = BasicBlock::new(dead, 0, dead);
        dead_block.preds.push(entry);
        Self {
            blocks: vec![Some(entry_block), Some(dead_block)],
            entry,
            dead,
            postorder: Vec::new(),
            nesting_order: Vec::new(),
            min_loops: FxHashMap::default(),
            max_loop_write: FxHashMap::default(),
        }
    }

    /// The entry block id.
    #[must_use]
    pub const fn entry(&self) -> BlockId {
        self.entry
    }

    /// The dead sink block id.
    #[must_use]
    pub const fn dead_block(&self) -> BlockId {
        self.dead
    }

    /// Creates a new block at the given loop nesting depth.
    ///
    /// The block's exit initially targets the dead block (and is registered
    /// in its predecessor list, keeping the graph consistent at every step);
    /// wire it up with [`set_exit`](Self::set_exit).
    pub fn fresh_block(&mut self, loop_depth: u32) -> BlockId {
        let id = BlockId::new(u32::try_from(self.blocks.len()).unwrap_or(u32::MAX));
        self.blocks.push(Some(BasicBlock::new(id, loop_depth, self.dead)));
        let dead = self.dead;
        self[dead].preds.push(id);
        id
    }

    /// Returns the block with the given id, or `None` if it was removed.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable variant of [`block`](Self::block).
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.blocks.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Returns `true` if `id` names a live block.
    #[must_use]
    pub fn is_live(&self, id: BlockId) -> bool {
        self.block(id).is_some()
    }

    /// Iterates the ids of all live blocks in ascending id order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks
            .iter()
            .filter_map(|slot| slot.as_ref().map(|bb| bb.id))
    }

    /// Number of live blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.iter().filter(|slot| slot.is_some()).count()
    }

    /// Exclusive upper bound on block ids, including removed ones.
    ///
    /// Scratch arrays indexed by block id must be sized to this, not to
    /// [`block_count`](Self::block_count).
    #[must_use]
    pub fn id_bound(&self) -> usize {
        self.blocks.len()
    }

    /// Rewires the exit of `from`, keeping predecessor lists consistent.
    ///
    /// Removes `from` from its current successors' predecessor lists, then
    /// installs the new exit and registers `from` with the new successors
    /// (once, if both targets coincide).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownBlock`] if any id names a removed block, and
    /// [`Error::Graph`] when asked to retarget the dead block, whose exit is
    /// a permanent self-loop.
    pub fn set_exit(
        &mut self,
        from: BlockId,
        cond: Option<LocalVariable>,
        on_true: BlockId,
        on_false: BlockId,
    ) -> Result<()> {
        if from == self.dead {
            return Err(Error::Graph(
                "the dead block's exit cannot be retargeted".to_string(),
            ));
        }
        for id in [from, on_true, on_false] {
            if !self.is_live(id) {
                return Err(Error::UnknownBlock(id));
            }
        }

        let old = self[from].exit;
        self[old.on_true].preds.retain(|&p| p != from);
        if old.on_false != old.on_true {
            self[old.on_false].preds.retain(|&p| p != from);
        }

        self[from].exit = crate::cfg::block::BlockExit {
            cond,
            on_true,
            on_false,
        };
        self[on_true].preds.push(from);
        if on_false != on_true {
            self[on_false].preds.push(from);
        }
        Ok(())
    }

    /// Removes a block from the arena, leaving a hole at its id.
    ///
    /// Callers are responsible for scrubbing the id from predecessor lists
    /// and traversal orders first; the simplifier is the only place that
    /// does this.
    pub(crate) fn remove_block(&mut self, id: BlockId) {
        debug_assert!(id != self.entry && id != self.dead, "{id} is not removable");
        self.blocks[id.index()] = None;
    }

    /// Forward traversal order (postorder, leaves first). Empty until the
    /// orders have been computed.
    #[must_use]
    pub fn postorder(&self) -> &[BlockId] {
        &self.postorder
    }

    /// Loop-aware order: predecessors precede successors, outer loops
    /// precede headers, headers precede bodies. Empty until computed.
    #[must_use]
    pub fn nesting_order(&self) -> &[BlockId] {
        &self.nesting_order
    }

    /// Minimal loop depth at which each variable is accessed.
    #[must_use]
    pub fn min_loops(&self) -> &FxHashMap<LocalVariable, u32> {
        &self.min_loops
    }

    /// Maximal loop depth at which each variable is written.
    #[must_use]
    pub fn max_loop_write(&self) -> &FxHashMap<LocalVariable, u32> {
        &self.max_loop_write
    }

    /// Renders the graph in Graphviz DOT format.
    ///
    /// Block labels list the block's loop depth, arguments, bindings and
    /// exit condition; conditional edges are labelled `then`/`else`. The
    /// dead block's self-loop is omitted.
    #[must_use]
    pub fn to_dot(&self, ctx: Context<'_>, title: Option<&str>) -> String {
        let mut dot = String::new();
        dot.push_str("digraph cfg {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"{}\";", escape_dot(name));
            dot.push_str("    labelloc=t;\n");
        }
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n\n");

        for id in self.block_ids() {
            let bb = &self[id];
            let mut label = format!("{id}");
            if id == self.entry {
                label.push_str(" (entry)");
            }
            if id == self.dead {
                label.push_str(" (dead)");
            }
            if bb.loop_depth > 0 {
                let _ = write!(label, " depth={}", bb.loop_depth);
            }
            label.push_str("\\l");
            if !bb.args.is_empty() {
                let rendered: Vec<String> = bb.args.iter().map(|a| a.show(ctx)).collect();
                let _ = write!(label, "args({})\\l", rendered.join(", "));
            }
            for binding in &bb.bindings {
                let _ = write!(
                    label,
                    "{} = {}\\l",
                    escape_dot(&binding.bind.show(ctx)),
                    escape_dot(&binding.value.show(ctx))
                );
            }
            if !bb.exit.is_unconditional() {
                if let Some(cond) = bb.exit.cond {
                    let _ = write!(label, "if {}\\l", escape_dot(&cond.show(ctx)));
                }
            }
            let _ = writeln!(dot, "    {id} [label=\"{label}\"];");
        }

        dot.push('\n');
        for id in self.block_ids() {
            if id == self.dead {
                continue;
            }
            let exit = self[id].exit;
            if exit.is_unconditional() {
                let _ = writeln!(dot, "    {id} -> {};", exit.on_true);
            } else {
                let _ = writeln!(dot, "    {id} -> {} [label=\"then\"];", exit.on_true);
                let _ = writeln!(dot, "    {id} -> {} [label=\"else\"];", exit.on_false);
            }
        }
        dot.push_str("}\n");
        dot
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<BlockId> for Cfg {
    type Output = BasicBlock;

    fn index(&self, id: BlockId) -> &BasicBlock {
        match self.blocks[id.index()].as_ref() {
            Some(bb) => bb,
            None => panic!("accessed removed basic block {id}"),
        }
    }
}

impl IndexMut<BlockId> for Cfg {
    fn index_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        match self.blocks[id.index()].as_mut() {
            Some(bb) => bb,
            None => panic!("accessed removed basic block {id}"),
        }
    }
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
