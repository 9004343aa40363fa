//! Per-variable read and write sets over basic blocks.
//!
//! [`ReadsAndWrites`] records, for every variable, the set of blocks that
//! read it and the set of blocks that write it. The table drives
//! block-argument inference, the loop-depth summaries and dead-assignment
//! removal.
//!
//! The table must describe the graph in its *current* shape: block merging
//! during simplification moves bindings between blocks, so the producing
//! walk runs after the graph has been simplified.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cfg::{BlockId, Cfg, LocalVariable};

/// Read and write block sets per variable.
///
/// Sets may be present but empty: block-argument preprocessing clears sets
/// in place (never-escaping variables, reads of never-written variables)
/// and later passes treat an empty set the same as an absent one.
#[derive(Debug, Default, Clone)]
pub struct ReadsAndWrites {
    /// Blocks reading each variable.
    pub reads: FxHashMap<LocalVariable, FxHashSet<BlockId>>,
    /// Blocks writing each variable.
    pub writes: FxHashMap<LocalVariable, FxHashSet<BlockId>>,
}

impl ReadsAndWrites {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks every live block and collects reads and writes.
    ///
    /// A binding writes its bound variable and reads every right-hand-side
    /// operand; a conditional exit reads its condition variable.
    #[must_use]
    pub fn compute(cfg: &Cfg) -> Self {
        let mut table = Self::new();
        for id in cfg.block_ids() {
            let bb = &cfg[id];
            for binding in &bb.bindings {
                table.writes.entry(binding.bind).or_default().insert(id);
                binding.value.each_read(&mut |v| {
                    table.reads.entry(v).or_default().insert(id);
                });
            }
            if let Some(cond) = bb.exit.cond {
                table.reads.entry(cond).or_default().insert(id);
            }
        }
        table
    }

    /// Returns `true` if any block reads `var`.
    #[must_use]
    pub fn is_read(&self, var: LocalVariable) -> bool {
        self.reads.get(&var).is_some_and(|blocks| !blocks.is_empty())
    }

    /// Returns `true` if any block writes `var`.
    #[must_use]
    pub fn is_written(&self, var: LocalVariable) -> bool {
        self.writes
            .get(&var)
            .is_some_and(|blocks| !blocks.is_empty())
    }
}
