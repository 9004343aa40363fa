//! Basic-block argument inference.
//!
//! The graph has no implicit state shared between blocks: every variable
//! that is live across a block boundary must appear as an explicit formal
//! parameter of the destination block. Computing those parameters exactly
//! would be a full liveness problem; instead two cheap over-approximations
//! are intersected:
//!
//! - **UB1** (forward, from reads): for each block, the variables read in
//!   it or in any block reachable from it. A fixpoint over the postorder,
//!   since a block's bound depends on its successors' bounds.
//! - **UB2** (backward, from writes): for each block, the variables written
//!   in it or in any block that can reach it. A fixpoint over the nesting
//!   order, since a block's bound depends on its predecessors' bounds.
//!
//! A variable is a parameter of a block exactly when it might have been
//! written upstream *and* might be read at or below the block. Either bound
//! alone admits phantom parameters (a read dominated by a local write, a
//! write that reaches no read); the intersection is sound and much tighter.
//! Both fixpoints terminate because the sets only grow and are bounded by
//! the variable universe.
//!
//! Before the fixpoints, the read/write table is pruned in place: a
//! variable read and written only in the same single block never escapes
//! it, and a read with no write (or a write with no read) contributes
//! nothing. The pruned sets are left empty rather than removed; later
//! passes treat both the same.

use rustc_hash::FxHashSet;

use crate::analysis::ReadsAndWrites;
use crate::cfg::{BlockId, Cfg, LocalVariable};
use crate::metrics::{counters, MetricsSink};

/// Fills in `args` for every block from the read/write table.
///
/// The table is pruned in place as a side effect; pass the same table to
/// the later pipeline stages.
pub fn infer_block_args(rnw: &mut ReadsAndWrites, cfg: &mut Cfg, metrics: &dyn MetricsSink) {
    let bound = cfg.id_bound();
    let mut reads_by_block: Vec<FxHashSet<LocalVariable>> = vec![FxHashSet::default(); bound];
    let mut writes_by_block: Vec<FxHashSet<LocalVariable>> = vec![FxHashSet::default(); bound];

    let ReadsAndWrites { reads, writes } = rnw;
    for (var, rds) in reads.iter_mut() {
        metrics.histogram_inc(counters::READS_PER_BLOCK, rds.len());
        let wts = writes.entry(*var).or_default();
        if rds.len() == 1 && wts.len() == 1 && rds.iter().next() == wts.iter().next() {
            // Written and read only in one block: never escapes it.
            wts.clear();
            rds.clear();
        } else if wts.is_empty() {
            // Read of a variable that is never assigned.
            rds.clear();
        }
    }
    for (var, wts) in writes.iter_mut() {
        metrics.histogram_inc(counters::WRITES_PER_BLOCK, wts.len());
        let rds = reads.entry(*var).or_default();
        if rds.is_empty() {
            wts.clear();
        }
        for &bb in rds.iter() {
            reads_by_block[bb.index()].insert(*var);
        }
        for &bb in wts.iter() {
            writes_by_block[bb.index()].insert(*var);
        }
    }

    let dead = cfg.dead_block();

    let mut ub1: Vec<FxHashSet<LocalVariable>> = vec![FxHashSet::default(); bound];
    let mut changed = true;
    while changed {
        changed = false;
        for &bb in &cfg.postorder {
            let before = ub1[bb.index()].len();
            let mut acc = std::mem::take(&mut ub1[bb.index()]);
            acc.extend(reads_by_block[bb.index()].iter().copied());
            let exit = cfg[bb].exit;
            if exit.on_true != dead {
                acc.extend(ub1[exit.on_true.index()].iter().copied());
            }
            if exit.on_false != dead {
                acc.extend(ub1[exit.on_false.index()].iter().copied());
            }
            changed = changed || acc.len() != before;
            ub1[bb.index()] = acc;
        }
    }

    let mut ub2: Vec<FxHashSet<LocalVariable>> = vec![FxHashSet::default(); bound];
    changed = true;
    while changed {
        changed = false;
        for &bb in &cfg.nesting_order {
            let before = ub2[bb.index()].len();
            let mut acc = std::mem::take(&mut ub2[bb.index()]);
            acc.extend(writes_by_block[bb.index()].iter().copied());
            for &p in &cfg[bb].preds {
                if p != dead {
                    acc.extend(ub2[p.index()].iter().copied());
                }
            }
            changed = changed || acc.len() != before;
            ub2[bb.index()] = acc;
        }
    }

    let ids: Vec<BlockId> = cfg.block_ids().collect();
    for id in ids {
        let other = &ub2[id.index()];
        let mut args: Vec<LocalVariable> = ub1[id.index()]
            .iter()
            .copied()
            .filter(|v| other.contains(v))
            .collect();
        args.sort_unstable_by_key(|v| v.name());
        metrics.histogram_inc(counters::BLOCK_ARGUMENTS, args.len());
        cfg[id].args = args;
    }
}
