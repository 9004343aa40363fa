//! Per-variable loop-depth summaries.
//!
//! Downstream type inference narrows types more aggressively for variables
//! that never cross a loop boundary. This pass condenses the read/write
//! table into two maps on the graph:
//!
//! - `min_loops`: the shallowest loop depth at which the variable is read
//!   or written;
//! - `max_loop_write`: the deepest loop depth at which it is written.
//!
//! Variables whose pruned sets are empty still receive entries (at the
//! identity values for min and max respectively); consumers treat those
//! like absent variables.

use crate::analysis::ReadsAndWrites;
use crate::cfg::Cfg;

/// Fills in `min_loops` and `max_loop_write` on the graph.
pub fn compute_min_max_loops(rnw: &ReadsAndWrites, cfg: &mut Cfg) {
    for (&var, blocks) in &rnw.reads {
        let observed = blocks
            .iter()
            .map(|&bb| cfg[bb].loop_depth)
            .min()
            .unwrap_or(u32::MAX);
        let min = cfg.min_loops.entry(var).or_insert(u32::MAX);
        if *min > observed {
            *min = observed;
        }
    }

    for (&var, blocks) in &rnw.writes {
        let mut observed_min = u32::MAX;
        let mut observed_max = 0;
        for &bb in blocks {
            let depth = cfg[bb].loop_depth;
            observed_min = observed_min.min(depth);
            observed_max = observed_max.max(depth);
        }
        let min = cfg.min_loops.entry(var).or_insert(u32::MAX);
        if *min > observed_min {
            *min = observed_min;
        }
        let max = cfg.max_loop_write.entry(var).or_insert(0);
        if *max < observed_max {
            *max = observed_max;
        }
    }
}
