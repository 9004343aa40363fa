//! The optimization pipeline over a freshly built graph.
//!
//! Passes run in a fixed dependency order:
//!
//! 1. [`simplify`] — peephole graph cleanup to a fixpoint;
//! 2. [`compute_orders`] — postorder and loop-aware nesting order;
//! 3. [`mark_loop_headers`] — flag blocks entered from a shallower scope;
//! 4. read/write collection ([`ReadsAndWrites::compute`]) — runs after
//!    simplification because block merging moves bindings between blocks;
//! 5. [`infer_block_args`] — fill in block formal parameters (prunes the
//!    read/write table in place);
//! 6. [`dealias`] — collapse copy chains through join points;
//! 7. [`compute_min_max_loops`] — per-variable loop-depth summaries;
//! 8. [`remove_dead_assigns`] — drop pure bindings nobody reads.
//!
//! Argument inference precedes dealiasing so it sees the same operand
//! structure the read/write walk saw; dealiasing rewrites operands without
//! changing which blocks need which variables. Dead-assignment removal
//! comes last: it is a single sweep because the chains it deletes were
//! already collapsed.
//!
//! [`finalize`] composes the whole pipeline. The individual passes stay
//! public for callers that produce their own read/write table or only need
//! part of the pipeline.

mod block_args;
mod dead_assigns;
mod dealias;
mod loop_depths;
mod orders;
mod simplify;

pub use block_args::infer_block_args;
pub use dead_assigns::remove_dead_assigns;
pub use dealias::dealias;
pub use loop_depths::compute_min_max_loops;
pub use orders::{compute_orders, mark_loop_headers};
pub use simplify::simplify;

use crate::analysis::ReadsAndWrites;
use crate::cfg::Cfg;
use crate::metrics::MetricsSink;
use crate::symbols::Context;

/// Runs the full optimization pipeline over `cfg`, mutating it in place.
///
/// Returns the read/write table as it stands after argument-inference
/// pruning; downstream inference reuses it.
pub fn finalize(ctx: Context<'_>, cfg: &mut Cfg, metrics: &dyn MetricsSink) -> ReadsAndWrites {
    simplify(ctx, cfg);
    compute_orders(cfg);
    mark_loop_headers(cfg);
    let mut rnw = ReadsAndWrites::compute(cfg);
    infer_block_args(&mut rnw, cfg, metrics);
    dealias(ctx, cfg);
    compute_min_max_loops(&rnw, cfg);
    remove_dead_assigns(ctx, &rnw, cfg);
    rnw
}
