//! Traversal orders over the simplified graph, and loop-header marking.
//!
//! Two orders are derived once the graph shape is final:
//!
//! - **Postorder** (forward): depth-first from the entry following the then
//!   edge before the else edge, emitting each block when its subtree is
//!   exhausted. Leaves come first; iterating the array from the back gives
//!   a reverse postorder suitable for forward dataflow.
//! - **Nesting order** (backward): depth-first from the dead sink following
//!   predecessor edges, refined so that the result respects loop nesting:
//!   outer loops come before loop headers, which come before loop bodies.
//!   Iterated from the front, predecessors precede their successors, which
//!   is what the alias and write-propagation passes need.
//!
//! The nesting refinement works by partitioning each block's predecessors
//! by loop depth. Predecessors at a strictly shallower depth are the paths
//! entering the loop from outside; they are visited first. If any exist,
//! the current block is a loop header and is emitted *before* descending
//! into the remaining (same-or-deeper) predecessors, i.e. before the loop
//! body. Blocks with no shallower predecessor are emitted after all their
//! predecessors, as in a plain postorder.
//!
//! For the partition to be a contiguous prefix, each predecessor list is
//! sorted by `(loop_depth, id)` on first visit. The sort persists, which
//! keeps downstream consumers of predecessor lists deterministic.

use crate::cfg::{BlockFlags, BlockId, Cfg};

/// Computes both traversal orders, resetting any previous computation.
pub fn compute_orders(cfg: &mut Cfg) {
    let ids: Vec<BlockId> = cfg.block_ids().collect();
    for &id in &ids {
        cfg[id]
            .flags
            .remove(BlockFlags::VISITED_FORWARD | BlockFlags::VISITED_BACKWARD);
    }

    let mut forward = Vec::with_capacity(cfg.block_count());
    visit_forward(cfg, &mut forward, cfg.entry());
    cfg.postorder = forward;

    let mut backward = Vec::with_capacity(cfg.block_count());
    visit_backward(cfg, &mut backward, cfg.dead_block());
    cfg.nesting_order = backward;
}

fn visit_forward(cfg: &mut Cfg, order: &mut Vec<BlockId>, current: BlockId) {
    if cfg[current].flags.contains(BlockFlags::VISITED_FORWARD) {
        return;
    }
    cfg[current].flags.insert(BlockFlags::VISITED_FORWARD);
    let exit = cfg[current].exit;
    visit_forward(cfg, order, exit.on_true);
    visit_forward(cfg, order, exit.on_false);
    order.push(current);
}

fn visit_backward(cfg: &mut Cfg, order: &mut Vec<BlockId>, current: BlockId) {
    if cfg[current].flags.contains(BlockFlags::VISITED_BACKWARD) {
        return;
    }
    cfg[current].flags.insert(BlockFlags::VISITED_BACKWARD);

    let mut preds = std::mem::take(&mut cfg[current].preds);
    preds.sort_unstable_by_key(|&p| (cfg[p].loop_depth, p));
    cfg[current].preds = preds.clone();

    let depth = cfg[current].loop_depth;
    let mut i = 0;
    while i < preds.len() && cfg[preds[i]].loop_depth < depth {
        visit_backward(cfg, order, preds[i]);
        i += 1;
    }
    if i > 0 {
        // Some predecessor enters from a shallower scope: this block heads
        // a loop and must precede its body in the order.
        order.push(current);
        while i < preds.len() {
            visit_backward(cfg, order, preds[i]);
            i += 1;
        }
    } else {
        while i < preds.len() {
            visit_backward(cfg, order, preds[i]);
            i += 1;
        }
        order.push(current);
    }
}

/// Sets [`BlockFlags::LOOP_HEADER`] on every block with a predecessor at a
/// strictly shallower loop depth.
pub fn mark_loop_headers(cfg: &mut Cfg) {
    let ids: Vec<BlockId> = cfg.block_ids().collect();
    for id in ids {
        let depth = cfg[id].loop_depth;
        let is_header = cfg[id].preds.iter().any(|&p| cfg[p].loop_depth < depth);
        if is_header {
            cfg[id].flags.insert(BlockFlags::LOOP_HEADER);
        }
    }
}
