//! Iterative peephole simplification of the graph.
//!
//! The frontend emits one block per syntactic construct, which leaves the
//! graph full of empty pass-through blocks, straight-line chains split
//! across blocks and unreachable leftovers. This pass runs a small set of
//! local rewrites to a fixpoint:
//!
//! 1. **Unreachable pruning** — a non-entry block with no predecessors is
//!    unlinked from its successors and removed from the arena.
//! 2. **Predecessor canonicalization** — predecessor lists are sorted by id
//!    and deduplicated.
//! 3. **Merging** — a block whose two exit targets coincide absorbs that
//!    successor when it is the successor's only predecessor, or skips over
//!    it when the successor is empty (block headers, recognized by their
//!    exit-condition marker, are never skipped).
//! 4. **Shortcutting** — an exit edge pointing at an empty block with an
//!    unconditional exit is retargeted past it, separately for the then and
//!    else edges.
//!
//! Every rewrite strictly shrinks the block count, the edge count or the
//! number of pending merges, so the fixpoint terminates. Rules are ordered:
//! unreachable blocks are pruned before shortcutting so the pass never
//! routes edges through freshly orphaned blocks.
//!
//! In debug builds [`sanity_check`] validates the back-link invariants
//! after every rewrite.

use crate::cfg::{BlockId, Cfg};
use crate::symbols::Context;

/// Runs the simplification fixpoint over the whole graph.
pub fn simplify(ctx: Context<'_>, cfg: &mut Cfg) {
    sanity_check(cfg);
    let mut changed = true;
    while changed {
        changed = false;
        let ids: Vec<BlockId> = cfg.block_ids().collect();
        for bb in ids {
            if !cfg.is_live(bb) {
                continue;
            }
            // Re-apply rules to the same block until none fires; a merge
            // often enables another merge immediately.
            while simplify_block(ctx, cfg, bb) {
                changed = true;
                if !cfg.is_live(bb) {
                    break;
                }
            }
        }
    }
}

/// Applies the first applicable rewrite to `bb`. Returns `true` if the
/// graph changed (after which `bb` may no longer be live).
fn simplify_block(ctx: Context<'_>, cfg: &mut Cfg, bb: BlockId) -> bool {
    let entry = cfg.entry();
    let dead = cfg.dead_block();

    if bb != entry && bb != dead {
        if cfg[bb].preds.is_empty() {
            prune_unreachable(cfg, bb);
            sanity_check(cfg);
            return true;
        }
        let preds = &mut cfg[bb].preds;
        preds.sort_unstable();
        preds.dedup();
    }

    let exit = cfg[bb].exit;
    if exit.on_true == exit.on_false && exit.on_true != dead && exit.on_true != bb {
        let succ = exit.on_true;
        if cfg[succ].preds.len() == 1 {
            // bb is the only way into succ: absorb it wholesale. succ keeps
            // its exit but loses its predecessors, so unreachable pruning
            // collects it on a later visit.
            let moved = std::mem::take(&mut cfg[succ].bindings);
            cfg[bb].bindings.extend(moved);
            cfg[succ].preds.clear();
            let new_exit = cfg[succ].exit;
            cfg[bb].exit = new_exit;
            cfg[new_exit.on_true].preds.push(bb);
            if new_exit.on_true != new_exit.on_false {
                cfg[new_exit.on_false].preds.push(bb);
            }
            sanity_check(cfg);
            return true;
        }
        let is_block_header =
            matches!(cfg[succ].exit.cond, Some(c) if c.name() == ctx.block_call());
        if !is_block_header && cfg[succ].bindings.is_empty() {
            // succ has other predecessors but nothing to execute: take over
            // its exit and step out of its predecessor list.
            let new_exit = cfg[succ].exit;
            cfg[bb].exit = new_exit;
            cfg[succ].preds.retain(|&p| p != bb);
            cfg[new_exit.on_true].preds.push(bb);
            if new_exit.on_true != new_exit.on_false {
                cfg[new_exit.on_false].preds.push(bb);
            }
            sanity_check(cfg);
            return true;
        }
    }

    let exit = cfg[bb].exit;
    let succ = exit.on_true;
    if succ != dead
        && cfg[succ].bindings.is_empty()
        && cfg[succ].exit.is_unconditional()
        && cfg[succ].exit.on_true != succ
    {
        // Shortcut the then edge past an empty forwarding block.
        let target = cfg[succ].exit.on_true;
        cfg[bb].exit.on_true = target;
        cfg[target].preds.push(bb);
        cfg[succ].preds.retain(|&p| p != bb);
        sanity_check(cfg);
        return true;
    }

    let exit = cfg[bb].exit;
    let succ = exit.on_false;
    if succ != dead
        && cfg[succ].bindings.is_empty()
        && cfg[succ].exit.is_unconditional()
        && cfg[succ].exit.on_false != succ
    {
        // Shortcut the else edge symmetrically.
        let target = cfg[succ].exit.on_false;
        cfg[bb].exit.on_false = target;
        cfg[target].preds.push(bb);
        cfg[succ].preds.retain(|&p| p != bb);
        sanity_check(cfg);
        return true;
    }

    false
}

fn prune_unreachable(cfg: &mut Cfg, bb: BlockId) {
    let exit = cfg[bb].exit;
    cfg[exit.on_true].preds.retain(|&p| p != bb);
    if exit.on_false != exit.on_true {
        cfg[exit.on_false].preds.retain(|&p| p != bb);
    }
    cfg.remove_block(bb);
    cfg.postorder.retain(|&b| b != bb);
    cfg.nesting_order.retain(|&b| b != bb);
}

/// Validates the back-link invariants between exits and predecessor lists.
///
/// Only active in debug builds. A violation is a programming error in
/// whatever mutated the graph last, and panics.
pub(crate) fn sanity_check(cfg: &Cfg) {
    if !cfg!(debug_assertions) {
        return;
    }
    for bb in cfg.block_ids() {
        for &parent in &cfg[bb].preds {
            assert!(
                cfg.is_live(parent),
                "{bb} lists removed block {parent} as a predecessor"
            );
            let pexit = cfg[parent].exit;
            assert!(
                pexit.on_true == bb || pexit.on_false == bb,
                "{parent} is listed as a predecessor of {bb} but does not target it"
            );
        }
        if bb == cfg.dead_block() {
            continue;
        }
        let exit = cfg[bb].exit;
        assert!(
            cfg[exit.on_true].preds.contains(&bb),
            "{bb} targets {} but is missing from its predecessors",
            exit.on_true
        );
        assert!(
            cfg[exit.on_false].preds.contains(&bb),
            "{bb} targets {} but is missing from its predecessors",
            exit.on_false
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{Binding, Instruction, LocalVariable};
    use crate::symbols::{NameKind, SymbolTable};

    fn ctx_table() -> SymbolTable {
        SymbolTable::new()
    }

    fn source(table: &mut SymbolTable, text: &str) -> LocalVariable {
        LocalVariable::new(table.intern(text, NameKind::Source))
    }

    #[test]
    fn test_unreachable_block_is_pruned() {
        let mut table = ctx_table();
        let c = source(&mut table, "c");
        let mut cfg = Cfg::new();
        let a = cfg.fresh_block(0);
        let b = cfg.fresh_block(0);
        let orphan = cfg.fresh_block(0);
        cfg.set_exit(cfg.entry(), Some(c), a, b).unwrap();
        cfg.set_exit(a, None, cfg.dead_block(), cfg.dead_block())
            .unwrap();
        cfg.set_exit(b, None, cfg.dead_block(), cfg.dead_block())
            .unwrap();
        cfg.set_exit(orphan, None, a, a).unwrap();
        cfg[a].bindings.push(Binding::new(
            source(&mut table, "x"),
            Instruction::IntLit(1),
        ));
        cfg[b].bindings.push(Binding::new(
            source(&mut table, "y"),
            Instruction::IntLit(2),
        ));

        simplify(Context::new(&table), &mut cfg);

        assert!(!cfg.is_live(orphan));
        assert!(cfg.is_live(a));
        assert_eq!(cfg[a].preds, vec![cfg.entry()]);
    }

    #[test]
    fn test_straight_line_chain_merges_into_one_block() {
        let mut table = ctx_table();
        let x = source(&mut table, "x");
        let y = source(&mut table, "y");
        let mut cfg = Cfg::new();
        let a = cfg.fresh_block(0);
        let b = cfg.fresh_block(0);
        cfg.set_exit(cfg.entry(), None, a, a).unwrap();
        cfg.set_exit(a, None, b, b).unwrap();
        cfg.set_exit(b, None, cfg.dead_block(), cfg.dead_block())
            .unwrap();
        cfg[a].bindings.push(Binding::new(x, Instruction::IntLit(1)));
        cfg[b].bindings.push(Binding::new(y, Instruction::IntLit(2)));

        simplify(Context::new(&table), &mut cfg);

        // Everything folds into the entry block.
        assert!(!cfg.is_live(a));
        assert!(!cfg.is_live(b));
        let entry = &cfg[cfg.entry()];
        assert_eq!(entry.bindings.len(), 2);
        assert_eq!(entry.bindings[0].bind, x);
        assert_eq!(entry.bindings[1].bind, y);
        assert_eq!(entry.exit.on_true, cfg.dead_block());
    }

    #[test]
    fn test_empty_passthrough_is_skipped_for_shared_successor() {
        let mut table = ctx_table();
        let c1 = source(&mut table, "c1");
        let c2 = source(&mut table, "c2");
        let r = source(&mut table, "r");
        let m = table.intern("m", NameKind::Source);
        let mut cfg = Cfg::new();
        let p1 = cfg.fresh_block(0);
        let p2 = cfg.fresh_block(0);
        let mid = cfg.fresh_block(0);
        let tail = cfg.fresh_block(0);
        cfg.set_exit(cfg.entry(), Some(c1), p1, p2).unwrap();
        cfg.set_exit(p1, Some(c2), mid, tail).unwrap();
        cfg.set_exit(p2, Some(c2), mid, tail).unwrap();
        cfg.set_exit(mid, None, tail, tail).unwrap();
        cfg.set_exit(tail, None, cfg.dead_block(), cfg.dead_block())
            .unwrap();
        cfg[p1].bindings.push(Binding::new(
            r,
            Instruction::Send {
                recv: c1,
                name: m,
                args: vec![],
            },
        ));
        cfg[p2].bindings.push(Binding::new(
            r,
            Instruction::Send {
                recv: c2,
                name: m,
                args: vec![],
            },
        ));
        cfg[tail].bindings.push(Binding::new(
            r,
            Instruction::Send {
                recv: c1,
                name: m,
                args: vec![],
            },
        ));

        simplify(Context::new(&table), &mut cfg);

        // Both conditional edges into `mid` get retargeted to `tail` and
        // `mid` becomes unreachable.
        assert!(!cfg.is_live(mid));
        assert_eq!(cfg[p1].exit.on_true, tail);
        assert_eq!(cfg[p2].exit.on_true, tail);
        assert_eq!(cfg[tail].preds, vec![p1, p2]);
    }

    #[test]
    fn test_block_header_is_not_merged() {
        let mut table = ctx_table();
        let header_cond = LocalVariable::new(table.block_call());
        let r = source(&mut table, "r");
        let m = table.intern("m", NameKind::Source);
        let mut cfg = Cfg::new();
        let header = cfg.fresh_block(1);
        let body = cfg.fresh_block(1);
        let exitb = cfg.fresh_block(0);
        cfg.set_exit(cfg.entry(), None, header, header).unwrap();
        cfg.set_exit(header, Some(header_cond), body, exitb).unwrap();
        cfg.set_exit(body, None, header, header).unwrap();
        cfg.set_exit(exitb, None, cfg.dead_block(), cfg.dead_block())
            .unwrap();
        cfg[body].bindings.push(Binding::new(
            r,
            Instruction::Send {
                recv: r,
                name: m,
                args: vec![],
            },
        ));

        simplify(Context::new(&table), &mut cfg);

        // The header is empty and the entry exits into it unconditionally,
        // but its condition carries the block-call marker so it survives.
        assert!(cfg.is_live(header));
        assert_eq!(cfg[cfg.entry()].exit.on_true, header);
    }

    #[test]
    fn test_predecessors_sorted_and_deduplicated() {
        let mut table = ctx_table();
        let r = source(&mut table, "r");
        let m = table.intern("m", NameKind::Source);
        let c = source(&mut table, "c");
        let mut cfg = Cfg::new();
        let a = cfg.fresh_block(0);
        let b = cfg.fresh_block(0);
        let other = cfg.fresh_block(0);
        cfg.set_exit(cfg.entry(), Some(c), b, other).unwrap();
        cfg.set_exit(a, None, b, b).unwrap();
        cfg.set_exit(b, None, cfg.dead_block(), cfg.dead_block())
            .unwrap();
        cfg.set_exit(other, None, cfg.dead_block(), cfg.dead_block())
            .unwrap();
        cfg[b].bindings.push(Binding::new(
            r,
            Instruction::Send {
                recv: r,
                name: m,
                args: vec![],
            },
        ));
        cfg[other].bindings.push(Binding::new(
            r,
            Instruction::Send {
                recv: c,
                name: m,
                args: vec![],
            },
        ));
        // a is unreachable and will be pruned; make b's predecessor list
        // messy first to observe canonicalization.
        cfg[b].preds = vec![a, cfg.entry(), a, cfg.entry()];

        simplify(Context::new(&table), &mut cfg);

        assert!(!cfg.is_live(a));
        assert_eq!(cfg[b].preds, vec![cfg.entry()]);
    }

    #[test]
    fn test_self_loop_is_not_merged_away() {
        let mut table = ctx_table();
        let c = source(&mut table, "c");
        let i = source(&mut table, "i");
        let m = table.intern("succ", NameKind::Source);
        let mut cfg = Cfg::new();
        let looping = cfg.fresh_block(1);
        let after = cfg.fresh_block(0);
        cfg.set_exit(cfg.entry(), None, looping, looping).unwrap();
        cfg.set_exit(looping, Some(c), looping, after).unwrap();
        cfg.set_exit(after, None, cfg.dead_block(), cfg.dead_block())
            .unwrap();
        cfg[looping].bindings.push(Binding::new(
            i,
            Instruction::Send {
                recv: i,
                name: m,
                args: vec![],
            },
        ));

        simplify(Context::new(&table), &mut cfg);

        assert!(cfg.is_live(looping));
        assert_eq!(cfg[looping].exit.on_true, looping);
        assert!(cfg[looping].preds.contains(&looping));
    }
}
