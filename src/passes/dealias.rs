//! Copy-alias collapsing across the whole graph.
//!
//! The frontend flattens nested expressions into chains of synthetic
//! temporaries, so `a.foo(a = "2", ...)` produces copies of copies. A
//! purely local rewrite cannot collapse them: a copy recorded in one block
//! may be used in another, and at join points the copies from each path
//! must agree. This pass threads a per-block alias map (variable → the
//! variable it copies) through the nesting order, in which every block's
//! predecessors have already been processed.
//!
//! At a join, the incoming maps are met: an alias survives only if every
//! predecessor's out-map contains the same entry. An alias missing from
//! any predecessor is dropped, which is correct but conservative for loop
//! headers, where the back-edge predecessor has not been processed yet and
//! contributes an empty map.
//!
//! Only synthetic temporaries are ever replaced; source-level variables
//! carry user-visible identity and stay put. Replacement needs no chasing:
//! the invalidation step keeps maps free of stale transitive entries, so a
//! single lookup is exact.

use rustc_hash::FxHashMap;

use crate::cfg::{BlockId, Cfg, Instruction, LocalVariable};
use crate::symbols::Context;

/// Collapses copy chains through the graph, rewriting operands and exit
/// conditions in place.
pub fn dealias(ctx: Context<'_>, cfg: &mut Cfg) {
    let mut out_aliases: Vec<FxHashMap<LocalVariable, LocalVariable>> =
        vec![FxHashMap::default(); cfg.id_bound()];

    let order: Vec<BlockId> = cfg.nesting_order.clone();
    for bb in order {
        if bb == cfg.dead_block() {
            continue;
        }

        let preds = cfg[bb].preds.clone();
        let mut current = match preds.first() {
            Some(&first) => out_aliases[first.index()].clone(),
            None => FxHashMap::default(),
        };
        for &parent in &preds {
            let other = &out_aliases[parent.index()];
            current.retain(|k, v| other.get(k).map_or(false, |o| *o == *v));
        }

        for binding in cfg[bb].bindings.iter_mut() {
            if let Instruction::Ident(what) = &mut binding.value {
                *what = resolve_alias(ctx, *what, &current);
            }
            // The bound variable is being redefined: any alias *to* it is
            // now stale.
            let bound = binding.bind;
            current.retain(|_, v| *v != bound);
            match &mut binding.value {
                Instruction::Ident(what) => {
                    *what = resolve_alias(ctx, *what, &current);
                }
                Instruction::Send { recv, args, .. } => {
                    *recv = resolve_alias(ctx, *recv, &current);
                    for arg in args.iter_mut() {
                        *arg = resolve_alias(ctx, *arg, &current);
                    }
                }
                Instruction::Return(what) => {
                    *what = resolve_alias(ctx, *what, &current);
                }
                _ => {}
            }
            if let Instruction::Ident(what) = &binding.value {
                current.insert(binding.bind, *what);
            }
        }

        if let Some(cond) = cfg[bb].exit.cond {
            cfg[bb].exit.cond = Some(resolve_alias(ctx, cond, &current));
        }

        out_aliases[bb.index()] = current;
    }
}

fn resolve_alias(
    ctx: Context<'_>,
    what: LocalVariable,
    aliases: &FxHashMap<LocalVariable, LocalVariable>,
) -> LocalVariable {
    if what.is_synthetic_temporary(ctx) {
        aliases.get(&what).copied().unwrap_or(what)
    } else {
        what
    }
}
