//! Removal of bindings whose result is never read.
//!
//! After dealiasing, collapsed copy chains leave behind bindings nobody
//! reads. A binding is dropped when all of the following hold:
//!
//! - the bound variable is not an alias for a module-scope name (those
//!   writes are observable beyond the method);
//! - no block reads the bound variable;
//! - the right-hand side is a pure instruction.
//!
//! Calls, returns and allocations are kept for their side effects even
//! when the result is unused. One sweep suffices: the chains a removal
//! could expose were already collapsed by dealiasing.

use crate::analysis::ReadsAndWrites;
use crate::cfg::{BlockId, Cfg};
use crate::symbols::Context;

/// Drops pure, unread, non-global bindings from every block.
pub fn remove_dead_assigns(ctx: Context<'_>, rnw: &ReadsAndWrites, cfg: &mut Cfg) {
    let ids: Vec<BlockId> = cfg.block_ids().collect();
    for id in ids {
        cfg[id].bindings.retain(|binding| {
            if binding.bind.is_alias_for_global(ctx) {
                return true;
            }
            if rnw.is_read(binding.bind) {
                return true;
            }
            !binding.value.is_pure()
        });
    }
}
