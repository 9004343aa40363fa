//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use typeflow::prelude::*;
//!
//! let symbols = SymbolTable::new();
//! let ctx = Context::new(&symbols);
//! let mut cfg = Cfg::new();
//! finalize(ctx, &mut cfg, &NullMetrics);
//! ```

pub use crate::analysis::ReadsAndWrites;
pub use crate::cfg::{
    BasicBlock, Binding, BlockExit, BlockFlags, BlockId, Cfg, Instruction, LocalVariable,
};
pub use crate::metrics::{MetricsSink, NullMetrics, RecordingMetrics};
pub use crate::passes::{
    compute_min_max_loops, compute_orders, dealias, finalize, infer_block_args, mark_loop_headers,
    remove_dead_assigns, simplify,
};
pub use crate::symbols::{Context, NameId, NameKind, SymbolTable};
pub use crate::{Error, Result};
