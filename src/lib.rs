#![deny(missing_docs)]

//! # typeflow
//!
//! The control-flow-graph construction and optimization core of a static
//! type checker for a dynamically-typed object-oriented language.
//!
//! A frontend lowers each method body into a linear sequence of
//! three-address bindings split across basic blocks with structured two-way
//! exits. This crate takes that freshly built, unoptimized graph and turns
//! it into something a dataflow-based type inference can consume: the graph
//! is simplified to a fixpoint, traversal orders are derived, copy chains
//! introduced by expression flattening are collapsed, every block learns
//! its formal parameters (the variables live across its boundary), and
//! bindings nobody reads are dropped.
//!
//! # Architecture
//!
//! - [`cfg`] — the data model: an arena-owned graph of basic blocks linked
//!   by dense ids, three-address instructions and local variables.
//! - [`symbols`] — the name interner and the read-only [`symbols::Context`]
//!   handle every pass receives.
//! - [`analysis`] — per-variable read/write block sets.
//! - [`passes`] — the optimization pipeline and its driver,
//!   [`passes::finalize`].
//! - [`metrics`] — optional histogram emission from the pipeline.
//!
//! The core is strictly single-threaded per graph; parallelism across
//! methods belongs to the caller.
//!
//! # Usage
//!
//! ```rust
//! use typeflow::prelude::*;
//!
//! let mut symbols = SymbolTable::new();
//! let x = LocalVariable::new(symbols.intern("x", NameKind::Source));
//! let t = LocalVariable::new(symbols.intern("<temp>1", NameKind::Temporary));
//! let puts = symbols.intern("puts", NameKind::Source);
//!
//! // x = 1; <temp>1 = x; self.puts(<temp>1)
//! let mut cfg = Cfg::new();
//! cfg.set_exit(cfg.entry(), None, cfg.dead_block(), cfg.dead_block())?;
//! let entry = cfg.entry();
//! cfg[entry].bindings = vec![
//!     Binding::new(x, Instruction::IntLit(1)),
//!     Binding::new(t, Instruction::Ident(x)),
//!     Binding::new(t, Instruction::Send { recv: t, name: puts, args: vec![] }),
//! ];
//!
//! let ctx = Context::new(&symbols);
//! finalize(ctx, &mut cfg, &NullMetrics);
//! # Ok::<(), typeflow::Error>(())
//! ```

pub mod analysis;
pub mod cfg;
mod error;
pub mod metrics;
pub mod passes;
pub mod prelude;
pub mod symbols;

pub use error::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

pub use analysis::ReadsAndWrites;
pub use cfg::{BasicBlock, Binding, BlockExit, BlockFlags, BlockId, Cfg, Instruction, LocalVariable};
pub use passes::finalize;
pub use symbols::{Context, NameId, NameKind, SymbolTable};
