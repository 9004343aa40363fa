use thiserror::Error;

use crate::cfg::BlockId;

/// The generic error type covering all failures this library can return.
///
/// The optimization pipeline itself is total: every structurally valid
/// graph produces a valid output, and internal invariant violations are
/// debug assertions rather than recoverable errors. What can fail is the
/// construction surface — wiring blocks together with ids that do not name
/// live blocks, or retargeting blocks whose exits are fixed.
#[derive(Error, Debug)]
pub enum Error {
    /// A block id named a removed or never-created block.
    #[error("unknown or removed basic block - {0}")]
    UnknownBlock(BlockId),

    /// The requested edit would produce a malformed graph.
    #[error("{0}")]
    Graph(String),
}
