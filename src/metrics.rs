//! Histogram counters emitted by the optimization pipeline.
//!
//! The pipeline reports a few distribution counters (reads per block,
//! writes per block, block-argument counts) to a pluggable sink. Callers
//! that do not care pass [`NullMetrics`]; tests and instrumented builds can
//! use [`RecordingMetrics`] to inspect what was emitted.
//!
//! Emission is strictly optional: no pass behaves differently based on the
//! sink.

use std::cell::RefCell;

/// Counter names emitted by the pipeline.
pub mod counters {
    /// Size of each variable's read set, one sample per variable.
    pub const READS_PER_BLOCK: &str = "cfgbuilder.readsPerBlock";
    /// Size of each variable's write set, one sample per variable.
    pub const WRITES_PER_BLOCK: &str = "cfgbuilder.writesPerBlock";
    /// Number of inferred arguments, one sample per block.
    pub const BLOCK_ARGUMENTS: &str = "cfgbuilder.blockArguments";
}

/// Sink for histogram samples emitted by the pipeline.
pub trait MetricsSink {
    /// Records one sample of `value` under the histogram `name`.
    fn histogram_inc(&self, name: &'static str, value: usize);
}

/// Sink that discards every sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMetrics;

impl MetricsSink for NullMetrics {
    fn histogram_inc(&self, _name: &'static str, _value: usize) {}
}

/// Sink that keeps every sample in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    samples: RefCell<Vec<(&'static str, usize)>>,
}

impl RecordingMetrics {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all samples recorded so far.
    #[must_use]
    pub fn samples(&self) -> Vec<(&'static str, usize)> {
        self.samples.borrow().clone()
    }

    /// Returns the samples recorded under one histogram name.
    #[must_use]
    pub fn samples_for(&self, name: &str) -> Vec<usize> {
        self.samples
            .borrow()
            .iter()
            .filter(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl MetricsSink for RecordingMetrics {
    fn histogram_inc(&self, name: &'static str, value: usize) {
        self.samples.borrow_mut().push((name, value));
    }
}
