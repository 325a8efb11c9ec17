//! Per-run metrics collected by the coordinator.
//!
//! [`RunMetrics`] captures timing and message counts for one simulation
//! run. All durations are in microseconds.

/// Timing and traffic metrics for a single run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Time spent validating, partitioning, and distributing chunks.
    pub setup_us: u64,
    /// Time spent in the per-generation boundary exchange.
    pub exchange_us: u64,
    /// Time spent collecting chunks.
    pub gather_us: u64,
    /// Generations exchanged.
    pub generations: u64,
    /// Number of worker ranks.
    pub workers: usize,
    /// Workers that own zero cells.
    pub empty_chunks: usize,
    /// Messages sent by the coordinator.
    pub messages_sent: u64,
    /// Messages received by the coordinator.
    pub messages_received: u64,
}

impl RunMetrics {
    /// Exchange plus gather time: the span the elapsed-time log reports.
    pub fn run_us(&self) -> u64 {
        self.exchange_us + self.gather_us
    }
}
