//! Caller-side view of one activation.

use std::fmt;

use tokio::task::JoinHandle;

use crate::error::SourceError;

/// Identifier of a subscription, unique within one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id (activation order, starting at 1).
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Counters reported by a pump when its queue is closed and drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Events the handler processed without panicking.
    pub delivered: u64,
    /// Events whose handler call panicked.
    pub panicked: u64,
}

impl PumpStats {
    /// Total number of events taken from the queue.
    pub fn received(&self) -> u64 {
        self.delivered + self.panicked
    }
}

/// Handle to a subscription created by
/// [`BroadcastSource::activate`](crate::BroadcastSource::activate).
///
/// The queue belongs to the source: dropping this handle detaches the caller
/// from the pump but does **not** close the queue. Only the stop signal does.
#[derive(Debug)]
#[must_use = "dropping the handle detaches the pump; keep it to observe shutdown"]
pub struct Subscription {
    id: SubscriptionId,
    pump: JoinHandle<PumpStats>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, pump: JoinHandle<PumpStats>) -> Self {
        Self { id, pump }
    }

    /// Returns the subscription id.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns `true` once the pump has exited.
    pub fn is_finished(&self) -> bool {
        self.pump.is_finished()
    }

    /// Waits for the pump to drain its closed queue and exit.
    ///
    /// Resolves only after the source has stopped.
    pub async fn join(self) -> Result<PumpStats, SourceError> {
        let Self { id, pump } = self;
        pump.await.map_err(|_| SourceError::PumpAborted { id })
    }
}
