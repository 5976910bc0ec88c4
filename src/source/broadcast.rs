//! # BroadcastSource: one upstream, many independently paced subscriptions.
//!
//! The [`BroadcastSource`] owns an upstream receiver and a stop signal. Every
//! [`activate`](BroadcastSource::activate) call registers a new subscription
//! (private bounded queue + pump task); the first successful one also starts
//! the single dispatch task that copies upstream events into every queue.
//!
//! ## Architecture
//! ```text
//!   upstream (mpsc::Receiver<E>)          stop (CancellationToken)
//!              │                                   │
//!              └──────────────┬────────────────────┘
//!                             ▼
//!                  ┌─────────────────────┐
//!                  │    dispatch task    │  (at most one per source)
//!                  │  lock(outlets)      │
//!                  │  send to each queue │  sequential, blocking
//!                  └──────────┬──────────┘
//!             ┌───────────────┼───────────────┐
//!             ▼               ▼               ▼
//!        [queue 1]       [queue 2]   ...  [queue N]     (bounded, buffer_size)
//!             │               │               │
//!          pump 1          pump 2   ...    pump N
//!             │               │               │
//!     h1.on_event(&e,&q1) h2.on_event(..)  hN.on_event(..)
//! ```
//!
//! ## Lifecycle
//! ```text
//! Uninitialized ──activate()──► Activated ──stop cancelled──► Stopped
//!                 (spawns dispatch once)     (every queue closed once)
//! ```
//!
//! ## Rules
//! - **Single dispatch task**: started under the outlet lock by the first
//!   successful activation; later activations only add queues.
//! - **Per-subscription FIFO**: each queue sees events in upstream order.
//! - **Late subscribers**: a queue registered after an event was dispatched
//!   never sees that event.
//! - **Backpressure**: a full queue blocks the dispatch task, which stalls
//!   delivery to *every* subscription until that pump catches up. There is no
//!   timeout. Size [`Config::buffer_size`] accordingly.
//! - **Shutdown**: queues are closed only by the dispatch task, under the same
//!   lock that guards sends. No send can follow a close.
//! - **No unsubscribe**: a subscription lives until the source stops.
//!
//! ## Example
//! ```rust
//! use chansource::{BroadcastSource, HandleFn};
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), chansource::SourceError> {
//! let (events, upstream) = mpsc::channel::<u32>(16);
//! let stop = CancellationToken::new();
//! let source = BroadcastSource::builder()
//!     .with_source(upstream)
//!     .with_stop(stop.clone())
//!     .with_buffer_size(64)
//!     .build();
//!
//! let (work, mut work_rx) = mpsc::unbounded_channel::<u32>();
//! let enqueue = HandleFn::arc("enqueue", |ev: &u32, q: &mpsc::UnboundedSender<u32>| {
//!     let _ = q.send(*ev);
//! });
//! let sub = source.activate(enqueue, std::sync::Arc::new(work), []).await?;
//!
//! events.send(7).await.unwrap();
//! assert_eq!(work_rx.recv().await, Some(7));
//!
//! stop.cancel();
//! let stats = sub.join().await?;
//! assert_eq!(stats.delivered, 1);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;
use crate::error::SourceError;
use crate::handlers::{Handle, PredicateRef};

use super::builder::BroadcastSourceBuilder;
use super::subscription::{Subscription, SubscriptionId};
use super::{dispatch, pump};

/// Lifecycle state of a [`BroadcastSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// Constructed; no successful activation yet.
    Uninitialized,
    /// Dispatch task running.
    Activated,
    /// Stop processed; every queue closed. Terminal.
    Stopped,
}

impl SourceState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => SourceState::Uninitialized,
            1 => SourceState::Activated,
            _ => SourceState::Stopped,
        }
    }

    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SourceState::Uninitialized => "uninitialized",
            SourceState::Activated => "activated",
            SourceState::Stopped => "stopped",
        }
    }
}

/// Write end of one subscription queue.
pub(super) struct Outlet<E> {
    pub(super) id: SubscriptionId,
    pub(super) tx: mpsc::Sender<Arc<E>>,
}

/// Everything guarded by the outlet lock.
pub(super) struct Outlets<E> {
    /// Upstream receiver, moved into the dispatch task on first activation.
    pub(super) upstream: Option<mpsc::Receiver<E>>,
    /// One-shot gate for the dispatch task.
    pub(super) started: bool,
    /// Set by the dispatch task when it closes the queues.
    pub(super) stopped: bool,
    pub(super) queues: Vec<Outlet<E>>,
    next_id: u64,
}

impl<E> Outlets<E> {
    fn next_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId::new(self.next_id)
    }
}

/// State shared between the source handles and the dispatch task.
pub(super) struct Shared<E> {
    pub(super) outlets: Mutex<Outlets<E>>,
    stop: OnceLock<CancellationToken>,
    buffer_size: usize,
    state: AtomicU8,
    live: AtomicUsize,
    /// Dispatch tasks spawned so far; never exceeds one.
    dispatches: AtomicUsize,
    /// Cancelled once the dispatch task has closed every queue.
    pub(super) done: CancellationToken,
}

impl<E> Shared<E> {
    pub(super) fn set_state(&self, state: SourceState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub(super) fn set_live(&self, n: usize) {
        self.live.store(n, Ordering::Release);
    }
}

/// Fans one upstream event stream out to any number of subscriptions.
///
/// Cheap to clone: clones share the same upstream, queues and dispatch task.
pub struct BroadcastSource<E> {
    shared: Arc<Shared<E>>,
}

impl<E> Clone for BroadcastSource<E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E> BroadcastSource<E> {
    pub(super) fn from_parts(
        source: Option<mpsc::Receiver<E>>,
        stop: Option<CancellationToken>,
        cfg: &Config,
    ) -> Self {
        let stop_cell = OnceLock::new();
        if let Some(stop) = stop {
            let _ = stop_cell.set(stop);
        }

        Self {
            shared: Arc::new(Shared {
                outlets: Mutex::new(Outlets {
                    upstream: source,
                    started: false,
                    stopped: false,
                    queues: Vec::new(),
                    next_id: 0,
                }),
                stop: stop_cell,
                buffer_size: cfg.buffer_size_or_default(),
                state: AtomicU8::new(SourceState::Uninitialized as u8),
                live: AtomicUsize::new(0),
                dispatches: AtomicUsize::new(0),
                done: CancellationToken::new(),
            }),
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SourceState {
        SourceState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    /// Returns the number of registered (not yet closed) subscription queues.
    pub fn subscriber_count(&self) -> usize {
        self.shared.live.load(Ordering::Acquire)
    }

    /// Returns the capacity given to every subscription queue.
    pub fn buffer_size(&self) -> usize {
        self.shared.buffer_size
    }

    /// Injects the stop signal.
    ///
    /// Only the first injection takes effect (including one made through the
    /// builder). Returns `true` if `stop` was installed.
    pub fn inject_stop(&self, stop: CancellationToken) -> bool {
        self.shared.stop.set(stop).is_ok()
    }

    /// Waits until the dispatch task has closed every queue.
    ///
    /// Never resolves on a source that was never successfully activated.
    pub async fn stopped(&self) {
        self.shared.done.cancelled().await
    }
}

impl<E> BroadcastSource<E>
where
    E: Send + Sync + 'static,
{
    /// Returns a builder.
    pub fn builder() -> BroadcastSourceBuilder<E> {
        BroadcastSourceBuilder::new()
    }

    /// Creates a source with both upstream and stop signal set and the
    /// default buffer size.
    pub fn new(source: mpsc::Receiver<E>, stop: CancellationToken) -> Self {
        Self::from_parts(Some(source), Some(stop), &Config::default())
    }

    /// Attaches a new subscription.
    ///
    /// Creates a bounded queue and spawns a pump that calls
    /// `handler.on_event(&event, &queue)` for every event dispatched from now
    /// on. The first successful call also starts the dispatch task.
    ///
    /// `predicates` are accepted for wiring compatibility and are **not**
    /// evaluated; wrap the handler in [`Filtered`](crate::Filtered) to filter.
    ///
    /// After the source has stopped this still succeeds: the queue is closed
    /// on arrival and the pump exits without seeing an event.
    ///
    /// # Errors
    /// - [`SourceError::SourceNotSpecified`] when no upstream was configured.
    /// - [`SourceError::StopNotInjected`] when no stop signal was set.
    ///
    /// Neither starts a task nor affects existing subscriptions.
    pub async fn activate<Q, H>(
        &self,
        handler: Arc<H>,
        queue: Arc<Q>,
        predicates: impl IntoIterator<Item = PredicateRef<E>>,
    ) -> Result<Subscription, SourceError>
    where
        Q: Send + Sync + 'static,
        H: Handle<E, Q> + ?Sized,
    {
        let mut outlets = self.shared.outlets.lock().await;

        if !outlets.started {
            if outlets.upstream.is_none() {
                return Err(SourceError::SourceNotSpecified);
            }
            let stop = self
                .shared
                .stop
                .get()
                .cloned()
                .ok_or(SourceError::StopNotInjected)?;

            if let Some(upstream) = outlets.upstream.take() {
                outlets.started = true;
                self.shared.set_state(SourceState::Activated);
                tokio::spawn(dispatch::run(Arc::clone(&self.shared), upstream, stop));
                let started = self.shared.dispatches.fetch_add(1, Ordering::AcqRel) + 1;
                debug!(
                    source = %self,
                    buffer_size = self.shared.buffer_size,
                    dispatches = started,
                    "dispatch task started"
                );
            }
        }

        let id = outlets.next_id();
        let handler_name = handler.name();
        let ignored_predicates = predicates.into_iter().count();

        let (tx, rx) = mpsc::channel::<Arc<E>>(self.shared.buffer_size);
        let pump = tokio::spawn(pump::run(id, rx, handler, queue));

        if outlets.stopped {
            drop(tx);
            debug!(
                source = %self,
                subscription = %id,
                handler = handler_name,
                "source already stopped; queue closed on arrival"
            );
        } else {
            outlets.queues.push(Outlet { id, tx });
            self.shared.set_live(outlets.queues.len());
            debug!(
                source = %self,
                subscription = %id,
                handler = handler_name,
                predicates = ignored_predicates,
                "subscription registered"
            );
        }

        Ok(Subscription::new(id, pump))
    }
}

impl<E> fmt::Display for BroadcastSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "broadcast source: {:p}", Arc::as_ptr(&self.shared))
    }
}

impl<E> fmt::Debug for BroadcastSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastSource")
            .field("state", &self.state())
            .field("subscribers", &self.subscriber_count())
            .field("buffer_size", &self.buffer_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandleFn;
    use std::time::Duration;
    use tokio::time::timeout;

    type Sink = mpsc::UnboundedSender<u32>;

    fn forward() -> Arc<HandleFn<impl Fn(&u32, &Sink) + Send + Sync + 'static>> {
        HandleFn::arc("forward", |ev: &u32, q: &Sink| {
            let _ = q.send(*ev);
        })
    }

    #[tokio::test]
    async fn missing_source_is_reported_before_stop() {
        let source: BroadcastSource<u32> = BroadcastSource::builder().build();
        let (sink, _rx) = mpsc::unbounded_channel();

        let err = source
            .activate(forward(), Arc::new(sink), [])
            .await
            .unwrap_err();

        assert_eq!(err, SourceError::SourceNotSpecified);
        assert_eq!(source.state(), SourceState::Uninitialized);
        assert_eq!(source.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn stop_injected_late_unblocks_activation() {
        let (_events, upstream) = mpsc::channel::<u32>(1);
        let source = BroadcastSource::builder().with_source(upstream).build();
        let (sink, _rx) = mpsc::unbounded_channel();
        let sink = Arc::new(sink);

        let err = source
            .activate(forward(), Arc::clone(&sink), [])
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::StopNotInjected);
        assert_eq!(source.state(), SourceState::Uninitialized);

        let stop = CancellationToken::new();
        assert!(source.inject_stop(stop.clone()));
        assert!(!source.inject_stop(CancellationToken::new()));

        let sub = source.activate(forward(), sink, []).await.unwrap();
        assert_eq!(source.state(), SourceState::Activated);
        assert_eq!(source.subscriber_count(), 1);

        stop.cancel();
        timeout(Duration::from_secs(5), source.stopped()).await.unwrap();
        assert_eq!(source.state(), SourceState::Stopped);
        assert_eq!(source.subscriber_count(), 0);
        assert_eq!(sub.join().await.unwrap().received(), 0);
    }

    #[tokio::test]
    async fn ids_follow_activation_order() {
        let (_events, upstream) = mpsc::channel::<u32>(1);
        let stop = CancellationToken::new();
        let source = BroadcastSource::new(upstream, stop.clone());
        let (sink, _rx) = mpsc::unbounded_channel();
        let sink = Arc::new(sink);

        let a = source.activate(forward(), Arc::clone(&sink), []).await.unwrap();
        let b = source.activate(forward(), sink, []).await.unwrap();

        assert_eq!(a.id().get(), 1);
        assert_eq!(b.id().get(), 2);
        assert_eq!(b.id().to_string(), "sub-2");
        stop.cancel();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_activations_spawn_one_dispatch_and_one_pump_each() {
        let (events, upstream) = mpsc::channel::<u32>(4);
        let stop = CancellationToken::new();
        let source = BroadcastSource::new(upstream, stop.clone());
        let (sink, mut rx) = mpsc::unbounded_channel();
        let sink = Arc::new(sink);

        let mut set = tokio::task::JoinSet::new();
        for _ in 0..32 {
            let source = source.clone();
            let sink = Arc::clone(&sink);
            set.spawn(async move { source.activate(forward(), sink, []).await });
        }
        let mut subs = Vec::new();
        while let Some(res) = set.join_next().await {
            subs.push(res.unwrap().unwrap());
        }

        assert_eq!(source.shared.dispatches.load(Ordering::Acquire), 1);
        {
            let outlets = source.shared.outlets.lock().await;
            assert!(outlets.started);
            assert!(outlets.upstream.is_none());
            assert_eq!(outlets.queues.len(), 32);
        }

        events.send(5).await.unwrap();
        for _ in 0..32 {
            let ev = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
            assert_eq!(ev, Some(5));
        }

        stop.cancel();
        for sub in subs {
            assert_eq!(sub.join().await.unwrap().delivered, 1);
        }
        assert_eq!(source.shared.dispatches.load(Ordering::Acquire), 1);
    }

    #[test]
    fn display_and_default_buffer() {
        let (_events, upstream) = mpsc::channel::<u32>(1);
        let source = BroadcastSource::new(upstream, CancellationToken::new());

        assert!(source.to_string().starts_with("broadcast source: 0x"));
        assert_eq!(source.buffer_size(), crate::config::DEFAULT_BUFFER_SIZE);
        assert_eq!(source.state().as_label(), "uninitialized");
    }
}
