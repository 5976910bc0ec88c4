//! # chansource
//!
//! **chansource** multiplexes one watch stream across many independently
//! registered processing pipelines.
//!
//! A [`BroadcastSource`] takes a single upstream receiver of events and fans
//! it out, live, to a growing set of subscriptions. Each subscription has its
//! own bounded queue and pump task, so handlers consume at their own pace; one
//! dispatch task is started no matter how many subscriptions register, and
//! shutdown never races with delivery.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   watcher / informer ──► mpsc::Sender<E>
//!                                │
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  BroadcastSource<E>                                               │
//! │  - upstream receiver (moved into dispatch on first activation)    │
//! │  - stop signal (CancellationToken, first injection wins)          │
//! │  - outlets (Mutex<Vec<queue sender>>) + start-once gate           │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                       ┌────────────────┐
//!                       │ dispatch task  │  one per source
//!                       └───┬────────┬───┘
//!                  sequential, blocking send
//!               ┌───────────┼────────┼───────────┐
//!               ▼           ▼        ▼           ▼
//!           [queue 1]   [queue 2]  ...       [queue N]
//!               ▼           ▼                    ▼
//!            pump 1      pump 2               pump N
//!               ▼           ▼                    ▼
//!        h1.on_event  h2.on_event          hN.on_event(&event, &work_queue)
//! ```
//!
//! ### Lifecycle
//! ```text
//! BroadcastSource::builder() ──► build()                       Uninitialized
//!
//! activate(handler, queue, predicates)
//!   ├─► source missing?  ─► Err(SourceNotSpecified)
//!   ├─► stop missing?    ─► Err(StopNotInjected)
//!   ├─► first success    ─► spawn dispatch                     Activated
//!   ├─► create bounded queue, spawn pump
//!   └─► register queue (or close it at once if already stopped)
//!
//! stop.cancel()
//!   └─► dispatch: lock, drop every queue sender, unlock        Stopped
//!         └─► pumps drain what is buffered, then exit
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Distribution**  | One upstream, many bounded subscription queues.              | [`BroadcastSource`], [`Subscription`]       |
//! | **Handlers**      | Per-subscription event consumers and adapters.               | [`Handle`], [`HandleFn`], [`Filtered`]      |
//! | **Resource kinds**| Create/update/delete payloads and per-kind sources.          | [`Notification`], [`ResourceHandler`]       |
//! | **Errors**        | Typed configuration and pump errors.                         | [`SourceError`]                             |
//! | **Configuration** | Queue capacity per subscription.                             | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogHandler`] that traces every event _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use chansource::{CreateEvent, CreateSource, HandleFn};
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (events, upstream) = mpsc::channel(16);
//!     let stop = CancellationToken::new();
//!     let source: CreateSource<String> = CreateSource::new(upstream, stop.clone());
//!
//!     // Two pipelines watching the same stream.
//!     let mut subs = Vec::new();
//!     for name in ["audit", "reconcile"] {
//!         let (work, mut work_rx) = mpsc::unbounded_channel::<String>();
//!         let enqueue = HandleFn::arc(name, |ev: &CreateEvent<String>, q: &mpsc::UnboundedSender<String>| {
//!             let _ = q.send(ev.object.clone());
//!         });
//!         subs.push(source.activate(enqueue, Arc::new(work), []).await?);
//!         tokio::spawn(async move {
//!             while let Some(key) = work_rx.recv().await {
//!                 println!("{name}: {key}");
//!             }
//!         });
//!     }
//!
//!     events.send(CreateEvent { object: "ns/pod-a".to_string() }).await?;
//!
//!     stop.cancel();
//!     for sub in subs {
//!         sub.join().await?;
//!     }
//!     Ok(())
//! }
//! ```
mod config;
mod error;
pub mod events;
mod handlers;
mod source;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_BUFFER_SIZE};
pub use error::SourceError;
pub use events::{CreateEvent, DeleteEvent, EventKind, Notification, UpdateEvent};
pub use handlers::{
    Filtered, Handle, HandleFn, KindRouter, Predicate, PredicateRef, ResourceHandler,
};
pub use source::{
    BroadcastSource, BroadcastSourceBuilder, CreateSource, DeleteSource, NotificationSource,
    PumpStats, SourceState, Subscription, SubscriptionId, UpdateSource,
};

// Optional: expose a simple built-in tracing handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogHandler;
