//! # Event handler trait.
//!
//! Provides [`Handle`] the extension point through which a subscription's
//! events reach user code.
//!
//! Each activation gets:
//! - **Dedicated pump task** (runs independently)
//! - **Private bounded queue** (capacity from [`Config::buffer_size`](crate::Config))
//! - **Panic isolation** (a panicking call is logged and the pump moves on)
//!
//! ## Architecture
//! ```text
//! dispatch ──► [bounded queue] ──► pump task ──► handler.on_event(&event, &queue)
//!                                          └─► panic caught → warn!, next event
//! ```
//!
//! ## Rules
//! - A slow handler delays its own pump. Once its queue is full it also stalls
//!   the dispatch task, and through it every other subscription.
//! - Events are processed sequentially (FIFO) per subscription.
//! - The work queue `Q` is passed through untouched; the source never reads it.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use chansource::Handle;
//! use tokio::sync::mpsc;
//!
//! struct Enqueue;
//!
//! #[async_trait]
//! impl Handle<u64, mpsc::UnboundedSender<u64>> for Enqueue {
//!     async fn on_event(&self, id: &u64, queue: &mpsc::UnboundedSender<u64>) {
//!         let _ = queue.send(*id);
//!     }
//!
//!     fn name(&self) -> &'static str { "enqueue" }
//! }
//! ```

use async_trait::async_trait;

/// Consumer of broadcast events.
///
/// ### Implementation requirements
/// - Do not block indefinitely; the pump calls handlers one event at a time.
/// - Handle errors internally. Panics are caught but the event is lost for
///   this subscription.
#[async_trait]
pub trait Handle<E, Q>: Send + Sync + 'static
where
    E: Send + Sync + 'static,
    Q: Send + Sync + 'static,
{
    /// Processes one event.
    ///
    /// Called from the subscription's pump task, never from the dispatch task.
    async fn on_event(&self, event: &E, queue: &Q);

    /// Returns the handler name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
