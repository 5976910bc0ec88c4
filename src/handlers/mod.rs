//! # Event handlers attached to a broadcast source.
//!
//! This module provides the [`Handle`] trait and the adapters built on it.
//!
//! ## Architecture
//! ```text
//! BroadcastSource::activate(handler, queue, predicates)
//!          │
//!          └──► pump task ──► Handle::on_event(&event, &queue)
//!                                   │
//!                ┌──────────────────┼──────────────────┬─────────────┐
//!                ▼                  ▼                  ▼             ▼
//!            HandleFn          KindRouter          Filtered      LogHandler
//!         (closure → queue)  (ResourceHandler)  (predicates)   (tracing)
//! ```
//!
//! ## Handler types
//! - **Direct handlers** implement [`Handle`] for one payload type.
//! - **Resource handlers** implement [`ResourceHandler`] once and are attached
//!   to any per-kind source through [`KindRouter`].
//! - **Wrappers** ([`Filtered`]) compose with either.

mod handle;
mod handle_fn;
#[cfg(feature = "logging")]
mod log;
mod predicate;
mod resource;

pub use handle::Handle;
pub use handle_fn::HandleFn;
#[cfg(feature = "logging")]
pub use log::LogHandler;
pub use predicate::{Filtered, Predicate, PredicateRef};
pub use resource::{KindRouter, ResourceHandler};
