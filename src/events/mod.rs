//! Resource change payloads.
//!
//! ## Contents
//! - [`EventKind`] classification of changes
//! - [`CreateEvent`], [`UpdateEvent`], [`DeleteEvent`] one payload per kind
//! - [`Notification`] the three kinds multiplexed on one stream
//!
//! The broadcast source never inspects these; they exist so that handlers
//! implementing [`ResourceHandler`](crate::ResourceHandler) can be attached to
//! any of the per-kind sources.

mod event;

pub use event::{CreateEvent, DeleteEvent, EventKind, Notification, UpdateEvent};
