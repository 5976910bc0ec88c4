//! Broadcast source: distribution core.
//!
//! The only public entry point is [`BroadcastSource`]; the per-kind aliases
//! below instantiate it for the payloads in [`events`](crate::events).
//!
//! Internal modules:
//! - [`broadcast`]: the source handle, outlet lock and activation;
//! - [`dispatch`]: the single task copying upstream events into every queue;
//! - [`pump`]: one task per subscription feeding its handler;
//! - [`subscription`]: caller-side handle, ids and pump counters;
//! - [`builder`]: construction.

mod broadcast;
mod builder;
mod dispatch;
mod pump;
mod subscription;

pub use broadcast::{BroadcastSource, SourceState};
pub use builder::BroadcastSourceBuilder;
pub use subscription::{PumpStats, Subscription, SubscriptionId};

use crate::events::{CreateEvent, DeleteEvent, Notification, UpdateEvent};

/// Source of [`CreateEvent`]s.
pub type CreateSource<T> = BroadcastSource<CreateEvent<T>>;

/// Source of [`UpdateEvent`]s.
pub type UpdateSource<T> = BroadcastSource<UpdateEvent<T>>;

/// Source of [`DeleteEvent`]s.
pub type DeleteSource<T> = BroadcastSource<DeleteEvent<T>>;

/// Source carrying all three kinds as [`Notification`]s.
pub type NotificationSource<T> = BroadcastSource<Notification<T>>;
