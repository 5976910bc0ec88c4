//! # Resource change payloads.
//!
//! The broadcast source is generic over its event type; these are the payloads
//! a resource watch typically produces. Each kind can be broadcast on its own
//! source ([`CreateSource`](crate::CreateSource), [`UpdateSource`](crate::UpdateSource),
//! [`DeleteSource`](crate::DeleteSource)) or multiplexed on a single source as a
//! [`Notification`].
//!
//! ## Example
//! ```rust
//! use chansource::{EventKind, Notification};
//!
//! let ev = Notification::updated("v1", "v2");
//! assert_eq!(ev.kind(), EventKind::Update);
//! assert_eq!(*ev.object(), "v2");
//! assert_eq!(ev.old_object(), Some(&"v1"));
//! ```

/// Classification of resource changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Object appeared.
    Create,
    /// Object changed; both versions are available.
    Update,
    /// Object went away.
    Delete,
}

impl EventKind {
    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Create => "create",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
        }
    }
}

/// An object was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEvent<T> {
    /// The new object.
    pub object: T,
}

/// An object was updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent<T> {
    /// The object before the change.
    pub old: T,
    /// The object after the change.
    pub new: T,
}

/// An object was deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteEvent<T> {
    /// The last known state of the object.
    pub object: T,
}

/// Any of the three resource changes, for sources that carry all kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T> {
    /// See [`CreateEvent`].
    Create(CreateEvent<T>),
    /// See [`UpdateEvent`].
    Update(UpdateEvent<T>),
    /// See [`DeleteEvent`].
    Delete(DeleteEvent<T>),
}

impl<T> Notification<T> {
    /// Creation of `object`.
    pub fn created(object: T) -> Self {
        Notification::Create(CreateEvent { object })
    }

    /// Update from `old` to `new`.
    pub fn updated(old: T, new: T) -> Self {
        Notification::Update(UpdateEvent { old, new })
    }

    /// Deletion of `object`.
    pub fn deleted(object: T) -> Self {
        Notification::Delete(DeleteEvent { object })
    }

    /// Returns the change kind.
    pub fn kind(&self) -> EventKind {
        match self {
            Notification::Create(_) => EventKind::Create,
            Notification::Update(_) => EventKind::Update,
            Notification::Delete(_) => EventKind::Delete,
        }
    }

    /// Returns the current object: the created one, the new version of an
    /// update, or the last state of a deleted one.
    pub fn object(&self) -> &T {
        match self {
            Notification::Create(ev) => &ev.object,
            Notification::Update(ev) => &ev.new,
            Notification::Delete(ev) => &ev.object,
        }
    }

    /// Returns the previous version for updates, `None` otherwise.
    pub fn old_object(&self) -> Option<&T> {
        match self {
            Notification::Update(ev) => Some(&ev.old),
            _ => None,
        }
    }
}

impl<T> From<CreateEvent<T>> for Notification<T> {
    fn from(ev: CreateEvent<T>) -> Self {
        Notification::Create(ev)
    }
}

impl<T> From<UpdateEvent<T>> for Notification<T> {
    fn from(ev: UpdateEvent<T>) -> Self {
        Notification::Update(ev)
    }
}

impl<T> From<DeleteEvent<T>> for Notification<T> {
    fn from(ev: DeleteEvent<T>) -> Self {
        Notification::Delete(ev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_reports_last_state_without_previous_version() {
        let ev = Notification::deleted("pod-a");
        assert_eq!(ev.kind(), EventKind::Delete);
        assert_eq!(*ev.object(), "pod-a");
        assert_eq!(ev.old_object(), None);
        assert_eq!(ev.kind().as_label(), "delete");
    }

    #[test]
    fn typed_events_convert_into_notifications() {
        let ev: Notification<u32> = CreateEvent { object: 1 }.into();
        assert_eq!(ev, Notification::created(1));

        let ev: Notification<u32> = UpdateEvent { old: 1, new: 2 }.into();
        assert_eq!(ev.kind(), EventKind::Update);
        assert_eq!(ev.old_object(), Some(&1));
    }
}
