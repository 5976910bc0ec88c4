//! # Per-kind resource handlers.
//!
//! Controller code usually reacts differently to creation, update and deletion
//! of the same resource. [`ResourceHandler`] expresses that as three callbacks,
//! and [`KindRouter`] adapts one implementation to every payload the crate
//! defines, so the same handler can be attached to a [`CreateSource`],
//! an [`UpdateSource`], a [`DeleteSource`] or a [`NotificationSource`].
//!
//! ```text
//! CreateSource<T>       ──► KindRouter ──► on_create
//! UpdateSource<T>       ──► KindRouter ──► on_update
//! DeleteSource<T>       ──► KindRouter ──► on_delete
//! NotificationSource<T> ──► KindRouter ──┬► on_create
//!                                        ├► on_update
//!                                        └► on_delete
//! ```
//!
//! [`CreateSource`]: crate::CreateSource
//! [`UpdateSource`]: crate::UpdateSource
//! [`DeleteSource`]: crate::DeleteSource
//! [`NotificationSource`]: crate::NotificationSource

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::{CreateEvent, DeleteEvent, Notification, UpdateEvent};
use crate::handlers::Handle;

/// Callbacks for the three resource change kinds.
///
/// Every callback defaults to a no-op; implement only the kinds you care about.
#[async_trait]
pub trait ResourceHandler<T, Q>: Send + Sync + 'static
where
    T: Send + Sync + 'static,
    Q: Send + Sync + 'static,
{
    /// Called for every [`CreateEvent`].
    async fn on_create(&self, _event: &CreateEvent<T>, _queue: &Q) {}

    /// Called for every [`UpdateEvent`].
    async fn on_update(&self, _event: &UpdateEvent<T>, _queue: &Q) {}

    /// Called for every [`DeleteEvent`].
    async fn on_delete(&self, _event: &DeleteEvent<T>, _queue: &Q) {}

    /// Returns the handler name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Adapts a [`ResourceHandler`] to [`Handle`] for every resource payload.
#[derive(Debug)]
pub struct KindRouter<H> {
    inner: H,
}

impl<H> KindRouter<H> {
    /// Wraps `inner`.
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    /// Wraps `inner` and returns a shared handle ready for activation.
    pub fn arc(inner: H) -> Arc<Self> {
        Arc::new(Self::new(inner))
    }

    /// Returns the wrapped handler.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<T, Q, H> Handle<CreateEvent<T>, Q> for KindRouter<H>
where
    T: Send + Sync + 'static,
    Q: Send + Sync + 'static,
    H: ResourceHandler<T, Q>,
{
    async fn on_event(&self, event: &CreateEvent<T>, queue: &Q) {
        self.inner.on_create(event, queue).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[async_trait]
impl<T, Q, H> Handle<UpdateEvent<T>, Q> for KindRouter<H>
where
    T: Send + Sync + 'static,
    Q: Send + Sync + 'static,
    H: ResourceHandler<T, Q>,
{
    async fn on_event(&self, event: &UpdateEvent<T>, queue: &Q) {
        self.inner.on_update(event, queue).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[async_trait]
impl<T, Q, H> Handle<DeleteEvent<T>, Q> for KindRouter<H>
where
    T: Send + Sync + 'static,
    Q: Send + Sync + 'static,
    H: ResourceHandler<T, Q>,
{
    async fn on_event(&self, event: &DeleteEvent<T>, queue: &Q) {
        self.inner.on_delete(event, queue).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[async_trait]
impl<T, Q, H> Handle<Notification<T>, Q> for KindRouter<H>
where
    T: Send + Sync + 'static,
    Q: Send + Sync + 'static,
    H: ResourceHandler<T, Q>,
{
    async fn on_event(&self, event: &Notification<T>, queue: &Q) {
        match event {
            Notification::Create(ev) => self.inner.on_create(ev, queue).await,
            Notification::Update(ev) => self.inner.on_update(ev, queue).await,
            Notification::Delete(ev) => self.inner.on_delete(ev, queue).await,
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Journal {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ResourceHandler<&'static str, ()> for Journal {
        async fn on_create(&self, ev: &CreateEvent<&'static str>, _queue: &()) {
            self.seen.lock().unwrap().push(format!("create {}", ev.object));
        }

        async fn on_update(&self, ev: &UpdateEvent<&'static str>, _queue: &()) {
            self.seen
                .lock()
                .unwrap()
                .push(format!("update {}->{}", ev.old, ev.new));
        }

        fn name(&self) -> &'static str {
            "journal"
        }
    }

    #[tokio::test]
    async fn notifications_are_routed_by_kind() {
        let router = KindRouter::new(Journal::default());

        Handle::<Notification<&'static str>, ()>::on_event(
            &router,
            &Notification::created("a"),
            &(),
        )
        .await;
        Handle::<Notification<&'static str>, ()>::on_event(
            &router,
            &Notification::updated("a", "b"),
            &(),
        )
        .await;
        // on_delete keeps its no-op default.
        Handle::<Notification<&'static str>, ()>::on_event(
            &router,
            &Notification::deleted("b"),
            &(),
        )
        .await;

        let seen = router.inner().seen.lock().unwrap().clone();
        assert_eq!(seen, vec!["create a".to_string(), "update a->b".to_string()]);
    }

    #[tokio::test]
    async fn typed_payloads_reach_matching_callback() {
        let router = KindRouter::new(Journal::default());

        Handle::<CreateEvent<&'static str>, ()>::on_event(
            &router,
            &CreateEvent { object: "x" },
            &(),
        )
        .await;

        assert_eq!(
            Handle::<CreateEvent<&'static str>, ()>::name(&router),
            "journal"
        );
        assert_eq!(router.inner().seen.lock().unwrap().len(), 1);
    }
}
