//! # Event predicates and handler-side filtering.
//!
//! [`BroadcastSource::activate`](crate::BroadcastSource::activate) accepts a
//! predicate list so that it plugs into controller wiring that always passes
//! one, but the source itself never evaluates it: every subscription receives
//! every event. Filtering belongs to the handler, and [`Filtered`] is the
//! ready-made way to do it.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use chansource::{Filtered, HandleFn, PredicateRef};
//!
//! let even: PredicateRef<u32> = Arc::new(|ev: &u32| ev % 2 == 0);
//! let handler = Filtered::arc(HandleFn::new("sink", |_: &u32, _: &()| {}), vec![even]);
//! assert!(handler.accepts(&4));
//! assert!(!handler.accepts(&5));
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::handlers::Handle;

/// Decides whether an event is relevant to a handler.
pub trait Predicate<E>: Send + Sync + 'static {
    /// Returns `true` to keep the event.
    fn accept(&self, event: &E) -> bool;
}

impl<E, F> Predicate<E> for F
where
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    fn accept(&self, event: &E) -> bool {
        self(event)
    }
}

/// Shared reference to a predicate.
pub type PredicateRef<E> = Arc<dyn Predicate<E>>;

/// Handler wrapper that forwards only events accepted by every predicate.
///
/// An empty predicate list accepts everything.
pub struct Filtered<H, E> {
    inner: H,
    predicates: Vec<PredicateRef<E>>,
}

impl<H, E: 'static> Filtered<H, E> {
    /// Wraps `inner` behind `predicates`.
    pub fn new(inner: H, predicates: Vec<PredicateRef<E>>) -> Self {
        Self { inner, predicates }
    }

    /// Wraps `inner` and returns a shared handle ready for activation.
    pub fn arc(inner: H, predicates: Vec<PredicateRef<E>>) -> Arc<Self> {
        Arc::new(Self::new(inner, predicates))
    }

    /// Returns `true` when every predicate accepts `event`.
    pub fn accepts(&self, event: &E) -> bool {
        self.predicates.iter().all(|p| p.accept(event))
    }
}

#[async_trait]
impl<H, E, Q> Handle<E, Q> for Filtered<H, E>
where
    H: Handle<E, Q>,
    E: Send + Sync + 'static,
    Q: Send + Sync + 'static,
{
    async fn on_event(&self, event: &E, queue: &Q) {
        if self.accepts(event) {
            self.inner.on_event(event, queue).await;
        }
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandleFn;
    use std::sync::Mutex;

    #[tokio::test]
    async fn only_accepted_events_reach_inner_handler() {
        let positive: PredicateRef<i32> = Arc::new(|ev: &i32| *ev > 0);
        let small: PredicateRef<i32> = Arc::new(|ev: &i32| *ev < 10);
        let handler = Filtered::new(
            HandleFn::new("collect", |ev: &i32, out: &Mutex<Vec<i32>>| {
                out.lock().unwrap().push(*ev)
            }),
            vec![positive, small],
        );

        let out = Mutex::new(Vec::new());
        for ev in [-1, 3, 12, 9] {
            handler.on_event(&ev, &out).await;
        }

        assert_eq!(*out.lock().unwrap(), vec![3, 9]);
        assert_eq!(Handle::<i32, Mutex<Vec<i32>>>::name(&handler), "collect");
    }

    #[test]
    fn accepts_borrows_owned_payloads() {
        let named: PredicateRef<String> = Arc::new(|ev: &String| ev.starts_with("ns/"));
        let handler: Filtered<(), String> = Filtered::new((), vec![named]);

        assert!(handler.accepts(&"ns/pod-a".to_string()));
        assert!(!handler.accepts(&"pod-b".to_string()));
    }

    #[test]
    fn empty_list_accepts_everything() {
        let handler: Filtered<(), u8> = Filtered::new((), Vec::new());
        assert!(handler.accepts(&0));
    }
}
