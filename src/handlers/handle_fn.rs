//! # Closure-backed handler (`HandleFn`)
//!
//! [`HandleFn`] wraps a synchronous closure `F: Fn(&E, &Q)`. It fits handlers
//! whose whole job is to turn an event into a work item and push it onto the
//! queue, which is the common case for controller wiring.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use chansource::{Handle, HandleFn};
//! use tokio::sync::mpsc;
//!
//! let h = HandleFn::arc("enqueue", |ev: &u32, q: &mpsc::UnboundedSender<u32>| {
//!     let _ = q.send(*ev);
//! });
//! let h: Arc<dyn Handle<u32, mpsc::UnboundedSender<u32>>> = h;
//! assert_eq!(h.name(), "enqueue");
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::handlers::Handle;

/// Function-backed handler implementation.
#[derive(Debug)]
pub struct HandleFn<F> {
    name: &'static str,
    f: F,
}

impl<F> HandleFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandleFn::arc`] when you immediately attach it to a source.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<E, Q, F> Handle<E, Q> for HandleFn<F>
where
    E: Send + Sync + 'static,
    Q: Send + Sync + 'static,
    F: Fn(&E, &Q) + Send + Sync + 'static,
{
    async fn on_event(&self, event: &E, queue: &Q) {
        (self.f)(event, queue)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn closure_runs_with_event_and_queue() {
        let h = HandleFn::new("push", |ev: &&str, out: &Mutex<Vec<String>>| {
            out.lock().unwrap().push(ev.to_uppercase())
        });
        let out = Mutex::new(Vec::new());

        h.on_event(&"a", &out).await;
        h.on_event(&"b", &out).await;

        assert_eq!(*out.lock().unwrap(), vec!["A", "B"]);
        assert_eq!(Handle::<&str, Mutex<Vec<String>>>::name(&h), "push");
    }
}
