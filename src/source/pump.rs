//! Per-subscription pump: drains one private queue into one handler.
//!
//! ```text
//! loop {
//!   ├─ rx.recv() ── None (closed and empty) ──► exit with PumpStats
//!   └─ Some(ev) ──► handler.on_event(&ev, &queue)
//!                    ├─ Ok    ──► delivered += 1
//!                    └─ panic ──► panicked += 1, warn!, continue
//! }
//! ```
//!
//! A panicking handler may leave its own state or the shared work queue `Q`
//! half-updated; the pump keeps calling it with the next event regardless.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::handlers::Handle;

use super::subscription::{PumpStats, SubscriptionId};

pub(super) async fn run<E, Q, H>(
    id: SubscriptionId,
    mut rx: mpsc::Receiver<Arc<E>>,
    handler: Arc<H>,
    queue: Arc<Q>,
) -> PumpStats
where
    E: Send + Sync + 'static,
    Q: Send + Sync + 'static,
    H: Handle<E, Q> + ?Sized,
{
    let mut stats = PumpStats::default();

    while let Some(ev) = rx.recv().await {
        let fut = handler.on_event(ev.as_ref(), queue.as_ref());

        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(()) => stats.delivered += 1,
            Err(panic_err) => {
                stats.panicked += 1;
                warn!(
                    subscription = %id,
                    handler = handler.name(),
                    info = %panic_info(&*panic_err),
                    "handler panicked; continuing with next event"
                );
            }
        }
    }

    debug!(
        subscription = %id,
        handler = handler.name(),
        delivered = stats.delivered,
        panicked = stats.panicked,
        "queue closed; pump exited"
    );
    stats
}

fn panic_info(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandleFn;

    #[tokio::test]
    async fn drains_remaining_events_after_close() {
        let (tx, rx) = mpsc::channel(4);
        for n in 1..=3u32 {
            tx.send(Arc::new(n)).await.unwrap();
        }
        drop(tx);

        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let handler: Arc<dyn Handle<u32, mpsc::UnboundedSender<u32>>> =
            HandleFn::arc("forward", |ev: &u32, q: &mpsc::UnboundedSender<u32>| {
                q.send(*ev).unwrap();
            });

        let stats = run(SubscriptionId::new(1), rx, handler, Arc::new(out_tx)).await;

        assert_eq!(stats, PumpStats { delivered: 3, panicked: 0 });
        let mut got = Vec::new();
        while let Ok(n) = out_rx.try_recv() {
            got.push(n);
        }
        assert_eq!(got, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn handler_panic_does_not_stop_the_pump() {
        let (tx, rx) = mpsc::channel(4);
        for n in [1u32, 13, 2] {
            tx.send(Arc::new(n)).await.unwrap();
        }
        drop(tx);

        let handler: Arc<dyn Handle<u32, ()>> = HandleFn::arc("unlucky", |ev: &u32, _: &()| {
            if *ev == 13 {
                panic!("unlucky event");
            }
        });

        let stats = run(SubscriptionId::new(2), rx, handler, Arc::new(())).await;

        assert_eq!(stats.delivered, 2);
        assert_eq!(stats.panicked, 1);
        assert_eq!(stats.received(), 3);
    }

    #[test]
    fn panic_info_reads_string_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_info(&*boxed), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_info(&*boxed), "unknown panic");
    }
}
