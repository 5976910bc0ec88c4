//! The single dispatch task of a broadcast source.
//!
//! ```text
//! loop {
//!   select (biased) {
//!     stop.cancelled()  ──► break
//!     upstream.recv()   ──► Some(ev) ──► distribute(ev)   (lock held for the whole pass)
//!                       └─► None     ──► stop polling upstream, keep waiting for stop
//!   }
//! }
//! close_all()   (lock held; every sender dropped exactly once)
//! ```
//!
//! Stop is only observed between passes. An event taken from upstream is
//! offered to every registered queue before the queues can be closed, so a
//! stalled pump holds back shutdown until it makes room.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::broadcast::{Shared, SourceState};

pub(super) async fn run<E>(
    shared: Arc<Shared<E>>,
    mut upstream: mpsc::Receiver<E>,
    stop: CancellationToken,
) where
    E: Send + Sync + 'static,
{
    let mut upstream_open = true;

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            next = upstream.recv(), if upstream_open => match next {
                Some(ev) => distribute(&shared, ev).await,
                None => {
                    upstream_open = false;
                    debug!(
                        source = ?Arc::as_ptr(&shared),
                        "upstream closed; subscriptions stay open until stop"
                    );
                }
            },
        }
    }

    close_all(&shared).await;
}

/// Offers `event` to every registered queue, one after another.
async fn distribute<E>(shared: &Shared<E>, event: E)
where
    E: Send + Sync + 'static,
{
    let event = Arc::new(event);
    let outlets = shared.outlets.lock().await;

    // Sequential under the lock: close_all cannot run while any send is pending.
    for outlet in &outlets.queues {
        if outlet.tx.send(Arc::clone(&event)).await.is_err() {
            warn!(
                subscription = %outlet.id,
                "pump gone; event dropped for this subscription"
            );
        }
    }
}

/// Closes every registered queue and marks the source stopped.
async fn close_all<E>(shared: &Shared<E>) {
    let mut outlets = shared.outlets.lock().await;
    outlets.stopped = true;

    let closed = std::mem::take(&mut outlets.queues);
    let n = closed.len();
    drop(closed);

    shared.set_live(0);
    shared.set_state(SourceState::Stopped);
    drop(outlets);

    info!(
        source = ?(shared as *const Shared<E>),
        closed = n,
        "stop received; subscription queues closed"
    );
    shared.done.cancel();
}
