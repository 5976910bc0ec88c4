//! # Example: basic_fanout
//!
//! One watch stream, three independent pipelines.
//!
//! Shows how to:
//! - Build a [`BroadcastSource`] with a small per-subscription buffer.
//! - Attach closures through [`HandleFn`], each feeding its own work queue.
//! - Attach a subscriber after some events were already dispatched.
//! - Stop the source and collect [`PumpStats`] from every subscription.
//!
//! ## Flow
//! ```text
//! producer ──► mpsc::Sender<String>
//!                   └─► BroadcastSource (dispatch task)
//!                         ├─► [queue] pump ──► "index"   work queue ──► worker
//!                         ├─► [queue] pump ──► "audit"   work queue ──► worker
//!                         └─► [queue] pump ──► "late"    work queue ──► worker   (from event 4)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_fanout
//! ```

use std::{sync::Arc, time::Duration};

use chansource::{BroadcastSource, HandleFn, PumpStats, Subscription};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

type WorkQueue = mpsc::UnboundedSender<String>;

/// Attaches a pipeline that enqueues every key and a worker that prints them.
async fn pipeline(
    source: &BroadcastSource<String>,
    name: &'static str,
) -> Result<(Subscription, JoinHandle<()>), chansource::SourceError> {
    let (work, mut work_rx) = mpsc::unbounded_channel::<String>();

    let enqueue = HandleFn::arc(name, |key: &String, q: &WorkQueue| {
        let _ = q.send(key.clone());
    });
    let sub = source.activate(enqueue, Arc::new(work), []).await?;

    let worker = tokio::spawn(async move {
        while let Some(key) = work_rx.recv().await {
            println!("[{name}] reconcile {key}");
        }
        println!("[{name}] work queue closed");
    });

    Ok((sub, worker))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (events, upstream) = mpsc::channel::<String>(16);
    let stop = CancellationToken::new();

    let source = BroadcastSource::builder()
        .with_source(upstream)
        .with_stop(stop.clone())
        .with_buffer_size(4)
        .build();

    let mut pipelines = vec![
        pipeline(&source, "index").await?,
        pipeline(&source, "audit").await?,
    ];
    println!("{source} state={}", source.state().as_label());

    for n in 1..=3 {
        events.send(format!("default/pod-{n}")).await?;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Sees only what is dispatched from now on.
    pipelines.push(pipeline(&source, "late").await?);
    for n in 4..=5 {
        events.send(format!("default/pod-{n}")).await?;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    stop.cancel();
    source.stopped().await;
    println!("{source} state={}", source.state().as_label());

    for (sub, worker) in pipelines {
        let id = sub.id();
        let PumpStats { delivered, panicked } = sub.join().await?;
        worker.await?;
        println!("{id}: delivered={delivered} panicked={panicked}");
    }
    Ok(())
}
