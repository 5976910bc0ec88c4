//! # Example: resource_kinds
//!
//! Routes create/update/delete notifications of a watched resource to
//! per-kind callbacks, next to a [`LogHandler`] tracing the raw stream.
//!
//! Shows how to:
//! - Implement [`ResourceHandler`] and attach it through [`KindRouter`].
//! - Drop uninteresting events handler-side with [`Filtered`].
//! - Initialise `tracing` so the source's own lifecycle logs are visible.
//!
//! ## Flow
//! ```text
//! informer ──► Notification<Pod> ──► NotificationSource
//!                                      ├─► LogHandler                 (every event)
//!                                      └─► Filtered(KindRouter(Reconciler))
//!                                             ├─► on_create ──► work queue
//!                                             ├─► on_update ──► work queue
//!                                             └─► on_delete ──► work queue
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogHandler`].
//! ```bash
//! RUST_LOG=debug cargo run --example resource_kinds --features logging
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chansource::{
    CreateEvent, DeleteEvent, Filtered, KindRouter, LogHandler, Notification, NotificationSource,
    PredicateRef, ResourceHandler, UpdateEvent,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Pod {
    namespace: &'static str,
    name: &'static str,
    generation: u64,
}

impl Pod {
    fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

type WorkQueue = mpsc::UnboundedSender<String>;

/// Enqueues the key of every changed pod.
struct Reconciler;

#[async_trait]
impl ResourceHandler<Pod, WorkQueue> for Reconciler {
    async fn on_create(&self, ev: &CreateEvent<Pod>, q: &WorkQueue) {
        let _ = q.send(format!("create {}", ev.object.key()));
    }

    async fn on_update(&self, ev: &UpdateEvent<Pod>, q: &WorkQueue) {
        // Status-only updates keep the generation.
        if ev.old.generation != ev.new.generation {
            let _ = q.send(format!("update {}", ev.new.key()));
        }
    }

    async fn on_delete(&self, ev: &DeleteEvent<Pod>, q: &WorkQueue) {
        let _ = q.send(format!("delete {}", ev.object.key()));
    }

    fn name(&self) -> &'static str {
        "reconciler"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let (events, upstream) = mpsc::channel::<Notification<Pod>>(32);
    let stop = CancellationToken::new();
    let source: NotificationSource<Pod> = NotificationSource::new(upstream, stop.clone());

    let (log_queue, _) = mpsc::unbounded_channel::<String>();
    let tracer = source
        .activate(Arc::new(LogHandler::new()), Arc::new(log_queue), [])
        .await?;

    let (work, mut work_rx) = mpsc::unbounded_channel::<String>();
    let skip_system: PredicateRef<Notification<Pod>> =
        Arc::new(|ev: &Notification<Pod>| ev.object().namespace != "kube-system");
    let reconciler = source
        .activate(
            Filtered::arc(KindRouter::new(Reconciler), vec![skip_system]),
            Arc::new(work),
            [],
        )
        .await?;

    let worker = tokio::spawn(async move {
        while let Some(item) = work_rx.recv().await {
            println!("[worker] {item}");
        }
    });

    let web = Pod {
        namespace: "default",
        name: "web-0",
        generation: 1,
    };
    let dns = Pod {
        namespace: "kube-system",
        name: "coredns-0",
        generation: 1,
    };
    let web_v2 = Pod {
        generation: 2,
        ..web.clone()
    };

    events.send(Notification::created(web.clone())).await?;
    events.send(Notification::created(dns)).await?;
    events
        .send(Notification::updated(web.clone(), web.clone()))
        .await?;
    events
        .send(Notification::updated(web, web_v2.clone()))
        .await?;
    events.send(Notification::deleted(web_v2)).await?;

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    stop.cancel();

    println!("tracer:     {:?}", tracer.join().await?);
    println!("reconciler: {:?}", reconciler.join().await?);
    worker.await?;
    Ok(())
}
