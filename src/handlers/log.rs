//! # LogHandler: trace every delivered event
//!
//! A minimal handler that records each event it receives through `tracing`.
//! Use it for demos, or attach it next to real handlers while debugging a
//! stalled subscription.
//!
//! ## Example output
//! ```text
//! INFO chansource::handlers::log: event delivered handler="LogHandler" event=Create(CreateEvent { object: "pod-a" })
//! ```

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::info;

use crate::handlers::Handle;

/// Event tracing handler.
#[derive(Default, Debug)]
pub struct LogHandler;

impl LogHandler {
    /// Construct a new [`LogHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<E, Q> Handle<E, Q> for LogHandler
where
    E: Debug + Send + Sync + 'static,
    Q: Send + Sync + 'static,
{
    async fn on_event(&self, event: &E, _queue: &Q) {
        info!(handler = "LogHandler", event = ?event, "event delivered");
    }

    fn name(&self) -> &'static str {
        "LogHandler"
    }
}
