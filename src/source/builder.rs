use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

use super::broadcast::BroadcastSource;

/// Builder for constructing a [`BroadcastSource`].
///
/// Both the upstream and the stop signal are optional here; a missing one is
/// reported by [`BroadcastSource::activate`], not by [`build`](Self::build).
pub struct BroadcastSourceBuilder<E> {
    source: Option<mpsc::Receiver<E>>,
    stop: Option<CancellationToken>,
    cfg: Config,
}

impl<E> BroadcastSourceBuilder<E>
where
    E: Send + Sync + 'static,
{
    /// Creates a builder with default configuration and nothing wired.
    pub fn new() -> Self {
        Self {
            source: None,
            stop: None,
            cfg: Config::default(),
        }
    }

    /// Sets the upstream receiver.
    pub fn with_source(mut self, source: mpsc::Receiver<E>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the stop signal.
    ///
    /// Equivalent to calling [`BroadcastSource::inject_stop`] right after build.
    pub fn with_stop(mut self, stop: CancellationToken) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the capacity of every subscription queue (`0` = default).
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.cfg.buffer_size = buffer_size;
        self
    }

    /// Builds the source. No task is spawned until the first activation.
    pub fn build(self) -> BroadcastSource<E> {
        BroadcastSource::from_parts(self.source, self.stop, &self.cfg)
    }
}

impl<E> Default for BroadcastSourceBuilder<E>
where
    E: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_buffer_size_uses_default() {
        let source: BroadcastSource<u8> =
            BroadcastSourceBuilder::new().with_buffer_size(0).build();
        assert_eq!(source.buffer_size(), crate::config::DEFAULT_BUFFER_SIZE);

        let source: BroadcastSource<u8> = BroadcastSourceBuilder::default()
            .with_config(Config { buffer_size: 8 })
            .build();
        assert_eq!(source.buffer_size(), 8);
    }
}
