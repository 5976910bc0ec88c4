//! # Broadcast source configuration.
//!
//! Provides [`Config`], the tunables of a [`BroadcastSource`](crate::BroadcastSource).
//!
//! ## Sentinel values
//! - `buffer_size = 0` → use [`DEFAULT_BUFFER_SIZE`]

/// Default number of events buffered per subscription queue.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Configuration for a broadcast source.
///
/// ## Field semantics
/// - `buffer_size`: capacity of every subscription queue (`0` = default)
///
/// ## Sizing
/// The dispatch task offers each event to every queue in turn and waits when a
/// queue is full. One subscription whose pump falls `buffer_size` events behind
/// therefore stalls delivery to **all** subscriptions. Size the buffer for the
/// worst burst the slowest handler must absorb.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Capacity of each subscription queue.
    ///
    /// - `0` = [`DEFAULT_BUFFER_SIZE`]
    /// - `n > 0` = at most `n` undelivered events per subscription
    pub buffer_size: usize,
}

impl Config {
    /// Returns the effective queue capacity.
    ///
    /// - `buffer_size == 0` → [`DEFAULT_BUFFER_SIZE`]
    /// - otherwise → `buffer_size`
    #[inline]
    pub fn buffer_size_or_default(&self) -> usize {
        if self.buffer_size == 0 {
            DEFAULT_BUFFER_SIZE
        } else {
            self.buffer_size
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `buffer_size = 1024`
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_buffer_falls_back_to_default() {
        let cfg = Config { buffer_size: 0 };
        assert_eq!(cfg.buffer_size_or_default(), DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn explicit_buffer_is_kept() {
        let cfg = Config { buffer_size: 3 };
        assert_eq!(cfg.buffer_size_or_default(), 3);
        assert_eq!(Config::default().buffer_size, 1024);
    }
}
