//! Error types used by the broadcast source.
//!
//! [`SourceError`] covers the two configuration mistakes that can be made before
//! a handler is attached (no upstream, no stop signal) and the one failure a
//! caller can observe afterwards (a pump that did not finish cleanly).
//!
//! Backpressure is deliberately **not** an error: a full subscription queue
//! blocks the dispatch task until the pump catches up. See
//! [`BroadcastSource`](crate::BroadcastSource) for the operational consequences.

use thiserror::Error;

use crate::source::SubscriptionId;

/// # Errors produced by the broadcast source.
///
/// Configuration errors are returned synchronously from
/// [`BroadcastSource::activate`](crate::BroadcastSource::activate) and only
/// affect that attach attempt; existing subscriptions and the dispatch task keep
/// running.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No upstream receiver was supplied to the builder.
    #[error("source not specified")]
    SourceNotSpecified,

    /// No stop signal was supplied to the builder or injected before activation.
    #[error("stop not injected")]
    StopNotInjected,

    /// The pump task of a subscription was cancelled or panicked outside the
    /// handler call.
    #[error("pump for subscription {id} aborted")]
    PumpAborted {
        /// Subscription whose pump did not finish.
        id: SubscriptionId,
    },
}

impl SourceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use chansource::SourceError;
    ///
    /// assert_eq!(SourceError::StopNotInjected.as_label(), "source_stop_not_injected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SourceError::SourceNotSpecified => "source_not_specified",
            SourceError::StopNotInjected => "source_stop_not_injected",
            SourceError::PumpAborted { .. } => "source_pump_aborted",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SourceError::SourceNotSpecified => {
                "upstream receiver must be set before activation".to_string()
            }
            SourceError::StopNotInjected => {
                "stop signal must be injected before activation".to_string()
            }
            SourceError::PumpAborted { id } => format!("pump aborted: subscription={id}"),
        }
    }

    /// Indicates whether the error is a configuration mistake made before
    /// activation (as opposed to a runtime failure of a pump).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SourceError::SourceNotSpecified | SourceError::StopNotInjected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_configuration_wording() {
        assert_eq!(
            SourceError::SourceNotSpecified.to_string(),
            "source not specified"
        );
        assert_eq!(SourceError::StopNotInjected.to_string(), "stop not injected");
    }

    #[test]
    fn config_errors_are_classified() {
        assert!(SourceError::SourceNotSpecified.is_config());
        assert!(SourceError::StopNotInjected.is_config());

        let aborted = SourceError::PumpAborted {
            id: SubscriptionId::new(7),
        };
        assert!(!aborted.is_config());
        assert_eq!(aborted.as_label(), "source_pump_aborted");
        assert_eq!(aborted.to_string(), "pump for subscription sub-7 aborted");
    }
}
