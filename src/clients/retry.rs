//! Per-request retry budgets.

use crate::clients::errors::{ApiError, ErrorKind, UnretryableError};
use crate::config::HubConfig;

/// Tracks the two retry budgets of one logical request.
///
/// Retryable API errors and network errors draw from separate budgets, but
/// retrying stops as soon as either budget is exhausted.
///
/// A counter is created per request and never shared between calls.
///
/// # Example
///
/// ```rust
/// use hub_api_client::clients::RetryCounter;
///
/// let counter = RetryCounter::new(1, 2);
/// assert!(counter.is_retries_available());
/// assert!(!RetryCounter::none().is_retries_available());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryCounter {
    retries_left: u32,
    connection_retries_left: u32,
}

impl RetryCounter {
    /// Creates a counter with explicit budgets.
    #[must_use]
    pub const fn new(retries: u32, connection_retries: u32) -> Self {
        Self {
            retries_left: retries,
            connection_retries_left: connection_retries,
        }
    }

    /// Creates a counter from the configured maxima.
    #[must_use]
    pub const fn from_config(config: &HubConfig) -> Self {
        Self::new(config.retries_count(), config.connection_retries_count())
    }

    /// A counter that never permits a retry.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    /// Remaining retries for retryable API errors.
    #[must_use]
    pub const fn retries_left(&self) -> u32 {
        self.retries_left
    }

    /// Remaining retries for network errors.
    #[must_use]
    pub const fn connection_retries_left(&self) -> u32 {
        self.connection_retries_left
    }

    /// Returns `true` only while both budgets are positive.
    #[must_use]
    pub const fn is_retries_available(&self) -> bool {
        self.retries_left > 0 && self.connection_retries_left > 0
    }

    /// Charges one retry against the budget matching the error's kind.
    ///
    /// # Errors
    ///
    /// Returns [`UnretryableError`] for any kind other than
    /// [`ErrorKind::Retryable`] or [`ErrorKind::Network`].
    pub fn count_retry(&mut self, error: &ApiError) -> Result<&mut Self, UnretryableError> {
        match error.kind() {
            ErrorKind::Retryable => {
                self.retries_left = self.retries_left.saturating_sub(1);
            }
            ErrorKind::Network => {
                self.connection_retries_left = self.connection_retries_left.saturating_sub(1);
            }
            kind => return Err(UnretryableError { kind }),
        }
        Ok(self)
    }
}
