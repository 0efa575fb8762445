//! Provider registry error types.

use std::time::Duration;

/// Errors from talking to the provider registry.
///
/// The registry itself never rejects input; both variants describe the
/// caller failing to reach the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The service has halted or every handle's service task is gone.
    #[error("provider registry has stopped")]
    ServiceStopped,

    /// The service did not answer within the request deadline.
    #[error("provider registry did not respond within {0:?}")]
    Timeout(Duration),
}
