// Error taxonomy for the notification subsystem.
//
// Nothing here is retried automatically; recovery is always a fresh,
// explicit user action. Role lookup failures are the one swallowed case
// (fail closed to student, see `roles`).

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AlertsError {
    /// Missing, invalid or expired credential.
    #[error("unauthorized: {0}")]
    Auth(String),

    /// A required field was absent from a request.
    #[error("bad request: {0}")]
    Validation(String),

    /// The actor declined the location permission prompt.
    #[error("location permission denied")]
    GeoDenied,

    /// No fix within the bounded wait.
    #[error("location request timed out")]
    GeoTimeout,

    /// The sensor produced no usable position.
    #[error("location unavailable")]
    GeoUnavailable,

    /// The request never completed.
    #[error("network failure: {0}")]
    Network(String),

    /// A store write failed.
    #[error("store write failed: {0}")]
    Persistence(String),

    /// Mentor record lookup failed during role derivation.
    #[error("role lookup failed: {0}")]
    RoleResolution(String),
}

impl AlertsError {
    /// Whether this failure should prompt the actor to reauthenticate
    /// rather than retry.
    pub fn needs_reauth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
