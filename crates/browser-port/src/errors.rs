use thiserror::Error;

/// Failures surfaced by a [`crate::PagePort`] implementation.
///
/// Every port operation carries a bounded wait; expiry is reported as
/// `Timeout` so the attempt boundary can classify it separately from
/// protocol-level faults.
#[derive(Debug, Error)]
pub enum PortError {
    /// A bounded wait expired before the operation completed.
    #[error("operation timed out after {0}ms")]
    Timeout(u64),

    /// The underlying browser transport rejected or failed the operation.
    #[error("browser protocol error: {0}")]
    Protocol(String),

    /// A control handle from an earlier snapshot no longer resolves.
    #[error("control handle {0} is no longer attached")]
    StaleControl(u32),
}

impl PortError {
    pub fn protocol(message: impl std::fmt::Display) -> Self {
        Self::Protocol(message.to_string())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
