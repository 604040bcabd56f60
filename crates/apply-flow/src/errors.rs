use applyflow_core_types::Outcome;
use browser_port::PortError;
use thiserror::Error;

/// Classified failures inside one application attempt.
///
/// All of these are recovered at the attempt boundary and mapped to an
/// [`Outcome`]; none propagate to the batch driver.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// No quick-apply entry action on the posting page. The job requires an
    /// external application, which is out of scope.
    #[error("no quick-apply entry action found")]
    EntryNotFound,

    /// The application dialog never appeared after clicking the entry
    /// action.
    #[error("application dialog did not open")]
    ModalTimeout,

    /// A dialog opened but contained no form controls, file input, or
    /// recognizable action button.
    #[error("dialog has no application form content")]
    InvalidModal,

    /// The step loop ran out of actionable buttons or hit the step cap
    /// without ever seeing a submit.
    #[error("no submit button reached")]
    NavigationStall,

    /// Some bounded wait expired mid-attempt.
    #[error("operation timed out")]
    OperationTimeout,

    /// Anything else the page layer surfaced.
    #[error("{0}")]
    Fault(String),
}

impl AttemptError {
    /// Terminal outcome for this failure class.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::EntryNotFound | Self::ModalTimeout | Self::InvalidModal => Outcome::Skipped,
            Self::NavigationStall => Outcome::error("no_submit_reached"),
            Self::OperationTimeout => Outcome::error("timeout"),
            Self::Fault(message) => Outcome::error(message),
        }
    }
}

impl From<PortError> for AttemptError {
    fn from(error: PortError) -> Self {
        if error.is_timeout() {
            Self::OperationTimeout
        } else {
            Self::Fault(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_classes_map_to_terminal_outcomes() {
        assert_eq!(AttemptError::EntryNotFound.outcome(), Outcome::Skipped);
        assert_eq!(AttemptError::ModalTimeout.outcome(), Outcome::Skipped);
        assert_eq!(AttemptError::InvalidModal.outcome(), Outcome::Skipped);
        assert_eq!(
            AttemptError::NavigationStall.outcome().as_wire(),
            "error:no_submit_reached"
        );
        assert_eq!(AttemptError::OperationTimeout.outcome().as_wire(), "error:timeout");
    }

    #[test]
    fn port_timeout_becomes_operation_timeout() {
        let error: AttemptError = PortError::Timeout(30_000).into();
        assert!(matches!(error, AttemptError::OperationTimeout));
        let error: AttemptError = PortError::protocol("session closed").into();
        assert!(matches!(error, AttemptError::Fault(_)));
    }
}
