use super::domain::ApplicationStatus;

/// Validation failures raised before any status write is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("unknown application status '{0}'")]
    InvalidStatus(String),
    #[error("a reason is required when rejecting an application")]
    MissingReason,
}

/// Validated write payload for a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub status: ApplicationStatus,
    pub rejection_reason: Option<String>,
}

/// Validate a requested status change and shape the write.
///
/// Any status may follow any other, including moving a hired candidate back to `applied`.
/// The only rule is that `rejected` carries a non-blank reason; every other target clears it.
pub fn transition_status(
    current: ApplicationStatus,
    requested: &str,
    reason: Option<&str>,
) -> Result<StatusTransition, TransitionError> {
    let status: ApplicationStatus = requested.parse()?;

    let rejection_reason = if status.requires_reason() {
        let reason = reason
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .ok_or(TransitionError::MissingReason)?;
        Some(reason.to_string())
    } else {
        None
    };

    tracing::trace!(from = %current, to = %status, "status transition validated");

    Ok(StatusTransition {
        status,
        rejection_reason,
    })
}
