use serde::ser::{Serialize, Serializer};

/// Business-rule failures surfaced to callers as a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeaveRejection {
    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    InvalidFormat,
    #[error("Invalid date. Ensure the date is valid (e.g., correct month/day).")]
    InvalidDate,
    #[error("Employee '{employee_name}' not found.")]
    EmployeeNotFound { employee_name: String },
    #[error("Cannot apply for leave on {leave_date} as it is a holiday.")]
    Holiday { leave_date: String },
    #[error("Leave has already been applied for {leave_date}.")]
    AlreadyApplied { leave_date: String },
    #[error("Insufficient leave balance: {balance} days.")]
    InsufficientBalance { balance: i64 },
    #[error("Failed to save leave application due to a system error.")]
    PersistenceFailed,
}

impl LeaveRejection {
    pub fn employee_not_found(employee_name: &str) -> Self {
        Self::EmployeeNotFound {
            employee_name: employee_name.to_string(),
        }
    }

    /// Stable snake_case tag used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::InvalidDate => "invalid_date",
            Self::EmployeeNotFound { .. } => "employee_not_found",
            Self::Holiday { .. } => "holiday",
            Self::AlreadyApplied { .. } => "already_applied",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::PersistenceFailed => "persistence_failed",
        }
    }
}

/// Result of a store operation as exposed to gateway callers.
///
/// Serializes to `{"success": true, ...payload}` or
/// `{"success": false, "message": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Success(T),
    Failure(LeaveRejection),
}

impl<T> OperationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl<T> From<Result<T, LeaveRejection>> for OperationResult<T> {
    fn from(value: Result<T, LeaveRejection>) -> Self {
        match value {
            Ok(payload) => Self::Success(payload),
            Err(rejection) => Self::Failure(rejection),
        }
    }
}

#[derive(serde::Serialize)]
struct SuccessEnvelope<'a, T> {
    success: bool,
    #[serde(flatten)]
    payload: &'a T,
}

#[derive(serde::Serialize)]
struct FailureEnvelope {
    success: bool,
    message: String,
}

impl<T: Serialize> Serialize for OperationResult<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Success(payload) => SuccessEnvelope {
                success: true,
                payload,
            }
            .serialize(serializer),
            Self::Failure(rejection) => FailureEnvelope {
                success: false,
                message: rejection.to_string(),
            }
            .serialize(serializer),
        }
    }
}
