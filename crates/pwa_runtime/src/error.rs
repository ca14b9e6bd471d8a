//! Install outcomes and coordinator errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an install attempt did not install the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InstallRejection {
    #[error("not running in a browser")]
    NotBrowser,
    #[error("app is already installed")]
    AlreadyInstalled,
    #[error("installation is only offered on mobile devices")]
    NotMobile,
    #[error("no install prompt has been offered by the browser")]
    NoPrompt,
    #[error("user dismissed the install prompt")]
    UserDismissed,
    #[error("install prompt failed")]
    Error,
}

impl InstallRejection {
    /// Returns the stable reason code reported to the UI.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotBrowser => "NOT_BROWSER",
            Self::AlreadyInstalled => "ALREADY_INSTALLED",
            Self::NotMobile => "NOT_MOBILE",
            Self::NoPrompt => "NO_PROMPT",
            Self::UserDismissed => "USER_DISMISSED",
            Self::Error => "ERROR",
        }
    }
}

/// Serializable `{success, reason?}` rendering of an install attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<Result<(), InstallRejection>> for InstallOutcome {
    fn from(result: Result<(), InstallRejection>) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                reason: None,
            },
            Err(rejection) => Self {
                success: false,
                reason: Some(rejection.code().to_string()),
            },
        }
    }
}

/// Errors from the coordinator's debug surface and persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PwaError {
    #[error("`{operation}` is only available in development mode")]
    DevelopmentOnly { operation: &'static str },
    #[error("storage operation on `{key}` failed: {message}")]
    Storage { key: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn outcome_serializes_reason_only_on_failure() {
        let ok = InstallOutcome::from(Ok(()));
        assert_eq!(
            serde_json::to_string(&ok).expect("serialize"),
            r#"{"success":true}"#
        );

        let rejected = InstallOutcome::from(Err(InstallRejection::UserDismissed));
        assert_eq!(
            serde_json::to_string(&rejected).expect("serialize"),
            r#"{"success":false,"reason":"USER_DISMISSED"}"#
        );
    }

    #[test]
    fn development_only_error_names_the_operation() {
        let err = PwaError::DevelopmentOnly {
            operation: "simulate_installation",
        };
        assert_eq!(
            err.to_string(),
            "`simulate_installation` is only available in development mode"
        );
    }
}
