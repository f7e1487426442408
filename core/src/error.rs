//! Structured error types for Examiner
//!
//! Every stage of the pipeline has its own error; [`ExaminerError`] gathers
//! them so the facade can log one cause per failed call.

use thiserror::Error;

use crate::config::ConfigError;
use crate::contract::ContractViolation;
use crate::llm::InvokeError;
use crate::prompt::BindError;

/// Primary error type for Examiner operations
#[derive(Error, Debug)]
pub enum ExaminerError {
    /// A value did not match its contract
    #[error("contract violation at {0}")]
    Contract(#[from] ContractViolation),

    #[error("prompt binding failed: {0}")]
    Bind(#[from] BindError),

    #[error("reasoning service failed: {0}")]
    Invoke(#[from] InvokeError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(String),
}

impl ExaminerError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Invoke(InvokeError::Unauthorized { .. }) => {
                "Authentication failed. Please check your API key.".to_string()
            }
            Self::Invoke(InvokeError::RateLimited {
                retry_after: Some(delay),
            }) => format!(
                "The reasoning service is rate limiting requests. Please try again in {} seconds.",
                delay.as_secs()
            ),
            Self::Invoke(InvokeError::RateLimited { retry_after: None }) => {
                "The reasoning service is rate limiting requests. Please try again later."
                    .to_string()
            }
            Self::Invoke(InvokeError::InvalidEndpoint { field, reason }) => {
                format!("The configured endpoint is unusable: {} {}.", field, reason)
            }
            Self::Config(_) => "The configuration file could not be read.".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExaminerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias using ExaminerError
pub type Result<T> = std::result::Result<T, ExaminerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_user_messages() {
        let err = ExaminerError::Invoke(InvokeError::Unauthorized {
            message: "bad token".to_string(),
        });
        assert!(err.user_message().contains("API key"));

        let err = ExaminerError::Invoke(InvokeError::RateLimited {
            retry_after: Some(Duration::from_secs(30)),
        });
        assert!(err.user_message().contains("in 30 seconds"));

        let err = ExaminerError::Invoke(InvokeError::InvalidEndpoint {
            field: "base_url".to_string(),
            reason: "required for the custom provider".to_string(),
        });
        assert_eq!(
            err.user_message(),
            "The configured endpoint is unusable: base_url required for the custom provider."
        );

        let err = ExaminerError::from(ContractViolation::new("$.status", "expected one of: a, b"));
        assert_eq!(err.user_message(), "contract violation at $.status: expected one of: a, b");
    }

    #[test]
    fn test_config_errors_convert() {
        let err: ExaminerError = ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ))
        .into();
        assert!(matches!(err, ExaminerError::Config(_)));
        assert_eq!(err.user_message(), "The configuration file could not be read.");
    }

    #[test]
    fn test_json_conversion() {
        let err: ExaminerError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, ExaminerError::Json(_)));
    }
}
