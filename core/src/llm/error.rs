//! Reasoning invocation errors

use std::time::Duration;
use thiserror::Error;

use crate::contract::ContractViolation;

/// Failure of a single call to the reasoning service
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Authentication/authorization rejected by the provider
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Rate limit exceeded (429)
    #[error("rate limit exceeded")]
    RateLimited { retry_after: Option<Duration> },

    /// Provider returned a non-success status
    #[error("provider error: {status} - {message}")]
    Provider { status: u16, message: String },

    /// Network/connection error
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Reply could not be read as JSON at all
    #[error("malformed output: {message}")]
    MalformedOutput { message: String },

    /// Reply was JSON but did not match the output contract
    #[error("output does not match contract {contract}: {violation}")]
    NonConforming {
        contract: String,
        #[source]
        violation: ContractViolation,
    },

    /// Endpoint settings are missing or unusable
    #[error("invalid endpoint {field}: {reason}")]
    InvalidEndpoint { field: String, reason: String },
}

impl From<reqwest::Error> for InvokeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Connection {
            message: err.to_string(),
        }
    }
}
