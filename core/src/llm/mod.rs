//! Reasoning invocation
//!
//! The reasoning service is reached only through [`ReasoningService`]; the
//! HTTP backend ([`LlmClient`]) is one implementation, test stubs are
//! others. [`ReasoningInvoker`] wraps a service and enforces the output
//! contract on whatever comes back.

pub mod client;
mod error;

pub use client::{LlmClient, LlmConfig};
pub use error::InvokeError;

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::contract::Contract;

/// An external natural-language reasoning backend
#[async_trait::async_trait]
pub trait ReasoningService: Send + Sync {
    fn name(&self) -> &str;

    /// Submit `prompt` together with the expected output shape.
    ///
    /// Implementations should return the parsed reply; the invoker checks
    /// it against `output` afterwards.
    async fn invoke(&self, prompt: &str, output: &Contract) -> Result<Value, InvokeError>;
}

/// Calls a [`ReasoningService`] and rejects replies that break the contract
#[derive(Clone)]
pub struct ReasoningInvoker {
    service: Arc<dyn ReasoningService>,
}

impl ReasoningInvoker {
    pub fn new(service: Arc<dyn ReasoningService>) -> Self {
        Self { service }
    }

    /// Returns the reply normalized by `output`, or a failure.
    ///
    /// A reply that does not conform is a failure; it is never patched.
    pub async fn invoke(&self, prompt: &str, output: &Contract) -> Result<Value, InvokeError> {
        let started = Instant::now();
        crate::debug_log!(
            "[{}] invoking for {} ({} prompt chars)",
            self.service.name(),
            output.name(),
            prompt.len()
        );

        let reply = self.service.invoke(prompt, output).await;
        let elapsed = started.elapsed();

        let value = match reply {
            Ok(value) => value,
            Err(e) => {
                crate::error_log!(
                    "[{}] {} failed after {:?}: {}",
                    self.service.name(),
                    output.name(),
                    elapsed,
                    e
                );
                return Err(e);
            }
        };

        match output.validate(&value) {
            Ok(normalized) => {
                crate::info_log!(
                    "[{}] {} completed in {:?}",
                    self.service.name(),
                    output.name(),
                    elapsed
                );
                Ok(normalized)
            }
            Err(violation) => {
                crate::error_log!(
                    "[{}] {} reply does not conform: {}",
                    self.service.name(),
                    output.name(),
                    violation
                );
                Err(InvokeError::NonConforming {
                    contract: output.name().to_string(),
                    violation,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Operation;
    use serde_json::json;

    struct FixedReply(Value);

    #[async_trait::async_trait]
    impl ReasoningService for FixedReply {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn invoke(&self, _prompt: &str, _output: &Contract) -> Result<Value, InvokeError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_conforming_reply_is_normalized() {
        let invoker = ReasoningInvoker::new(Arc::new(FixedReply(json!({
            "questions": [{ "questionText": "1 + 1?", "options": ["1", "2"], "answer": "2" }],
            "extra": "dropped",
        }))));

        let value = invoker
            .invoke("prompt", Operation::ProcessBulkQuestions.output_contract())
            .await
            .unwrap();

        assert_eq!(value["questions"][0]["marks"], json!(10.0));
        assert!(value.get("extra").is_none());
    }

    #[tokio::test]
    async fn test_nonconforming_reply_is_a_failure() {
        let invoker = ReasoningInvoker::new(Arc::new(FixedReply(json!({ "feedback": "ok" }))));

        let err = invoker
            .invoke("prompt", Operation::EvaluateAnswer.output_contract())
            .await
            .unwrap_err();

        match err {
            InvokeError::NonConforming { contract, violation } => {
                assert_eq!(contract, "EvaluationResult");
                assert_eq!(violation.path, "$.suggestedScore");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
