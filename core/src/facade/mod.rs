//! Orchestration facade
//!
//! The only surface external callers use. Each operation validates the raw
//! caller value against its input contract, binds the operation's prompt,
//! invokes the reasoning service, post-processes the typed result and wraps
//! everything in an [`Envelope`]. Nothing is retained between calls.

mod envelope;

pub use envelope::Envelope;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::ExaminerConfig;
use crate::contract::{
    AnalysisReport, EvaluationRequest, EvaluationResult, MottoResult, Operation,
    ProctoringLogEntry, QuestionBatch,
};
use crate::error::{ExaminerError, Result};
use crate::llm::{LlmClient, ReasoningInvoker, ReasoningService};
use crate::postprocess::PostProcess;
use crate::prompt::{template_for, PromptBinder};

#[derive(Clone)]
pub struct Examiner {
    invoker: ReasoningInvoker,
}

impl Examiner {
    pub fn new(service: Arc<dyn ReasoningService>) -> Self {
        Self {
            invoker: ReasoningInvoker::new(service),
        }
    }

    /// Build an examiner backed by the configured HTTP endpoint
    pub fn from_config(config: &ExaminerConfig) -> Result<Self> {
        let client = LlmClient::from_endpoint(&config.endpoint)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Look for suspicious behaviour in a sequence of proctoring log entries.
    ///
    /// Entries without an `id` get their position in the sequence as id.
    pub async fn analyze_proctoring_logs(&self, entries: Value) -> Envelope<AnalysisReport> {
        let operation = Operation::AnalyzeProctoringLogs;
        let entries = assign_positional_ids(entries);

        let (validated, logs) = match accept::<Vec<ProctoringLogEntry>>(operation, &entries) {
            Ok(accepted) => accepted,
            Err(e) => return reject(operation, e),
        };

        let outcome = self
            .execute::<AnalysisReport>(operation, &json!({ "logs": validated }))
            .await
            .map(|report| report.post_process(logs.as_slice()));

        settle(operation, outcome)
    }

    /// Grade a candidate's answer; the suggested score never exceeds the marks
    pub async fn evaluate_answer(&self, request: Value) -> Envelope<EvaluationResult> {
        let operation = Operation::EvaluateAnswer;

        let (validated, request) = match accept::<EvaluationRequest>(operation, &request) {
            Ok(accepted) => accepted,
            Err(e) => return reject(operation, e),
        };

        let outcome = self
            .execute::<EvaluationResult>(operation, &validated)
            .await
            .map(|result| result.post_process(&request));

        settle(operation, outcome)
    }

    /// Extract multiple-choice questions from raw text.
    ///
    /// Text without recognizable questions yields an empty batch.
    pub async fn parse_mcq_questions(&self, raw_text: Value) -> Envelope<QuestionBatch> {
        let operation = Operation::ProcessBulkQuestions;

        let (validated, raw_text) = match accept::<String>(operation, &raw_text) {
            Ok(accepted) => accepted,
            Err(e) => return reject(operation, e),
        };

        let outcome = self
            .execute::<QuestionBatch>(operation, &json!({ "rawText": validated }))
            .await
            .and_then(|batch| {
                batch.check()?;
                Ok(batch)
            })
            .map(|batch| batch.post_process(raw_text.as_str()));

        settle(operation, outcome)
    }

    pub async fn generate_company_motto(&self, company_name: Value) -> Envelope<String> {
        let operation = Operation::GenerateCompanyMotto;

        let (validated, company_name) = match accept::<String>(operation, &company_name) {
            Ok(accepted) => accepted,
            Err(e) => return reject(operation, e),
        };

        let outcome = self
            .execute::<MottoResult>(operation, &json!({ "companyName": validated }))
            .await
            .map(|result| result.post_process(company_name.as_str()).motto);

        settle(operation, outcome)
    }

    async fn execute<Out: DeserializeOwned>(
        &self,
        operation: Operation,
        request: &Value,
    ) -> Result<Out> {
        let prompt = PromptBinder::bind(template_for(operation), request)?;
        let value = self
            .invoker
            .invoke(&prompt, operation.output_contract())
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Validate `raw` against the operation's input contract and build the typed
/// request. Returns the normalized value alongside the typed one.
fn accept<T: DeserializeOwned>(operation: Operation, raw: &Value) -> Result<(Value, T)> {
    let validated = operation.input_contract().validate(raw)?;
    let typed = serde_json::from_value(validated.clone())?;
    Ok((validated, typed))
}

fn reject<T>(operation: Operation, err: ExaminerError) -> Envelope<T> {
    crate::warn_log!("[{}] rejected input: {}", operation, err);
    Envelope::error(operation.validation_message())
}

fn settle<T>(operation: Operation, outcome: Result<T>) -> Envelope<T> {
    match outcome {
        Ok(data) => Envelope::Data(data),
        Err(e) => {
            crate::error_log!("[{}] {}", operation, e);
            Envelope::error(operation.failure_message())
        }
    }
}

fn assign_positional_ids(entries: Value) -> Value {
    match entries {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, mut entry)| {
                    if let Some(map) = entry.as_object_mut() {
                        let has_id = map.get("id").is_some_and(|id| !id.is_null());
                        if !has_id {
                            map.insert("id".to_string(), Value::String(index.to_string()));
                        }
                    }
                    entry
                })
                .collect(),
        ),
        other => other,
    }
}
