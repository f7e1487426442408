//! Contract registry
//!
//! One input and one output contract per operation. Both the facade
//! (pre-call validation) and the reasoning invoker (post-call shape check)
//! read from here.

use lazy_static::lazy_static;
use serde_json::json;

use super::shape::{Contract, Field};
use super::types::{LogStatus, QuestionType, DEFAULT_QUESTION_MARKS};

/// The operations the facade exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AnalyzeProctoringLogs,
    EvaluateAnswer,
    ProcessBulkQuestions,
    GenerateCompanyMotto,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::AnalyzeProctoringLogs,
        Operation::EvaluateAnswer,
        Operation::ProcessBulkQuestions,
        Operation::GenerateCompanyMotto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::AnalyzeProctoringLogs => "analyze-proctoring-logs",
            Operation::EvaluateAnswer => "evaluate-answer",
            Operation::ProcessBulkQuestions => "process-bulk-questions",
            Operation::GenerateCompanyMotto => "generate-company-motto",
        }
    }

    pub fn input_contract(&self) -> &'static Contract {
        match self {
            Operation::AnalyzeProctoringLogs => &PROCTORING_LOGS_INPUT,
            Operation::EvaluateAnswer => &EVALUATION_REQUEST_INPUT,
            Operation::ProcessBulkQuestions => &BULK_QUESTIONS_INPUT,
            Operation::GenerateCompanyMotto => &MOTTO_INPUT,
        }
    }

    pub fn output_contract(&self) -> &'static Contract {
        match self {
            Operation::AnalyzeProctoringLogs => &ANALYSIS_REPORT_OUTPUT,
            Operation::EvaluateAnswer => &EVALUATION_RESULT_OUTPUT,
            Operation::ProcessBulkQuestions => &QUESTION_BATCH_OUTPUT,
            Operation::GenerateCompanyMotto => &MOTTO_OUTPUT,
        }
    }

    /// Error returned to callers whose input fails the input contract
    pub fn validation_message(&self) -> &'static str {
        match self {
            Operation::AnalyzeProctoringLogs => "Invalid log format.",
            Operation::EvaluateAnswer => "Invalid input format.",
            Operation::ProcessBulkQuestions => "Invalid input format. Expected a raw string.",
            Operation::GenerateCompanyMotto => "Invalid input format.",
        }
    }

    /// Error returned to callers when the reasoning call fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::AnalyzeProctoringLogs => "Failed to analyze proctoring logs.",
            Operation::EvaluateAnswer => "Failed to evaluate answer.",
            Operation::ProcessBulkQuestions => "Failed to process bulk questions.",
            Operation::GenerateCompanyMotto => "Failed to generate company motto.",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "analyze-proctoring-logs" | "analyze-logs" | "logs" => Ok(Operation::AnalyzeProctoringLogs),
            "evaluate-answer" | "evaluate" => Ok(Operation::EvaluateAnswer),
            "process-bulk-questions" | "parse-questions" | "questions" => {
                Ok(Operation::ProcessBulkQuestions)
            }
            "generate-company-motto" | "motto" => Ok(Operation::GenerateCompanyMotto),
            _ => Err(format!("Unknown operation: {}", s)),
        }
    }
}

lazy_static! {
    static ref PROCTORING_LOGS_INPUT: Contract = Contract::new(
        "ProctoringLogs",
        Field::list(
            "logs",
            Field::object(
                "entry",
                vec![
                    Field::text("id"),
                    Field::text("candidateId"),
                    Field::text("testId"),
                    Field::text("timestamp"),
                    Field::one_of("status", LogStatus::VALUES),
                ],
            ),
        ),
    );

    static ref ANALYSIS_REPORT_OUTPUT: Contract = Contract::new(
        "AnalysisReport",
        Field::object(
            "report",
            vec![
                Field::text("summary").describe("Overall summary of the proctoring session"),
                Field::list(
                    "suspiciousActivities",
                    Field::object(
                        "finding",
                        vec![
                            Field::text("candidateId"),
                            Field::text("testId"),
                            Field::text("reason")
                                .describe("Why this activity is considered suspicious"),
                            Field::list("timestamps", Field::text("timestamp"))
                                .describe("Timestamps of the log entries involved"),
                        ],
                    ),
                ),
            ],
        ),
    );

    static ref EVALUATION_REQUEST_INPUT: Contract = Contract::new(
        "EvaluationRequest",
        Field::object(
            "request",
            vec![
                Field::text("questionText"),
                Field::one_of("questionType", QuestionType::VALUES),
                Field::text("answer"),
                Field::number("marks").minimum(0.0),
            ],
        ),
    );

    static ref EVALUATION_RESULT_OUTPUT: Contract = Contract::new(
        "EvaluationResult",
        Field::object(
            "result",
            vec![
                Field::text("feedback").describe("Feedback on the candidate's answer"),
                Field::number("suggestedScore")
                    .describe("Suggested score, never more than the question's marks"),
            ],
        ),
    );

    static ref BULK_QUESTIONS_INPUT: Contract = Contract::new(
        "BulkQuestionsText",
        Field::text("rawText").non_empty(),
    );

    static ref QUESTION_BATCH_OUTPUT: Contract = Contract::new(
        "QuestionBatch",
        Field::object(
            "batch",
            vec![Field::list(
                "questions",
                Field::object(
                    "question",
                    vec![
                        Field::text("questionText"),
                        Field::list("options", Field::text("option")),
                        Field::text("answer")
                            .describe("The correct answer, exactly as written in options"),
                        Field::number("marks")
                            .default_value(json!(DEFAULT_QUESTION_MARKS))
                            .describe("Marks for the question; 10 when the text gives none"),
                    ],
                ),
            )],
        ),
    );

    static ref MOTTO_INPUT: Contract = Contract::new(
        "CompanyName",
        Field::text("companyName").non_empty(),
    );

    static ref MOTTO_OUTPUT: Contract = Contract::new(
        "CompanyMotto",
        Field::object(
            "result",
            vec![Field::text("motto").non_empty().describe("A short company motto")],
        ),
    );
}
