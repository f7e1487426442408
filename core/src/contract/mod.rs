//! Contract registry: the declared shape of every request and response
//! exchanged with the reasoning service.

mod registry;
mod shape;
pub mod types;

pub use registry::Operation;
pub use shape::{Contract, ContractViolation, Field, FieldKind};
pub use types::{
    AnalysisReport, EvaluationRequest, EvaluationResult, LogStatus, MottoResult, ParsedQuestion,
    ProctoringLogEntry, QuestionBatch, QuestionType, SuspiciousActivityFinding,
    DEFAULT_QUESTION_MARKS,
};
