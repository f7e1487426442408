//! Typed views of the values exchanged with the reasoning service
//!
//! These are only ever built from values that already passed
//! [`Contract::validate`](super::Contract::validate).

use serde::{Deserialize, Serialize};

use super::ContractViolation;

/// Marks assigned to a parsed question whose source text names none
pub const DEFAULT_QUESTION_MARKS: f64 = 10.0;

/// Proctoring status reported by the telemetry collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Present,
    NoFace,
    MultipleFaces,
    TabSwitch,
}

impl LogStatus {
    pub const VALUES: &'static [&'static str] =
        &["present", "no_face", "multiple_faces", "tab_switch"];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Present => "present",
            LogStatus::NoFace => "no_face",
            LogStatus::MultipleFaces => "multiple_faces",
            LogStatus::TabSwitch => "tab_switch",
        }
    }
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProctoringLogEntry {
    pub id: String,
    pub candidate_id: String,
    pub test_id: String,
    pub timestamp: String,
    pub status: LogStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousActivityFinding {
    pub candidate_id: String,
    pub test_id: String,
    pub reason: String,
    pub timestamps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: String,
    pub suspicious_activities: Vec<SuspiciousActivityFinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    Coding,
    Paragraph,
    Image,
    Audio,
}

impl QuestionType {
    pub const VALUES: &'static [&'static str] = &["mcq", "coding", "paragraph", "image", "audio"];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Mcq => "mcq",
            QuestionType::Coding => "coding",
            QuestionType::Paragraph => "paragraph",
            QuestionType::Image => "image",
            QuestionType::Audio => "audio",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub question_text: String,
    pub question_type: QuestionType,
    pub answer: String,
    pub marks: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub feedback: String,
    pub suggested_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default = "default_marks")]
    pub marks: f64,
}

fn default_marks() -> f64 {
    DEFAULT_QUESTION_MARKS
}

impl ParsedQuestion {
    /// The answer must be one of the options, compared by value
    pub fn answer_is_an_option(&self) -> bool {
        self.options.iter().any(|option| option == &self.answer)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionBatch {
    pub questions: Vec<ParsedQuestion>,
}

impl QuestionBatch {
    /// Checks the rules a JSON shape cannot express
    pub fn check(&self) -> Result<(), ContractViolation> {
        for (index, question) in self.questions.iter().enumerate() {
            if !question.answer_is_an_option() {
                return Err(ContractViolation::new(
                    format!("$.questions[{}].answer", index),
                    "answer does not match any option",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MottoResult {
    pub motto: String,
}
