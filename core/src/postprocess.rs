//! Result post-processing
//!
//! Policy the reasoning service cannot be relied on to uphold. Applied after
//! the output contract has been checked.

use crate::contract::{
    AnalysisReport, EvaluationRequest, EvaluationResult, MottoResult, ProctoringLogEntry,
    QuestionBatch,
};

pub trait PostProcess<Req: ?Sized> {
    fn post_process(self, request: &Req) -> Self;
}

impl PostProcess<EvaluationRequest> for EvaluationResult {
    /// Caps the suggested score at the question's marks.
    ///
    /// There is no floor: a negative score is passed through.
    fn post_process(mut self, request: &EvaluationRequest) -> Self {
        if self.suggested_score > request.marks {
            crate::debug_log!(
                "Clamping suggested score {} to {} marks",
                self.suggested_score,
                request.marks
            );
            self.suggested_score = request.marks;
        }
        self
    }
}

impl PostProcess<[ProctoringLogEntry]> for AnalysisReport {
    fn post_process(self, _logs: &[ProctoringLogEntry]) -> Self {
        self
    }
}

impl PostProcess<str> for QuestionBatch {
    fn post_process(self, _raw_text: &str) -> Self {
        self
    }
}

impl PostProcess<str> for MottoResult {
    fn post_process(self, _company_name: &str) -> Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::QuestionType;

    fn request(marks: f64) -> EvaluationRequest {
        EvaluationRequest {
            question_text: "Explain borrowing".to_string(),
            question_type: QuestionType::Paragraph,
            answer: "References without ownership".to_string(),
            marks,
        }
    }

    fn result(score: f64) -> EvaluationResult {
        EvaluationResult {
            feedback: "Good".to_string(),
            suggested_score: score,
        }
    }

    #[test]
    fn test_score_above_marks_is_clamped() {
        assert_eq!(result(1005.0).post_process(&request(5.0)).suggested_score, 5.0);
    }

    #[test]
    fn test_score_within_bounds_is_untouched() {
        assert_eq!(result(3.5).post_process(&request(5.0)).suggested_score, 3.5);
        assert_eq!(result(5.0).post_process(&request(5.0)).suggested_score, 5.0);
    }

    #[test]
    fn test_negative_score_passes_through() {
        assert_eq!(result(-2.0).post_process(&request(5.0)).suggested_score, -2.0);
    }

    #[test]
    fn test_zero_marks() {
        assert_eq!(result(1.0).post_process(&request(0.0)).suggested_score, 0.0);
    }
}
