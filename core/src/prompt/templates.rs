//! Built-in instruction templates, one per operation

use lazy_static::lazy_static;

use super::template::Template;
use crate::contract::Operation;

const ANALYZE_PROCTORING_LOGS: &str = "\
You are an AI proctoring assistant reviewing telemetry captured while candidates took an online test.

Each log entry records one observation: the candidate's face was present, no face was visible (no_face), more than one face was visible (multiple_faces), or the candidate switched away from the test tab (tab_switch).

Proctoring logs:
{{#each logs}}
- [{{this.timestamp}}] entry {{this.id}}: candidate {{this.candidateId}}, test {{this.testId}}, status {{this.status}}
{{/each}}

Identify suspicious activity such as repeated tab switches, long stretches with no face visible, or several faces in frame. Report one finding per candidate and test for each pattern you detect, explain the reason, and list every timestamp involved in the order they occurred. Finish with a short summary of the whole session. If nothing is suspicious, say so in the summary and return no findings.
";

const EVALUATE_ANSWER: &str = "\
You are an experienced examiner grading a candidate's answer.

Question type: {{questionType}}
Question: {{questionText}}
Maximum marks: {{marks}}

Candidate's answer:
{{answer}}

Assess the answer for correctness, completeness and clarity. Write constructive feedback addressed to the candidate and suggest a score between 0 and {{marks}}.
";

const PROCESS_BULK_QUESTIONS: &str = "\
You extract multiple-choice questions from raw text.

Read the text below and return every multiple-choice question it contains. For each question give the question text, its options in the order they appear, the correct answer copied exactly from one of the options, and the marks. When the text does not state the marks for a question, use 10. When the text contains no recognizable question, return an empty list.

Text:
{{rawText}}
";

const GENERATE_COMPANY_MOTTO: &str = "\
You are a branding expert. Write one short, memorable motto for the company named \"{{companyName}}\". Keep it under twelve words.
";

lazy_static! {
    static ref ANALYZE_PROCTORING_LOGS_TEMPLATE: Template =
        Template::parse(ANALYZE_PROCTORING_LOGS).expect("built-in proctoring template");
    static ref EVALUATE_ANSWER_TEMPLATE: Template =
        Template::parse(EVALUATE_ANSWER).expect("built-in evaluation template");
    static ref PROCESS_BULK_QUESTIONS_TEMPLATE: Template =
        Template::parse(PROCESS_BULK_QUESTIONS).expect("built-in question template");
    static ref GENERATE_COMPANY_MOTTO_TEMPLATE: Template =
        Template::parse(GENERATE_COMPANY_MOTTO).expect("built-in motto template");
}

/// The instruction template bound for `operation`
pub fn template_for(operation: Operation) -> &'static Template {
    match operation {
        Operation::AnalyzeProctoringLogs => &ANALYZE_PROCTORING_LOGS_TEMPLATE,
        Operation::EvaluateAnswer => &EVALUATE_ANSWER_TEMPLATE,
        Operation::ProcessBulkQuestions => &PROCESS_BULK_QUESTIONS_TEMPLATE,
        Operation::GenerateCompanyMotto => &GENERATE_COMPANY_MOTTO_TEMPLATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptBinder;
    use serde_json::json;

    #[test]
    fn test_builtin_templates_parse() {
        for operation in Operation::ALL {
            assert!(!template_for(operation).segments().is_empty(), "{}", operation);
        }
    }

    #[test]
    fn test_log_template_emits_one_line_per_entry() {
        let request = json!({
            "logs": [
                { "id": "0", "candidateId": "c1", "testId": "t1", "timestamp": "T1", "status": "tab_switch" },
                { "id": "1", "candidateId": "c1", "testId": "t1", "timestamp": "T2", "status": "tab_switch" },
            ]
        });

        let prompt =
            PromptBinder::bind(template_for(Operation::AnalyzeProctoringLogs), &request).unwrap();

        let lines: Vec<&str> = prompt.lines().filter(|l| l.starts_with("- [")).collect();
        assert_eq!(
            lines,
            vec![
                "- [T1] entry 0: candidate c1, test t1, status tab_switch",
                "- [T2] entry 1: candidate c1, test t1, status tab_switch",
            ]
        );
    }

    #[test]
    fn test_evaluation_template_keeps_marks_verbatim() {
        let request = json!({
            "questionText": "What is a lifetime?",
            "questionType": "paragraph",
            "answer": "A scope for which a reference is valid.",
            "marks": 5,
        });

        let prompt = PromptBinder::bind(template_for(Operation::EvaluateAnswer), &request).unwrap();

        assert!(prompt.contains("Maximum marks: 5\n"));
        assert!(prompt.contains("between 0 and 5."));
        assert!(prompt.contains("A scope for which a reference is valid."));
    }
}
