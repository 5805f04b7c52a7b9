use crate::error::{PipelineError, Result};

/// Substrings that select the AI-adoption questions out of the full survey
/// question bank. Matched case-sensitively, as worded in the survey.
pub const SCOPE_TOKENS: [&str; 3] = ["applications", "operations", "changes"];

/// Verbatim survey question → short display label.
pub const QUESTION_MAP: [(&str, &str); 6] = [
    (
        "In the last six months, which of the following applications of Artificial Intelligence (AI) did this business use in producing goods or services? Select all that apply.",
        "What types of applications of AI did this business use?",
    ),
    (
        "In the next six months, which of the following applications of Artificial Intelligence (AI) does this business plan to use in producing goods or services? Select all that apply.",
        "What types of applications of AI does this business plan to use?",
    ),
    (
        "In the last six months, in which of the following business functions or operations did this business use Artificial Intelligence (AI)? Select all that apply.",
        "In which business operations did this business use AI?",
    ),
    (
        "In the next six months, in which of the following business functions or operations does this business plan to use Artificial Intelligence (AI)? Select all that apply.",
        "In which business operations does this business plan to use AI?",
    ),
    (
        "In the last six months, which of the following changes did this business make as a result of using Artificial Intelligence (AI)? Select all that apply.",
        "What changes did this business make as a result of using AI?",
    ),
    (
        "In the last six months, did this business's use of Artificial Intelligence (AI) result in changes to the number of workers employed?",
        "How did AI use change the number of workers employed?",
    ),
];

/// Whether a verbatim question belongs to the AI-adoption set.
pub fn is_in_scope(question: &str) -> bool {
    SCOPE_TOKENS.iter().any(|token| question.contains(token))
}

/// Map verbatim question text to its display label.
pub fn normalize(question: &str) -> Result<&'static str> {
    QUESTION_MAP
        .iter()
        .find(|(text, _)| *text == question)
        .map(|(_, label)| *label)
        .ok_or_else(|| PipelineError::UnmappedQuestion(question.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mapped_question_is_in_scope() {
        for (text, _) in QUESTION_MAP {
            assert!(is_in_scope(text), "not in scope: {text}");
        }
    }

    #[test]
    fn scope_match_is_case_sensitive() {
        assert!(is_in_scope("Which operations used AI?"));
        assert!(!is_in_scope("Which Operations used AI?"));
        assert!(!is_in_scope("In the last two weeks, did this business use AI?"));
    }

    #[test]
    fn normalize_returns_short_label() {
        let label = normalize(QUESTION_MAP[0].0).unwrap();
        assert_eq!(label, "What types of applications of AI did this business use?");
    }

    #[test]
    fn unmapped_question_is_an_error() {
        let err = normalize("Which changes are planned for operations?").unwrap_err();
        assert!(matches!(err, PipelineError::UnmappedQuestion(q) if q.contains("planned")));
    }

    #[test]
    fn labels_are_unique() {
        let mut all: Vec<_> = QUESTION_MAP.iter().map(|(_, label)| *label).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), QUESTION_MAP.len());
    }
}
