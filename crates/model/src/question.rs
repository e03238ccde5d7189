use alloc::string::String;
use serde::{Deserialize, Serialize};

/// A single prompt and its expected reply.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    /// Text to be displayed in chat.
    pub prompt: String,
    /// Exact text that counts as a correct answer.
    pub answer: String,
}

impl Question {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), answer: answer.into() }
    }

    /// Only leading and trailing whitespace is ignored. Case and inner spacing must match,
    /// so `Fe2+` does not satisfy `Fe 2+`.
    pub fn is_correct(&self, text: &str) -> bool {
        text.trim() == self.answer.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::Question;

    #[test]
    fn accepts_surrounding_whitespace() {
        let q = Question::new("What is the formula of a zinc ion?", "Zn 2+");
        assert!(q.is_correct("Zn 2+"));
        assert!(q.is_correct("  Zn 2+\n"));
        assert!(q.is_correct("\tZn 2+ "));
    }

    #[test]
    fn rejects_inner_whitespace_and_case() {
        let q = Question::new("What is the formula of an iron(II) ion?", "Fe 2+");
        assert!(!q.is_correct("Fe2+"));
        assert!(!q.is_correct("Fe  2+"));
        assert!(!q.is_correct("fe 2+"));
        assert!(!q.is_correct("FE 2+"));
        assert!(!q.is_correct(""));
    }

    #[test]
    fn trims_expected_answer_too() {
        let q = Question::new("Padded?", " OH - ");
        assert!(q.is_correct("OH -"));
    }

    #[test]
    fn parses_from_json() {
        let q: Question = serde_json::from_str(r#"{"prompt":"What is the formula of a silver ion?","answer":"Ag +"}"#).unwrap();
        assert_eq!(q, Question::new("What is the formula of a silver ion?", "Ag +"));
    }
}
