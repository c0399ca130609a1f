use serde::{Deserialize, Serialize};

/// A quiz as persisted in quizzes.json. Identified by its position in
/// the collection - there is no delete, so positions stay stable.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Quiz {
    pub title: String,
    /// Absent in files written before authorship was recorded; listed
    /// as "Unknown" in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub result_names: Vec<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Question {
    pub text: String,
    pub options: Vec<QuizOption>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QuizOption {
    pub text: String,
    /// Index into the quiz's result_names. Display-only as far as the
    /// server is concerned: stored and served verbatim, never checked
    /// against the list's bounds.
    pub result_index: i64,
}

/// What a client submits. Deliberately has no author field - any the
/// client sends is dropped and the session's username stamped instead.
#[derive(Debug, Deserialize)]
pub struct QuizCreate {
    pub title: String,
    pub result_names: Vec<String>,
    pub questions: Vec<Question>,
}

/// The /quizzes listing projection: never includes the questions.
#[derive(Debug, Serialize, PartialEq)]
pub struct QuizSummary {
    pub id: usize,
    pub title: String,
    pub author: String,
}

impl Quiz {
    pub fn summary(&self, id: usize) -> QuizSummary {
        QuizSummary {
            id,
            title: self.title.clone(),
            author: self.author.clone().unwrap_or_else(|| "Unknown".into()),
        }
    }
}

impl QuizCreate {
    pub fn into_quiz(self, author: &str) -> Quiz {
        Quiz {
            title: self.title,
            author: Some(author.to_string()),
            result_names: self.result_names,
            questions: self.questions,
        }
    }
}
