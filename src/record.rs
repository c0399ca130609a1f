use serde::{Deserialize, Serialize};

/// One completed quiz attempt, as persisted in results.json.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ResultRecord {
    /// Free text; not a reference to any stored quiz.
    pub quiz_title: String,
    pub result_text: String,
    /// Client supplied, stored verbatim.
    pub date: String,
    pub username: String,
}

/// What a client submits; the session's username is stamped on,
/// whatever the body claims.
#[derive(Debug, Deserialize)]
pub struct ResultSubmit {
    pub quiz_title: String,
    pub result_text: String,
    pub date: String,
}

impl ResultSubmit {
    pub fn into_record(self, username: &str) -> ResultRecord {
        ResultRecord {
            quiz_title: self.quiz_title,
            result_text: self.result_text,
            date: self.date,
            username: username.to_string(),
        }
    }
}
