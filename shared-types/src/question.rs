use crate::StoreId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Text given to a question created on the first read of an hour
pub const DEFAULT_QUESTION_TEXT: &str = "What should we discuss?";

/// The question of one calendar hour (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: StoreId,
    /// `YYYY-MM-DDTHH`, unique per question
    pub hour_key: String,
    pub text: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/question`
///
/// `text` is passed to the store as given, including when it is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpsertQuestionRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_question_wire_format() {
        let question = Question {
            id: StoreId::from("q-1"),
            hour_key: "2024-05-01T14".to_string(),
            text: DEFAULT_QUESTION_TEXT.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 3).unwrap(),
        };

        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["hour_key"], "2024-05-01T14");
        assert_eq!(value["text"], "What should we discuss?");
        assert_eq!(value["created_at"], "2024-05-01T14:00:03Z");
    }

    #[test]
    fn test_question_with_numeric_id() {
        let question: Question = serde_json::from_str(
            r#"{"id":1,"hour_key":"2024-05-01T14","text":"q","created_at":"2024-05-01T14:00:03+00:00"}"#,
        )
        .unwrap();
        assert_eq!(question.id, StoreId::Int(1));
    }

    #[test]
    fn test_upsert_request_without_text() {
        let request: UpsertQuestionRequest = serde_json::from_str("{}").unwrap();
        assert!(request.text.is_none());
    }
}
