use crate::StoreId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// A moderated answer to one hour's question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Answer {
    pub id: StoreId,
    pub question_id: StoreId,
    /// Free label chosen by the widget, any JSON value
    #[ts(type = "unknown")]
    pub stance: Option<Value>,
    pub body: String,
    #[ts(type = "unknown")]
    pub risk: Option<Value>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/answer`
///
/// Nothing but `body` is inspected; `question_id`, `stance` and `risk` go to
/// the store verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitAnswerRequest {
    pub question_id: StoreId,
    #[serde(default)]
    #[ts(type = "unknown")]
    pub stance: Option<Value>,
    pub body: String,
    #[serde(default)]
    #[ts(type = "unknown")]
    pub risk: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submit_request_optional_labels() {
        let request: SubmitAnswerRequest =
            serde_json::from_str(r#"{"question_id":"q-1","body":"pineapple belongs on pizza"}"#)
                .unwrap();
        assert_eq!(request.question_id, StoreId::from("q-1"));
        assert!(request.stance.is_none());
        assert!(request.risk.is_none());
    }

    #[test]
    fn test_submit_request_takes_any_label_shape() {
        let request: SubmitAnswerRequest = serde_json::from_value(json!({
            "question_id": 12,
            "stance": "agree",
            "body": "hi",
            "risk": 0.2
        }))
        .unwrap();
        assert_eq!(request.question_id, StoreId::Int(12));
        assert_eq!(request.stance, Some(json!("agree")));
        assert_eq!(request.risk, Some(json!(0.2)));
    }

    #[test]
    fn test_submit_request_requires_body() {
        let result = serde_json::from_str::<SubmitAnswerRequest>(r#"{"question_id":"q-1"}"#);
        assert!(result.is_err());
    }
}
