use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Store-generated row id, kept in whatever shape the store produced it
///
/// Supabase tables use either `uuid` or `int8` identity keys, the local
/// SQLite store uses UUID text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum StoreId {
    Int(i64),
    Text(String),
}

impl StoreId {
    pub fn is_empty(&self) -> bool {
        matches!(self, StoreId::Text(text) if text.is_empty())
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreId::Int(id) => write!(f, "{id}"),
            StoreId::Text(id) => f.write_str(id),
        }
    }
}

impl From<String> for StoreId {
    fn from(id: String) -> Self {
        StoreId::Text(id)
    }
}

impl From<&str> for StoreId {
    fn from(id: &str) -> Self {
        StoreId::Text(id.to_string())
    }
}

impl From<i64> for StoreId {
    fn from(id: i64) -> Self {
        StoreId::Int(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_text_ids_keep_their_shape() {
        let numeric: StoreId = serde_json::from_str("42").unwrap();
        assert_eq!(numeric, StoreId::Int(42));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");

        let text: StoreId = serde_json::from_str(r#""6f1c1a52""#).unwrap();
        assert_eq!(text, StoreId::from("6f1c1a52"));
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""6f1c1a52""#);
    }

    #[test]
    fn test_display_is_bare_value() {
        assert_eq!(StoreId::Int(7).to_string(), "7");
        assert_eq!(StoreId::from("q-1").to_string(), "q-1");
    }

    #[test]
    fn test_other_json_is_rejected() {
        assert!(serde_json::from_str::<StoreId>("1.5").is_err());
        assert!(serde_json::from_str::<StoreId>("null").is_err());
    }
}
