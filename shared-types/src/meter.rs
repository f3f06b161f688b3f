use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Working-meter label for a draft answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Meter {
    Green,
    Yellow,
    Red,
}

impl Meter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Meter::Green => "green",
            Meter::Yellow => "yellow",
            Meter::Red => "red",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MeterRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MeterResponse {
    pub meter: Meter,
    /// Seconds left before the question rotates
    pub countdown_seconds: i64,
}
