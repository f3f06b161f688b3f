use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod answer;
pub mod id;
pub mod meter;
pub mod question;
pub mod typescript_gen;

pub use typescript_gen::{generate_typescript_definitions, API_TYPE_NAMES};

pub use answer::{Answer, SubmitAnswerRequest};
pub use id::StoreId;
pub use meter::{Meter, MeterRequest, MeterResponse};
pub use question::{Question, UpsertQuestionRequest, DEFAULT_QUESTION_TEXT};

// Shared models for the agorhour API and the discussion widget

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PingResponse {
    pub ok: bool,
}
