//! OpenAI API types for the Moderations endpoint.
//!
//! - **Endpoint:** `/v1/moderations`
//! - **Models:** `omni-moderation-latest`, `text-moderation-latest`
//! - **Request Type:** [`OpenAIModerationRequest`]
//! - **Response Type:** [`OpenAIModerationResponse`]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default moderation model
pub const DEFAULT_MODERATION_MODEL: &str = "omni-moderation-latest";

/// Request body for `POST /v1/moderations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIModerationRequest {
    pub model: String,
    pub input: String,
}

/// Response body of `POST /v1/moderations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIModerationResponse {
    pub id: String,
    pub model: String,
    /// One result per input; a single string input yields one entry
    #[serde(default)]
    pub results: Vec<OpenAIModerationResult>,
}

/// Verdict for one input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIModerationResult {
    pub flagged: bool,
    #[serde(default)]
    pub categories: BTreeMap<String, bool>,
    #[serde(default)]
    pub category_scores: BTreeMap<String, f64>,
}

impl OpenAIModerationResult {
    /// Names of the categories marked `true`
    pub fn flagged_categories(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// OpenAI API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIErrorResponse {
    /// Error details
    pub error: OpenAIError,
}

/// OpenAI API error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIError {
    /// Error message
    pub message: String,
    /// Error type
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Error code
    #[serde(default)]
    pub code: Option<String>,
}
