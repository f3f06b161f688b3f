//! Persistence of questions and answers.
//!
//! The service only talks to [`QuestionStore`]; the two backends are a local
//! SQLite file ([`sqlite::SqliteStore`]) and a hosted Postgres reached through
//! its PostgREST/Supabase REST API ([`postgrest::PostgrestStore`]).

pub mod migrations;
pub mod postgrest;
pub mod sqlite;

use async_trait::async_trait;
use serde_json::Value;
use shared_types::{Answer, Question, StoreId};
use thiserror::Error;

pub use postgrest::PostgrestStore;
pub use sqlite::SqliteStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A write that must return a row returned none
    #[error("No matching row found")]
    NotFound,

    /// Unique constraint violation; carries the store's message
    #[error("{0}")]
    Conflict(String),

    /// Any other store failure; carries the store's message
    #[error("{0}")]
    Backend(String),

    #[error("Store request timed out after {0}s")]
    Timeout(u64),
}

/// Fields of an answer before the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub question_id: StoreId,
    pub stance: Option<Value>,
    pub body: String,
    pub risk: Option<Value>,
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// The question stored for `hour_key`, `None` when there is none
    async fn find_question_by_hour(&self, hour_key: &str) -> Result<Option<Question>, StoreError>;

    /// Plain insert; a second row for the same hour fails with [`StoreError::Conflict`]
    async fn insert_question(&self, hour_key: &str, text: &str) -> Result<Question, StoreError>;

    /// Insert, or replace the text of the row already keyed by `hour_key`
    async fn upsert_question(
        &self,
        hour_key: &str,
        text: Option<&str>,
    ) -> Result<Question, StoreError>;

    async fn insert_answer(&self, answer: NewAnswer) -> Result<Answer, StoreError>;

    /// Answers of one question, newest first
    async fn list_answers(&self, question_id: &StoreId) -> Result<Vec<Answer>, StoreError>;

    fn backend_name(&self) -> &str;
}
