use crate::storage::{NewAnswer, QuestionStore, StoreError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{Answer, Question, StoreId};
use std::time::Duration;

/// Postgres error code for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Store backed by a hosted Postgres exposed through PostgREST (Supabase)
pub struct PostgrestStore {
    rest_url: String,
    service_key: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorResponse {
    #[serde(default)]
    code: Option<String>,
    message: String,
    #[serde(default)]
    details: Option<String>,
}

/// `text: None` is left out of the body, so an upsert onto an existing row
/// keeps its text while a fresh row trips the column's NOT NULL constraint
#[derive(Debug, Serialize)]
struct QuestionRow<'a> {
    hour_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct AnswerRow<'a> {
    question_id: &'a StoreId,
    stance: Option<&'a Value>,
    body: &'a str,
    risk: Option<&'a Value>,
}

impl PostgrestStore {
    /// `project_url` is the project root (e.g. `https://xyz.supabase.co`);
    /// requests go to `{project_url}/rest/v1`
    pub fn new(
        project_url: impl Into<String>,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let service_key = service_key.into();
        if service_key.is_empty() {
            return Err(StoreError::Backend(
                "Store service key cannot be empty".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Backend(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            rest_url: format!("{}/rest/v1", project_url.into().trim_end_matches('/')),
            service_key,
            timeout,
            http_client,
        })
    }

    fn headers(&self, prefer: Option<&'static str>) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.service_key)
            .map_err(|_| StoreError::Backend("Invalid service key format".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|_| StoreError::Backend("Invalid service key format".to_string()))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(prefer) = prefer {
            headers.insert("prefer", HeaderValue::from_static(prefer));
        }
        Ok(headers)
    }

    fn network_error(&self, e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout(self.timeout.as_secs())
        } else {
            StoreError::Backend(e.to_string())
        }
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .http_client
            .get(format!("{}/{}", self.rest_url, table))
            .headers(self.headers(None)?)
            .query(query)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        self.read_rows(response).await
    }

    async fn write<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        prefer: &'static str,
        body: &B,
    ) -> Result<T, StoreError> {
        let response = self
            .http_client
            .post(format!("{}/{}", self.rest_url, table))
            .headers(self.headers(Some(prefer))?)
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let rows: Vec<T> = self.read_rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::NotFound)
    }

    async fn read_rows<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Vec<T>, StoreError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.network_error(e))?;

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|e| StoreError::Backend(format!("Failed to parse store response: {e}")));
        }

        match serde_json::from_str::<PostgrestErrorResponse>(&body) {
            Ok(error) => {
                let message = match error.details {
                    Some(details) if !details.is_empty() => {
                        format!("{} ({})", error.message, details)
                    }
                    _ => error.message,
                };
                if error.code.as_deref() == Some(UNIQUE_VIOLATION)
                    || status == reqwest::StatusCode::CONFLICT
                {
                    Err(StoreError::Conflict(message))
                } else {
                    Err(StoreError::Backend(message))
                }
            }
            Err(_) if status == reqwest::StatusCode::CONFLICT => Err(StoreError::Conflict(body)),
            Err(_) => Err(StoreError::Backend(format!(
                "Store returned status {}: {}",
                status.as_u16(),
                body
            ))),
        }
    }
}

#[async_trait]
impl QuestionStore for PostgrestStore {
    async fn find_question_by_hour(&self, hour_key: &str) -> Result<Option<Question>, StoreError> {
        let rows: Vec<Question> = self
            .select(
                "questions",
                &[
                    ("select", "*".to_string()),
                    ("hour_key", format!("eq.{hour_key}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_question(&self, hour_key: &str, text: &str) -> Result<Question, StoreError> {
        self.write(
            "questions",
            &[("select", "*".to_string())],
            "return=representation",
            &QuestionRow {
                hour_key,
                text: Some(text),
            },
        )
        .await
    }

    async fn upsert_question(
        &self,
        hour_key: &str,
        text: Option<&str>,
    ) -> Result<Question, StoreError> {
        self.write(
            "questions",
            &[
                ("on_conflict", "hour_key".to_string()),
                ("select", "*".to_string()),
            ],
            "return=representation,resolution=merge-duplicates",
            &QuestionRow { hour_key, text },
        )
        .await
    }

    async fn insert_answer(&self, answer: NewAnswer) -> Result<Answer, StoreError> {
        self.write(
            "answers",
            &[("select", "*".to_string())],
            "return=representation",
            &AnswerRow {
                question_id: &answer.question_id,
                stance: answer.stance.as_ref(),
                body: &answer.body,
                risk: answer.risk.as_ref(),
            },
        )
        .await
    }

    async fn list_answers(&self, question_id: &StoreId) -> Result<Vec<Answer>, StoreError> {
        self.select(
            "answers",
            &[
                ("select", "*".to_string()),
                ("question_id", format!("eq.{question_id}")),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    fn backend_name(&self) -> &str {
        "postgrest"
    }
}
