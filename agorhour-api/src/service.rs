use crate::error::{AppError, AppResult};
use crate::hour::{hour_key, seconds_until_next_hour, Clock};
use crate::meter::meter;
use crate::storage::{NewAnswer, QuestionStore, StoreError};
use moderation_sdk::client::ModerationClient;
use moderation_sdk::error::ModerationError;
use shared_types::{Answer, MeterResponse, Question, SubmitAnswerRequest, DEFAULT_QUESTION_TEXT};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Question-of-the-hour operations over an injected store, moderator and clock
pub struct QuestionService {
    store: Arc<dyn QuestionStore>,
    moderation: Arc<dyn ModerationClient>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl QuestionService {
    pub fn new(
        store: Arc<dyn QuestionStore>,
        moderation: Arc<dyn ModerationClient>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            moderation,
            clock,
            timeout,
        }
    }

    pub fn current_hour_key(&self) -> String {
        hour_key(self.clock.now())
    }

    /// The question of the current hour, created with the default text on first read
    pub async fn get_current_question(&self) -> AppResult<Question> {
        let key = self.current_hour_key();

        if let Some(question) = self.with_store(self.store.find_question_by_hour(&key)).await? {
            return Ok(question);
        }

        match self
            .with_store(self.store.insert_question(&key, DEFAULT_QUESTION_TEXT))
            .await
        {
            Ok(question) => {
                info!(hour_key = %key, question_id = %question.id, "Created question for new hour");
                Ok(question)
            }
            Err(StoreError::Conflict(message)) => {
                // Another request created the row between our read and insert
                warn!(hour_key = %key, error = %message, "Question already created, re-fetching");
                let question = self
                    .with_store(self.store.find_question_by_hour(&key))
                    .await?
                    .ok_or(StoreError::NotFound)?;
                Ok(question)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the current hour's question text, creating the row if needed
    pub async fn set_current_question(&self, text: Option<String>) -> AppResult<Question> {
        let key = self.current_hour_key();
        let question = self
            .with_store(self.store.upsert_question(&key, text.as_deref()))
            .await?;

        info!(hour_key = %key, question_id = %question.id, "Question set");
        Ok(question)
    }

    /// Moderate the body, then store the answer unless it was flagged
    pub async fn submit_answer(&self, request: SubmitAnswerRequest) -> AppResult<Answer> {
        let verdict = tokio::time::timeout(self.timeout, self.moderation.moderate(&request.body))
            .await
            .map_err(|_| ModerationError::timeout(self.timeout.as_secs()))??;

        if verdict.flagged {
            info!(
                question_id = %request.question_id,
                categories = ?verdict.categories,
                "Answer rejected by moderation"
            );
            return Err(AppError::Rejected);
        }

        let answer = self
            .with_store(self.store.insert_answer(NewAnswer {
                question_id: request.question_id,
                stance: request.stance,
                body: request.body,
                risk: request.risk,
            }))
            .await?;

        info!(question_id = %answer.question_id, answer_id = %answer.id, "Answer stored");
        Ok(answer)
    }

    /// Answers to the current hour's question, newest first
    ///
    /// Unlike [`Self::get_current_question`] this never creates the question.
    pub async fn list_answers_for_current_hour(&self) -> AppResult<Vec<Answer>> {
        let key = self.current_hour_key();

        let Some(question) = self.with_store(self.store.find_question_by_hour(&key)).await? else {
            debug!(hour_key = %key, "No question yet, no answers");
            return Ok(Vec::new());
        };

        let answers = self.with_store(self.store.list_answers(&question.id)).await?;
        Ok(answers)
    }

    /// Working-meter label for a draft plus the time left in the hour
    pub fn meter(&self, text: &str) -> MeterResponse {
        MeterResponse {
            meter: meter(text),
            countdown_seconds: seconds_until_next_hour(self.clock.now()),
        }
    }

    pub fn store_backend(&self) -> &str {
        self.store.backend_name()
    }

    pub fn moderation_provider(&self) -> &str {
        self.moderation.provider_name()
    }

    /// Bound a store call by the request timeout
    ///
    /// Timing out only stops waiting: a write the store already accepted
    /// stays applied even though the caller sees [`StoreError::Timeout`].
    async fn with_store<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout.as_secs()))?
    }
}
