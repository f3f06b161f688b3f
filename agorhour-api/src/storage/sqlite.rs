use crate::storage::{migrations, NewAnswer, QuestionStore, StoreError};
use crate::DbConnection;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use serde_json::Value;
use shared_types::{Answer, Question, StoreId};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const QUESTION_COLUMNS: &str = "id, hour_key, text, created_at";
const ANSWER_COLUMNS: &str = "id, question_id, stance, body, risk, created_at";

pub struct SqliteStore {
    connection: DbConnection,
}

impl SqliteStore {
    /// Open (or create) the database file and bring its schema up to date
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Backend(format!("Failed to create database directory: {e}"))
                })?;
            }
        }

        let conn = Connection::open(db_path).map_err(map_sqlite_error)?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(map_sqlite_error)?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, StoreError> {
        // SQLite ships with foreign keys disabled
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(map_sqlite_error)?;

        migrations::run_migrations(&mut conn)
            .map_err(|e| StoreError::Backend(format!("Failed to run migrations: {e}")))?;

        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> DbConnection {
        Arc::clone(&self.connection)
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_connection<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);

        tokio::task::spawn_blocking(move || {
            let conn = connection
                .lock()
                .map_err(|e| StoreError::Backend(format!("Lock error: {e}")))?;
            f(&conn).map_err(map_sqlite_error)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("Store task failed: {e}")))?
    }
}

#[async_trait]
impl QuestionStore for SqliteStore {
    async fn find_question_by_hour(&self, hour_key: &str) -> Result<Option<Question>, StoreError> {
        let hour_key = hour_key.to_string();

        self.with_connection(move |conn| {
            conn.query_row(
                &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE hour_key = ?1"),
                params![hour_key],
                question_from_row,
            )
            .optional()
        })
        .await
    }

    async fn insert_question(&self, hour_key: &str, text: &str) -> Result<Question, StoreError> {
        let hour_key = hour_key.to_string();
        let text = text.to_string();

        self.with_connection(move |conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO questions (id, hour_key, text) VALUES (?1, ?2, ?3)
                     RETURNING {QUESTION_COLUMNS}"
                ),
                params![Uuid::new_v4().to_string(), hour_key, text],
                question_from_row,
            )
        })
        .await
    }

    async fn upsert_question(
        &self,
        hour_key: &str,
        text: Option<&str>,
    ) -> Result<Question, StoreError> {
        let hour_key = hour_key.to_string();
        let text = text.map(str::to_string);

        self.with_connection(move |conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO questions (id, hour_key, text) VALUES (?1, ?2, ?3)
                     ON CONFLICT(hour_key) DO UPDATE SET text = excluded.text
                     RETURNING {QUESTION_COLUMNS}"
                ),
                params![Uuid::new_v4().to_string(), hour_key, text],
                question_from_row,
            )
        })
        .await
    }

    async fn insert_answer(&self, answer: NewAnswer) -> Result<Answer, StoreError> {
        let stance = label_to_sql(answer.stance.as_ref())?;
        let risk = label_to_sql(answer.risk.as_ref())?;

        self.with_connection(move |conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO answers (id, question_id, stance, body, risk)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     RETURNING {ANSWER_COLUMNS}"
                ),
                params![
                    Uuid::new_v4().to_string(),
                    answer.question_id.to_string(),
                    stance,
                    answer.body,
                    risk,
                ],
                answer_from_row,
            )
        })
        .await
    }

    async fn list_answers(&self, question_id: &StoreId) -> Result<Vec<Answer>, StoreError> {
        let question_id = question_id.to_string();

        self.with_connection(move |conn| {
            // rowid breaks ties between answers stored in the same millisecond
            let mut stmt = conn.prepare(&format!(
                "SELECT {ANSWER_COLUMNS} FROM answers
                 WHERE question_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let answers = stmt
                .query_map(params![question_id], answer_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(answers)
        })
        .await
    }

    fn backend_name(&self) -> &str {
        "sqlite"
    }
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: StoreId::Text(row.get(0)?),
        hour_key: row.get(1)?,
        text: row.get(2)?,
        created_at: timestamp_from_row(row, 3)?,
    })
}

fn answer_from_row(row: &Row<'_>) -> rusqlite::Result<Answer> {
    Ok(Answer {
        id: StoreId::Text(row.get(0)?),
        question_id: StoreId::Text(row.get(1)?),
        stance: label_from_row(row, 2)?,
        body: row.get(3)?,
        risk: label_from_row(row, 4)?,
        created_at: timestamp_from_row(row, 5)?,
    })
}

/// Labels are stored as JSON text so any value shape survives
fn label_to_sql(label: Option<&Value>) -> Result<Option<String>, StoreError> {
    label
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| StoreError::Backend(format!("Failed to encode label: {e}")))
}

fn label_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Value>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        serde_json::from_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

fn timestamp_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn map_sqlite_error(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY) =>
        {
            StoreError::Conflict(e.to_string())
        }
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
        _ => StoreError::Backend(e.to_string()),
    }
}
