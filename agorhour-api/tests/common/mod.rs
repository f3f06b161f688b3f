#![allow(dead_code)]

use actix_web::{test, web, App};
use agorhour_api::handlers::AppState;
use agorhour_api::hour::FixedClock;
use agorhour_api::routes::configure_routes;
use agorhour_api::service::QuestionService;
use agorhour_api::storage::{QuestionStore, SqliteStore};
use agorhour_api::DbConnection;
use chrono::{DateTime, TimeZone, Utc};
use moderation_sdk::client::ModerationClient;
use moderation_sdk::error::ModerationError;
use moderation_sdk::types::ModerationVerdict;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct TestApp<S> {
    pub db_conn: DbConnection,
    pub store: Arc<SqliteStore>,
    pub clock: Arc<FixedClock>,
    pub mock_moderation: Arc<MockModerationClient>,
    pub app: S,
}

/// What the mock moderator answers next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockVerdict {
    Allow,
    Flag,
    Fail,
}

pub struct MockModerationClient {
    pub verdict: Arc<Mutex<MockVerdict>>,
    pub inputs: Arc<Mutex<Vec<String>>>,
    pub call_count: Arc<Mutex<usize>>,
}

impl MockModerationClient {
    pub fn new() -> Self {
        MockModerationClient {
            verdict: Arc::new(Mutex::new(MockVerdict::Allow)),
            inputs: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn set_verdict(&self, verdict: MockVerdict) {
        *self.verdict.lock().unwrap() = verdict;
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for MockModerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ModerationClient for MockModerationClient {
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict, ModerationError> {
        *self.call_count.lock().unwrap() += 1;
        self.inputs.lock().unwrap().push(input.to_string());

        match *self.verdict.lock().unwrap() {
            MockVerdict::Allow => Ok(ModerationVerdict::allowed()),
            MockVerdict::Flag => Ok(ModerationVerdict::flagged(["harassment"])),
            MockVerdict::Fail => Err(ModerationError::api_error(
                503,
                "moderation service unavailable".to_string(),
            )),
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-moderation"
    }
}

/// 2024-05-01 14:00:00 UTC
pub fn two_pm() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap()
}

pub fn count_rows(db_conn: &DbConnection, table: &str) -> i64 {
    db_conn
        .lock()
        .unwrap()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .unwrap()
}

pub async fn setup_test_app() -> anyhow::Result<TestApp<impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
>>> {
    let store = Arc::new(SqliteStore::in_memory()?);
    let db_conn = store.connection();
    let clock = Arc::new(FixedClock::new(two_pm()));
    let mock_moderation = Arc::new(MockModerationClient::new());

    let service = QuestionService::new(
        store.clone() as Arc<dyn QuestionStore>,
        mock_moderation.clone() as Arc<dyn ModerationClient>,
        clock.clone(),
        Duration::from_secs(5),
    );

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(service)))
            .configure(configure_routes),
    )
    .await;

    Ok(TestApp {
        db_conn,
        store,
        clock,
        mock_moderation,
        app,
    })
}
