pub mod answers;
pub mod meter;
pub mod questions;

use crate::service::QuestionService;
use actix_web::{get, HttpResponse, Responder};
use shared_types::PingResponse;

/// Shared state handed to every handler through `web::Data`
pub struct AppState {
    pub service: QuestionService,
}

impl AppState {
    pub fn new(service: QuestionService) -> Self {
        Self { service }
    }
}

#[get("/ping")]
pub async fn ping() -> impl Responder {
    HttpResponse::Ok().json(PingResponse { ok: true })
}
