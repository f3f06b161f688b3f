use crate::error::AppResult;
use crate::handlers::AppState;
use actix_web::{get, post, web, HttpResponse};
use shared_types::UpsertQuestionRequest;
use tracing::error;

#[get("/question")]
pub async fn get_question(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let question = state.service.get_current_question().await.map_err(|e| {
        error!(error = %e, "Failed to load the current question");
        e
    })?;

    Ok(HttpResponse::Ok().json(question))
}

#[post("/question")]
pub async fn post_question(
    state: web::Data<AppState>,
    request: web::Json<UpsertQuestionRequest>,
) -> AppResult<HttpResponse> {
    let request = request.into_inner();

    let question = state
        .service
        .set_current_question(request.text)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to set the current question");
            e
        })?;

    Ok(HttpResponse::Ok().json(question))
}
