use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use actix_web::{get, post, web, HttpResponse};
use shared_types::SubmitAnswerRequest;
use tracing::error;

#[post("/answer")]
pub async fn post_answer(
    state: web::Data<AppState>,
    request: web::Json<SubmitAnswerRequest>,
) -> AppResult<HttpResponse> {
    let request = request.into_inner();
    let question_id = request.question_id.clone();

    match state.service.submit_answer(request).await {
        Ok(answer) => Ok(HttpResponse::Ok().json(answer)),
        // Already logged by the service
        Err(AppError::Rejected) => Err(AppError::Rejected),
        Err(e) => {
            error!(question_id = %question_id, error = %e, "Failed to submit answer");
            Err(e)
        }
    }
}

#[get("/answers")]
pub async fn get_answers(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let answers = state
        .service
        .list_answers_for_current_hour()
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list answers");
            e
        })?;

    Ok(HttpResponse::Ok().json(answers))
}
