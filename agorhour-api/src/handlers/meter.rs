use crate::handlers::AppState;
use actix_web::{post, web, HttpResponse, Responder};
use shared_types::MeterRequest;

#[post("/meter")]
pub async fn post_meter(
    state: web::Data<AppState>,
    request: web::Json<MeterRequest>,
) -> impl Responder {
    HttpResponse::Ok().json(state.service.meter(&request.text))
}
