use crate::error::AppError;
use crate::handlers::{answers, meter, ping, questions};
use actix_web::web;

/// Malformed or mistyped JSON bodies answer 400 with the usual `{error}` shape
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(ping).service(
        web::scope("/api")
            .service(questions::get_question)
            .service(questions::post_question)
            .service(answers::post_answer)
            .service(answers::get_answers)
            .service(meter::post_meter),
    );
}
