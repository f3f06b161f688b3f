use crate::storage::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use moderation_sdk::error::ModerationError;
use shared_types::ErrorResponse;
use thiserror::Error;

pub const REJECTED_MESSAGE: &str = "Rejected by moderation";

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Moderation(#[from] ModerationError),

    #[error("Rejected by moderation")]
    Rejected,

    #[error("{0}")]
    InvalidRequest(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Rejected | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) | AppError::Moderation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

pub type AppResult<T> = Result<T, AppError>;
