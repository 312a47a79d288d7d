//! Error-to-response mapping. Server-side causes get logged here;
//! only safe messages reach the client.

use axum::http::StatusCode;
use tracing::error;
use vellum_engine::EngineError;

pub type ApiError = (StatusCode, String);

pub fn engine_error(err: EngineError) -> ApiError {
    match err {
        EngineError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        EngineError::NotFound(what) => not_found(what),
        EngineError::Storage(e) => {
            error!("Cover storage failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to store uploaded file".into(),
            )
        }
        EngineError::Persistence(e) => {
            error!("Database error: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
        }
    }
}

pub fn db_error(err: anyhow::Error) -> ApiError {
    error!("Database error: {:#}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
}

pub fn join_error(err: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
}

pub fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

pub fn bad_request(msg: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, msg.into())
}
