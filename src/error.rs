use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

pub const STORAGE: i32 = 1;
pub const ENV_VAR: i32 = 2;

pub const VALIDATION: i32 = 100;
pub const UNAUTHENTICATED: i32 = 101;
pub const FORBIDDEN: i32 = 102;
pub const NOT_FOUND: i32 = 103;
pub const CONFLICT: i32 = 104;
pub const CAPACITY_EXCEEDED: i32 = 105;
pub const SELF_BOOKING_FORBIDDEN: i32 = 106;

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
    /// Seats still available, carried only by `CAPACITY_EXCEEDED` so the
    /// caller can retry with a smaller request.
    pub remaining: Option<u32>,
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        storage_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self.code {
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            VALIDATION | SELF_BOOKING_FORBIDDEN => StatusCode::BAD_REQUEST,
            UNAUTHENTICATED => StatusCode::UNAUTHORIZED,
            FORBIDDEN => StatusCode::FORBIDDEN,
            NOT_FOUND => StatusCode::NOT_FOUND,
            CONFLICT | CAPACITY_EXCEEDED => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error".into(),
            _ => self.message,
        };

        let body = match self.remaining {
            Some(remaining) => Json(json!({
                "code": self.code,
                "error": message,
                "remaining_seats": remaining,
            })),
            None => Json(json!({
                "code": self.code,
                "error": message,
            })),
        };

        (status, body).into_response()
    }
}

fn plain(code: i32, message: String) -> Error {
    Error {
        code,
        message,
        remaining: None,
    }
}

pub fn validation_error(message: &str) -> Error {
    plain(VALIDATION, message.into())
}

pub fn unauthenticated_error() -> Error {
    plain(UNAUTHENTICATED, "missing or malformed caller identity".into())
}

pub fn forbidden_error() -> Error {
    plain(FORBIDDEN, "caller may not perform this action".into())
}

pub fn not_found_error() -> Error {
    plain(NOT_FOUND, "not found".into())
}

pub fn conflict_error(message: &str) -> Error {
    plain(CONFLICT, message.into())
}

pub fn capacity_exceeded_error(remaining: u32) -> Error {
    Error {
        code: CAPACITY_EXCEEDED,
        message: format!("insufficient seats: {} remaining", remaining),
        remaining: Some(remaining),
    }
}

pub fn self_booking_error() -> Error {
    plain(
        SELF_BOOKING_FORBIDDEN,
        "creator may not book a seat on their own ride".into(),
    )
}

pub fn env_var_error(_: env::VarError) -> Error {
    plain(ENV_VAR, "environment variable error".into())
}

pub fn storage_error<T: Debug>(_: T) -> Error {
    plain(STORAGE, "storage error".into())
}
