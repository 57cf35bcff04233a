pub mod alerts;
pub mod config;
pub mod dingtalk;
pub mod metrics;
pub mod server;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to send message to DingTalk, status code: {status}")]
    Delivery { status: u16 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Decode(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
