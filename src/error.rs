//! Error types and their HTTP responses.
//!
//! Handlers only ever answer with two kinds of failure: a 400 carrying a short
//! message the client can show, or a 500 with a fixed opaque message. The real
//! cause of a 500 goes to the log and nowhere else.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::config::ConfigError;
use crate::db::StoreError;
use crate::routes::MessageResponse;

pub const SERVER_ERROR_MESSAGE: &str = "Server error";

#[derive(Error, Debug)]
pub enum AppError {
    /// Client data failed a required-field or explicit-value check.
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    /// Persistence failure, including documents the schema refused.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Anything else unexpected; the message is for the log only.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(MessageResponse::new(message))).into_response()
            }
            Self::NotFound => {
                (StatusCode::NOT_FOUND, Json(MessageResponse::new("Not found"))).into_response()
            }
            err => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageResponse::new(SERVER_ERROR_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}

/// Failures that stop the process before it serves traffic.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to MongoDB: {0}")]
    Database(#[from] StoreError),

    #[error("failed to set up `{collection}` collection: {source}")]
    Collection {
        collection: &'static str,
        source: mongodb::error::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}
