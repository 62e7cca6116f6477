/*
 * Responsibility
 * - Terminal errors of the groups endpoint
 * - IntoResponse: HTTP status + `{"error": "<message>"}` body
 * - The messages are part of the public contract (callers match on them)
 */
use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::graph::GraphError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    // Spelling kept as-is: existing callers compare this string.
    #[error("No userid specifid")]
    MissingUserId,
    #[error("Unable to initialize MSAL client")]
    ClientInit,
    #[error("Unable to acquire access token")]
    TokenUnavailable,
    #[error("Exception caught querying Graph: {0}")]
    Graph(#[from] GraphError),
    // Body could not be read at all (e.g. over the size limit).
    #[error("{}", .0.body_text())]
    Body(#[from] BytesRejection),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingUserId => StatusCode::BAD_REQUEST,
            AppError::TokenUnavailable => StatusCode::UNAUTHORIZED,
            AppError::ClientInit | AppError::Graph(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Body(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
