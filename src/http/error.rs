//! Host error layer.
//!
//! Failures forwarded by the transpile adapter end up here and are turned
//! into a generic 500 response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::transpile::TranspileError;

/// Errors rendered by the host.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Transpile(#[from] TranspileError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Transpile(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(status = %status, error = %self, "Request failed");
        (status, self.to_string()).into_response()
    }
}
