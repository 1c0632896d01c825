use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    // No destination mapped for the data type
    #[error("No destination found for data type '{0}'")]
    Configuration(String),

    // Transport errors: object store or outbound HTTP
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Malformed notification payload or envelope
    #[error("malformed event payload: {0}")]
    Parse(String),

    #[error("processing log (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Parse(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Generating response for AppError: {:?}", self);

        let status_code = self.status_code();
        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message_names_the_type() {
        let err = AppError::Configuration("TypeZ".to_string());
        assert_eq!(err.to_string(), "No destination found for data type 'TypeZ'");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_maps_to_bad_request() {
        let err = AppError::parse("missing field /url");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
