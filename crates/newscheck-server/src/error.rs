use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use newscheck_ai::PredictError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Everything a request to the news checker can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("expected a request with `Content-Type: application/json`")]
    UnsupportedMediaType,

    #[error("request body exceeds the configured size limit")]
    PayloadTooLarge,

    #[error(transparent)]
    Predict(#[from] PredictError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Predict(PredictError::MissingField(_) | PredictError::InvalidField { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Predict(PredictError::Scoring(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "invalid_json",
            Self::UnsupportedMediaType => "unsupported_media_type",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Predict(PredictError::MissingField(_)) => "missing_field",
            Self::Predict(PredictError::InvalidField { .. }) => "invalid_field",
            Self::Predict(PredictError::Scoring(_)) => "internal_error",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => Self::UnsupportedMediaType,
            // Body-buffering failures report 413 when a length limit tripped.
            other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge,
            other => Self::InvalidJson(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            // Internal details stay in the log.
            error!(error = %self, "prediction failed");
            "internal error while scoring the article".to_string()
        } else {
            warn!(error = %self, code = self.code(), "rejected request");
            self.to_string()
        };
        let body = ErrorBody {
            error: message,
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newscheck_ai::ScoringError;

    #[test]
    fn request_errors_are_400() {
        let missing = ApiError::from(PredictError::MissingField("text"));
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.code(), "missing_field");

        let invalid = ApiError::from(PredictError::InvalidField {
            field: "text",
            found: "array",
        });
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.to_string(), "field `text` must be a string, got array");
    }

    #[test]
    fn scoring_errors_are_500() {
        let err = ApiError::from(PredictError::Scoring(ScoringError::NonFinite));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "internal_error");
    }

    #[test]
    fn body_rejections() {
        assert_eq!(
            ApiError::InvalidJson("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UnsupportedMediaType.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ApiError::PayloadTooLarge.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(ApiError::PayloadTooLarge.code(), "payload_too_large");
    }
}
