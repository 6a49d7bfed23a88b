//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use blockbank_common::{BlockBankError, ChainError};
use tracing::error;

/// Error returned by every handler, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError(pub BlockBankError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BlockBankError::Validation(_) => StatusCode::BAD_REQUEST,
            BlockBankError::Chain(chain) => match chain {
                ChainError::InvalidAmount(_) | ChainError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
                ChainError::NotFound(_) => StatusCode::NOT_FOUND,
                ChainError::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ChainError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
            },
            BlockBankError::Config(_) | BlockBankError::Serialization(_) | BlockBankError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<BlockBankError>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockbank_common::ValidationError;

    #[test]
    fn test_status_mapping() {
        let validation: ApiError = ValidationError::RiskScoreOutOfRange {
            score: 120,
            min: 0,
            max: 100,
        }
        .into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let missing: ApiError = ChainError::NotFound("0x00".to_string()).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let timeout: ApiError = ChainError::DeadlineExceeded { limit_ms: 10 }.into();
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);

        let internal = ApiError(BlockBankError::Internal("boom".to_string()));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
