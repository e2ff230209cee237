use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Localized message shown in place of any feed that failed to load
pub const FEED_FAILURE_MESSAGE: &str = "Erro ao carregar os filmes.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    /// One member of a concurrent batch failed, so the whole batch is void
    #[error("Aggregate failure in {member}: {source}")]
    AggregateFailure {
        member: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Internal server error: {0}")]
    Internal(String),

    /// An error already held by a settled loader state
    #[error(transparent)]
    Shared(Arc<AppError>),
}

impl AppError {
    /// Wraps a single fetch failure as the failure of the batch it belonged to
    pub fn aggregate(member: impl Into<String>, source: AppError) -> Self {
        AppError::AggregateFailure {
            member: member.into(),
            source: Box::new(source),
        }
    }

    /// True for network/API failures of a single request or a batch of them
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self.root(),
            AppError::HttpClient(_) | AppError::ExternalApi(_) | AppError::AggregateFailure { .. }
        )
    }

    /// Batch member whose failure voided the batch, if any
    pub fn failed_member(&self) -> Option<&str> {
        match self.root() {
            AppError::AggregateFailure { member, .. } => Some(member),
            _ => None,
        }
    }

    fn root(&self) -> &AppError {
        match self {
            AppError::Shared(inner) => inner.root(),
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let root = self.root();
        let (status, message) = match root {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::HttpClient(_)
            | AppError::ExternalApi(_)
            | AppError::AggregateFailure { .. } => {
                tracing::error!(
                    error = %root,
                    member = root.failed_member(),
                    "Catalog fetch failed"
                );
                (StatusCode::BAD_GATEWAY, FEED_FAILURE_MESSAGE.to_string())
            }
            AppError::Internal(_) | AppError::Shared(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, root.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_wraps_source() {
        let err = AppError::aggregate("popular", AppError::ExternalApi("boom".to_string()));
        assert!(err.is_fetch_failure());
        assert_eq!(
            err.to_string(),
            "Aggregate failure in popular: External API error: boom"
        );
    }

    #[test]
    fn test_invalid_input_is_not_fetch_failure() {
        assert!(!AppError::InvalidInput("empty".to_string()).is_fetch_failure());
    }

    #[test]
    fn test_fetch_failure_maps_to_bad_gateway() {
        let response = AppError::ExternalApi("status 500".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_shared_aggregate_keeps_member_and_status() {
        let inner = AppError::aggregate("popular", AppError::ExternalApi("boom".to_string()));
        let err = AppError::Shared(Arc::new(inner));

        assert!(err.is_fetch_failure());
        assert_eq!(err.failed_member(), Some("popular"));
        assert_eq!(
            err.to_string(),
            "Aggregate failure in popular: External API error: boom"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_shared_invalid_input_stays_bad_request() {
        let err = AppError::Shared(Arc::new(AppError::InvalidInput("blank".to_string())));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let response = AppError::InvalidInput("blank".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
