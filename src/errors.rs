use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::models::LookupResponse;

/// Every way a client lookup can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The inbound request body or `id_number` is malformed.
    InvalidInput(String),
    /// A required setting (the API key) is missing.
    MissingConfiguration(String),
    /// SwitchTransact rejected our API key (401).
    UpstreamAuth,
    /// SwitchTransact rejected the request body (422), with its message when it sent one.
    UpstreamValidation(Option<String>),
    /// SwitchTransact throttled us (429).
    UpstreamRateLimited,
    /// SwitchTransact answered with a 5xx status.
    UpstreamServer(u16),
    /// A 200 response whose body is not usable JSON.
    UpstreamFormat(String),
    /// Connection, TLS or timeout failure before a response arrived.
    Network {
        timed_out: bool,
        detail: String,
    },
    /// Any status code not covered above.
    UnexpectedStatus(u16),
}

impl AppError {
    /// Maps a transport failure from `reqwest` onto the taxonomy.
    pub fn from_transport(err: reqwest::Error) -> Self {
        AppError::Network {
            timed_out: err.is_timeout(),
            detail: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MissingConfiguration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamAuth => StatusCode::UNAUTHORIZED,
            AppError::UpstreamValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::UpstreamServer(_)
            | AppError::UpstreamFormat(_)
            | AppError::UnexpectedStatus(_) => StatusCode::BAD_GATEWAY,
            AppError::Network { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Network { timed_out: false, .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Human-readable message placed in the `{status: "error"}` envelope.
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::MissingConfiguration(_) => "server configuration error".to_string(),
            AppError::UpstreamAuth => "authentication failed".to_string(),
            AppError::UpstreamValidation(msg) => format!(
                "upstream validation error: {}",
                msg.as_deref().unwrap_or("unknown validation error")
            ),
            AppError::UpstreamRateLimited => "rate limit reached".to_string(),
            AppError::UpstreamServer(_) => "upstream server error".to_string(),
            AppError::UpstreamFormat(_) => "invalid format from upstream".to_string(),
            AppError::Network { .. } => "error connecting to upstream".to_string(),
            AppError::UnexpectedStatus(code) => format!("unexpected response code: {}", code),
        }
    }

    /// Short label recorded by the status tracker for this failure class.
    pub fn tracker_message(&self) -> String {
        match self {
            AppError::InvalidInput(_) => "Invalid Input".to_string(),
            AppError::MissingConfiguration(_) => "Missing API Key Config".to_string(),
            AppError::UpstreamAuth => "Authentication Failed".to_string(),
            AppError::UpstreamValidation(_) => "API Validation Error".to_string(),
            AppError::UpstreamRateLimited => "Rate Limited".to_string(),
            AppError::UpstreamServer(_) => "API Server Error".to_string(),
            AppError::UpstreamFormat(_) => "Invalid Format".to_string(),
            AppError::Network {
                timed_out: true, ..
            } => "Network Error (timeout)".to_string(),
            AppError::Network { .. } => "Network Error".to_string(),
            AppError::UnexpectedStatus(code) => format!("Unexpected response code: {}", code),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::MissingConfiguration(msg) => write!(f, "Missing configuration: {}", msg),
            AppError::UpstreamAuth => write!(f, "SwitchTransact authentication failed"),
            AppError::UpstreamValidation(msg) => write!(
                f,
                "SwitchTransact validation error: {}",
                msg.as_deref().unwrap_or("no message")
            ),
            AppError::UpstreamRateLimited => write!(f, "SwitchTransact rate limit reached"),
            AppError::UpstreamServer(code) => write!(f, "SwitchTransact server error: {}", code),
            AppError::UpstreamFormat(msg) => write!(f, "Invalid SwitchTransact payload: {}", msg),
            AppError::Network { timed_out, detail } => {
                if *timed_out {
                    write!(f, "SwitchTransact request timed out: {}", detail)
                } else {
                    write!(f, "SwitchTransact request failed: {}", detail)
                }
            }
            AppError::UnexpectedStatus(code) => {
                write!(f, "Unexpected SwitchTransact status: {}", code)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Renders the `{status: "error", message}` envelope.
    ///
    /// Logs errors appropriately based on their severity.
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidInput(msg) => tracing::warn!("Rejected lookup request: {}", msg),
            AppError::MissingConfiguration(msg) => tracing::error!("Configuration error: {}", msg),
            AppError::UpstreamValidation(_) | AppError::UpstreamRateLimited => {
                tracing::warn!("{}", self)
            }
            _ => tracing::error!("{}", self),
        }

        let body = Json(LookupResponse::Error {
            message: self.client_message(),
        });

        (self.status_code(), body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_failure_class() {
        assert_eq!(
            AppError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingConfiguration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::UpstreamAuth.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::UpstreamRateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::UpstreamServer(503).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Network {
                timed_out: true,
                detail: String::new()
            }
            .status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::Network {
                timed_out: false,
                detail: String::new()
            }
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_message_falls_back_to_generic() {
        assert_eq!(
            AppError::UpstreamValidation(Some("id_number is invalid".into())).client_message(),
            "upstream validation error: id_number is invalid"
        );
        assert_eq!(
            AppError::UpstreamValidation(None).client_message(),
            "upstream validation error: unknown validation error"
        );
    }

    #[test]
    fn test_unexpected_status_mentions_code() {
        let err = AppError::UnexpectedStatus(418);
        assert_eq!(err.client_message(), "unexpected response code: 418");
        assert_eq!(err.tracker_message(), "Unexpected response code: 418");
    }

    #[test]
    fn test_configuration_error_hides_details() {
        let err = AppError::MissingConfiguration("SWITCHTRANSACT_API_KEY is not set".into());
        assert_eq!(err.client_message(), "server configuration error");
        assert_eq!(err.tracker_message(), "Missing API Key Config");
    }
}
