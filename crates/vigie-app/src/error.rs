use salvo::{Response, http::StatusCode, writing::Json};
use serde::Serialize;
use thiserror::Error;
use vigie_core::error::CoreError;
use vigie_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] vigie_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(err) => match err {
                ServiceError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                ServiceError::AuthorizationError(_) => StatusCode::FORBIDDEN,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::ValidationError(_)
                | ServiceError::CoreError(CoreError::ParseError(_) | CoreError::InvalidInput(_)) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CoreError(CoreError::ParseError(_) | CoreError::InvalidInput(_))
            | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::CoreError(_) | Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Internal failures are not described.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::ServiceError(ServiceError::NotAuthenticated) => {
                "Authentication required".to_string()
            }
            Self::ServiceError(ServiceError::AuthorizationError(message)) => message.clone(),
            Self::ServiceError(ServiceError::NotFound(what)) => format!("{what} not found"),
            Self::ServiceError(ServiceError::ValidationError(message))
            | Self::InvalidRequest(message) => message.clone(),
            Self::ServiceError(ServiceError::CoreError(
                CoreError::ParseError(message) | CoreError::InvalidInput(message),
            ))
            | Self::CoreError(CoreError::ParseError(message) | CoreError::InvalidInput(message)) => {
                message.clone()
            }
            _ => "Internal server error".to_string(),
        }
    }

    /// ## Summary
    /// Writes the status code and a JSON error body to the response.
    pub fn render(&self, res: &mut Response) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        res.status_code(status);
        res.render(Json(ErrorResponse {
            error: self.public_message(),
        }));
    }
}
