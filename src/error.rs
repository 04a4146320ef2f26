use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Admin role required")]
    Forbidden,

    #[error("Sign-up failed")]
    SignUpFailed,

    #[error("Todo {0} not found")]
    TodoNotFound(i64),

    #[error("Profile update failed")]
    ProfileUpdateFailed,

    /// Messages the user had to acknowledge before the request gave up.
    #[error("{}", .0.join("; "))]
    Rejected(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::SignUpFailed => StatusCode::CONFLICT,
            AppError::TodoNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ProfileUpdateFailed => StatusCode::BAD_REQUEST,
            AppError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };

        (status, Json(self.to_string())).into_response()
    }
}
