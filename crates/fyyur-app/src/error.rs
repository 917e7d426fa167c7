use axum::{
    extract::rejection::QueryRejection,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use tracing::{debug, error};

pub type Error = anyhow::Error;
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    DataAccess(#[from] fyyur_dal::Error),

    #[error("{}", .0.body_text())]
    Query(#[from] QueryRejection),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        use fyyur_dal::Error as DalError;
        match self {
            ApiError::DataAccess(e) => match e {
                DalError::RecordNotFound(_) => StatusCode::NOT_FOUND,
                DalError::DanglingReference { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                DalError::HasDependents { .. } => StatusCode::CONFLICT,
                e if e.is_constraint_violation() => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Query(e) => e.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // details of server side failures go to log only
        let message = if status.is_server_error() {
            error!("Request failed: {self}");
            "Internal server error".to_string()
        } else {
            debug!("Request rejected with {status}: {self}");
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
