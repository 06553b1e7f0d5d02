use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Everything a caller can be told about a failed request.
///
/// Store failures deliberately collapse into `ServerFailure`; the detail is
/// logged where it happens and never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    ServerFailure,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ServerFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
