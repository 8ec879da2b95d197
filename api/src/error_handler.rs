use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recipe_generator::GeneratorError;
use recipe_pipeline::PipelineError;
use recipe_retrieval::RetrievalError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("startup failed: {0}")]
    Startup(#[source] PipelineError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Pipeline failure mapped to a specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
            AppError::Startup(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Startup(_) => "STARTUP_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let message = err.to_string();
        let (status, code) = match &err {
            PipelineError::Retrieval(e) => match e {
                RetrievalError::InputInvalid(_) => (StatusCode::BAD_REQUEST, "INPUT_INVALID"),
                RetrievalError::IndexUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "INDEX_UNAVAILABLE")
                }
                RetrievalError::StoreUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
                }
                RetrievalError::Embedding(_) => (StatusCode::SERVICE_UNAVAILABLE, "EMBEDDING_FAILED"),
                RetrievalError::InvalidConfig(_) | RetrievalError::EnvParse { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
                }
            },
            PipelineError::Generation(e) => match e {
                GeneratorError::GenerationFailed { .. } => {
                    (StatusCode::BAD_GATEWAY, "GENERATION_FAILED")
                }
                GeneratorError::NoJsonFound => (StatusCode::BAD_GATEWAY, "NO_JSON_FOUND"),
                GeneratorError::Unparseable(_) => (StatusCode::BAD_GATEWAY, "UNPARSEABLE_OUTPUT"),
            },
            PipelineError::Llm(_) | PipelineError::ImageLookup(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_UNAVAILABLE")
            }
        };
        AppError::Http {
            status,
            code,
            message,
        }
    }
}
