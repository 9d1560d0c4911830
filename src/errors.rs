use thiserror::Error;

use crate::stapi::schema::ValidationError;

/// Failures talking to STAPI or interpreting its responses.
#[derive(Debug, Error)]
pub enum StapiError {
    #[error("stapi transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("character detail fetch failed for {uid}: {source}")]
    Aggregation {
        uid: String,
        #[source]
        source: Box<StapiError>,
    },
}

impl StapiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Innermost transport/validation error, looking through aggregation.
    pub fn root(&self) -> &StapiError {
        match self {
            Self::Aggregation { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.root() {
            Self::Validation(_) => "upstream_validation",
            _ => "upstream_transport",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest {
        code: &'static str,
        message: &'static str,
    },
    #[error("upstream error: {0}")]
    Upstream(#[from] StapiError),
    #[error("internal error")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: &'static str) -> Self {
        Self::BadRequest { code, message }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
