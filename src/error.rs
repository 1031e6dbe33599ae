use crate::types::SearchAvailabilityResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Failures answered by the mock booking server.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Date and time are required parameters")]
    MissingParameters,

    #[error("Cannot search for availability in the past")]
    InvalidDate,

    #[error("Time must be given as HH:mm")]
    InvalidTime,

    #[error("An unexpected error occurred while {action}")]
    Internal { action: &'static str, detail: String },
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingParameters => "MISSING_PARAMETERS",
            ApiError::InvalidDate => "INVALID_DATE",
            ApiError::InvalidTime => "INVALID_TIME",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal { action, detail } => error!(action, %detail, "Request failed"),
            _ => warn!(code = self.code(), "Rejected availability search"),
        }

        let body = SearchAvailabilityResponse::failure(self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
}
