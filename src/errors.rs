use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};

fn current_request_id() -> Option<String> {
    crate::request_id::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every failing endpoint.
///
/// `code` and `seat_ids` carry the machine-readable part of the taxonomy:
/// callers distinguish a closed booking window from a seat conflict by `code`,
/// and seat-scoped failures list the offending ids so the client can re-fetch
/// exactly those seats.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Conflict")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Stable machine-readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Seat ids involved in an availability or conflict failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_ids: Option<Vec<i64>>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Reason a booking-level business rule rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingDenialReason {
    FlightCancelled,
    Departed,
    TooCloseToDeparture,
    AlreadyCancelled,
}

impl BookingDenialReason {
    pub fn code(&self) -> &'static str {
        match self {
            BookingDenialReason::FlightCancelled => "flight_cancelled",
            BookingDenialReason::Departed => "departed",
            BookingDenialReason::TooCloseToDeparture => "too_close_to_departure",
            BookingDenialReason::AlreadyCancelled => "already_cancelled",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            BookingDenialReason::FlightCancelled => "Flight has been cancelled",
            BookingDenialReason::Departed => "Flight has already departed",
            BookingDenialReason::TooCloseToDeparture => {
                "Booking window has closed for this flight"
            }
            BookingDenialReason::AlreadyCancelled => "Booking is already cancelled",
        }
    }
}

impl std::fmt::Display for BookingDenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Booking not allowed: {0}")]
    BookingNotAllowed(BookingDenialReason),

    #[error("Seats unavailable: {seat_ids:?}")]
    SeatsUnavailable { seat_ids: Vec<i64> },

    #[error("Seats already taken by another booking: {seat_ids:?}")]
    SeatConflict { seat_ids: Vec<i64> },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::BookingNotAllowed(_) | Self::SeatsUnavailable { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::SeatConflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Stable machine-readable code surfaced in the response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => "internal_error",
            Self::NotFound(_) => "not_found",
            Self::ValidationError(_) => "validation_error",
            Self::BookingNotAllowed(reason) => reason.code(),
            Self::SeatsUnavailable { .. } => "seats_unavailable",
            Self::SeatConflict { .. } => "seat_conflict",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
        }
    }

    /// Seat ids attached to seat-scoped failures.
    pub fn seat_ids(&self) -> Option<&[i64]> {
        match self {
            Self::SeatsUnavailable { seat_ids } | Self::SeatConflict { seat_ids } => {
                Some(seat_ids)
            }
            _ => None,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            code: Some(self.error_code().to_string()),
            seat_ids: self.seat_ids().map(|ids| ids.to_vec()),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for DbErr {
    fn into_db_err(self) -> DbErr {
        self
    }
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        ServiceError::DatabaseError(error.into_db_err())
    }
}
