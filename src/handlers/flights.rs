use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::errors::ServiceError;
use crate::services::flights::FlightSummary;
use crate::services::seats::SeatSummary;
use crate::{ApiResponse, AppState};

/// Flight summary for booking screens.
pub async fn get_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<i64>,
) -> Result<Json<ApiResponse<FlightSummary>>, ServiceError> {
    let svc = state.services.flight.clone();
    let flight = svc.get_flight(flight_id).await?;
    Ok(Json(ApiResponse::success(flight)))
}

/// Seat map of the airplane serving a flight, with current availability.
pub async fn list_flight_seats(
    State(state): State<AppState>,
    Path(flight_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<SeatSummary>>>, ServiceError> {
    let svc = state.services.seat.clone();
    let seats = svc.list_seats_for_flight(flight_id).await?;
    Ok(Json(ApiResponse::success(seats)))
}
