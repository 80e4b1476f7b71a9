use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::auth::AuthCustomer;
use crate::errors::ServiceError;
use crate::services::bookings::{BookingResponse, BookingSummary, CreateBookingRequest};
use crate::{ApiResponse, AppState, ListQuery, PaginatedResponse};

/// Create a booking for the authenticated customer.
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), ServiceError> {
    let svc = state.services.booking.clone();
    let response = svc.create_booking(auth.customer_id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

/// Fetch one of the caller's bookings with its tickets.
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    auth: AuthCustomer,
) -> Result<Json<ApiResponse<BookingResponse>>, ServiceError> {
    let svc = state.services.booking.clone();
    let response = svc.get_booking(auth.customer_id, booking_id).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// List the caller's bookings, newest first.
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    auth: AuthCustomer,
) -> Result<Json<ApiResponse<PaginatedResponse<BookingSummary>>>, ServiceError> {
    let svc = state.services.booking.clone();
    let result = svc
        .list_bookings(auth.customer_id, query.page, query.limit)
        .await?;
    let total_pages = (result.total + query.limit - 1) / query.limit;
    Ok(Json(ApiResponse::success(PaginatedResponse {
        items: result.bookings,
        total: result.total,
        page: result.page,
        limit: result.per_page,
        total_pages,
    })))
}

/// Cancel one of the caller's bookings, releasing its seats.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    auth: AuthCustomer,
) -> Result<Json<ApiResponse<BookingSummary>>, ServiceError> {
    let svc = state.services.booking.clone();
    let summary = svc.cancel_booking(auth.customer_id, booking_id).await?;
    Ok(Json(ApiResponse::success(summary)))
}
