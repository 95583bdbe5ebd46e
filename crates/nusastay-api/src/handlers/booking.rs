//! Booking lifecycle handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use nusastay_core::error::AppError;
use nusastay_core::types::pagination::PageResponse;
use nusastay_core::types::Money;
use nusastay_database::repositories::BookingFilter;
use nusastay_entity::booking::Booking;
use nusastay_service::booking::{CreateBooking, PaymentUpdate};

use crate::dto::request::{
    BookingListQuery, CancelBookingRequest, CreateBookingRequest, UpdatePaymentRequest,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Booking>>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let booking = state
        .booking_service
        .create(
            &auth,
            CreateBooking {
                property_id: req.property_id,
                check_in: req.check_in,
                check_out: req.check_out,
                guests: req.guests(),
                contact: req.contact_snapshot(),
                payment_method: req.payment_method.clone(),
                extras: req.extras(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))))
}

/// GET /api/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<ApiResponse<PageResponse<Booking>>>, ApiError> {
    let filter = BookingFilter {
        user_id: query.user_id,
        property_id: query.property_id,
        status: query.status,
        from: query.from,
        to: query.to,
    };
    let page = state
        .booking_service
        .list(&auth, filter, &pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking = state.booking_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking = state.booking_service.confirm(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/check-in
pub async fn check_in_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking = state.booking_service.check_in(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/check-out
pub async fn check_out_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking = state.booking_service.check_out(&auth, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<CancelBookingRequest>>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let reason = body.and_then(|Json(req)| req.reason);
    let booking = state.booking_service.cancel(&auth, id, reason).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// PUT /api/bookings/{id}/payment
pub async fn update_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePaymentRequest>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking = state
        .booking_service
        .update_payment(
            &auth,
            id,
            PaymentUpdate {
                method: req.method,
                status: req.status,
                transaction_ref: req.transaction_ref,
                refund_amount: req.refund_amount.map(Money::from_minor),
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}
