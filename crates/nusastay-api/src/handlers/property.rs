//! Property availability handler.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use nusastay_core::types::StayRange;
use nusastay_service::availability::AvailabilityReport;

use crate::dto::request::AvailabilityQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/properties/{id}/availability?check_in=...&check_out=...
///
/// Public: availability is browsable without an account.
pub async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityReport>>, ApiError> {
    let range = StayRange::new(query.check_in, query.check_out)?;
    let report = state.availability.check(id, &range).await?;
    Ok(Json(ApiResponse::ok(report)))
}
