use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::session::AdminSession;
use crate::error::{AppError, ValidationError};
use crate::leave::BlockedDateRegistry;
use crate::leave::dates::parse_calendar_date;

#[derive(Deserialize, ToSchema)]
pub struct BlockDate {
    #[serde(default, alias = "data")]
    #[schema(example = "2025-08-15")]
    pub date: Option<String>,
}

/// Blocked dates, ascending
#[utoipa::path(
    get,
    path = "/api/admin/blocked-dates",
    responses(
        (status = 200, description = "Blocked dates as YYYY-MM-DD", body = [String], example = json!(["2025-08-15", "2025-12-25"])),
        (status = 403, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Blocked dates"
)]
pub async fn list_blocked_dates(
    _admin: AdminSession,
    registry: web::Data<BlockedDateRegistry>,
) -> Result<HttpResponse, AppError> {
    let dates = registry.list().await?;
    Ok(HttpResponse::Ok().json(dates))
}

/// Block a date for vacation and permit requests
#[utoipa::path(
    post,
    path = "/api/admin/blocked-dates",
    request_body = BlockDate,
    responses(
        (status = 200, description = "Date blocked", body = Object, example = json!({
            "message": "Blocked date added."
        })),
        (status = 400, description = "Missing or invalid date, or already blocked", body = Object, example = json!({
            "message": "The date is already blocked."
        })),
        (status = 403, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Blocked dates"
)]
pub async fn add_blocked_date(
    admin: AdminSession,
    registry: web::Data<BlockedDateRegistry>,
    body: web::Json<BlockDate>,
) -> Result<HttpResponse, AppError> {
    let raw = body
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or(ValidationError::MissingDate)?;
    let date = parse_calendar_date(raw)?;

    registry.add(date).await?;
    info!(admin = %admin.email, jti = %admin.claims.jti, %date, "Blocked date added");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Blocked date added."
    })))
}

/// Unblock a date; unblocking a date that is not blocked succeeds
#[utoipa::path(
    delete,
    path = "/api/admin/blocked-dates/{date}",
    params(
        ("date" = String, Path, description = "Date to unblock, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Date unblocked", body = Object, example = json!({
            "message": "Blocked date removed."
        })),
        (status = 400, description = "Invalid date"),
        (status = 403, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Blocked dates"
)]
pub async fn remove_blocked_date(
    admin: AdminSession,
    registry: web::Data<BlockedDateRegistry>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let date = parse_calendar_date(&path.into_inner())?;

    registry.remove(date).await?;
    info!(admin = %admin.email, jti = %admin.claims.jti, %date, "Blocked date removed");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Blocked date removed."
    })))
}
