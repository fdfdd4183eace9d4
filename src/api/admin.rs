use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::auth::session::AdminSession;
use crate::error::AppError;
use crate::leave::{AdminFilter, RequestQuery};

#[derive(Deserialize, ToSchema)]
pub struct DeleteRequests {
    #[serde(default)]
    #[schema(example = json!([3, 7]))]
    pub ids: Vec<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Requests deleted.")]
    pub message: String,
    /// Records actually removed
    #[schema(example = 2)]
    pub deleted: u64,
}

/// Filtered request listing for the dashboard
#[utoipa::path(
    get,
    path = "/api/admin/requests",
    params(AdminFilter),
    responses(
        (status = 200, description = "Matching requests, newest first", body = [LeaveRequest]),
        (status = 400, description = "Invalid month"),
        (status = 403, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn list_requests(
    _admin: AdminSession,
    query: web::Data<RequestQuery>,
    filter: web::Query<AdminFilter>,
) -> Result<HttpResponse, AppError> {
    let requests = query.list_for_admin(&filter).await?;
    Ok(HttpResponse::Ok().json(requests))
}

/// Delete selected requests
#[utoipa::path(
    delete,
    path = "/api/admin/requests",
    request_body = DeleteRequests,
    responses(
        (status = 200, description = "Existing ids deleted, unknown ids ignored", body = DeleteResponse),
        (status = 400, description = "No ids given", body = Object, example = json!({
            "message": "No request selected."
        })),
        (status = 403, description = "Missing, invalid or expired token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn delete_requests(
    admin: AdminSession,
    query: web::Data<RequestQuery>,
    body: web::Json<DeleteRequests>,
) -> Result<HttpResponse, AppError> {
    let deleted = query.delete_by_ids(&body.ids).await?;
    info!(admin = %admin.email, jti = %admin.claims.jti, deleted, "Admin deleted requests");

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Requests deleted.".to_string(),
        deleted,
    }))
}
