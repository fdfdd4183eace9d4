use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::leave::{RequestIntake, RequestQuery, SubmitRequest};

#[derive(Serialize, ToSchema)]
pub struct SubmitResponse {
    #[schema(example = "Request submitted successfully!")]
    pub message: String,
    /// Status assigned to the request, to be shown verbatim
    #[schema(example = "Your request was submitted successfully. You will be notified of the outcome shortly.")]
    pub status: String,
}

/// Submit a vacation, permit or sick-leave request
#[utoipa::path(
    post,
    path = "/api/requests",
    request_body(
        content = SubmitRequest,
        description = "Request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Request stored and notice sent", body = SubmitResponse),
        (status = 400, description = "Missing fields or blocked date", body = Object, example = json!({
            "message": "Cannot request vacation/permits on 10/01/2025."
        })),
        (status = 500, description = "Request stored but the notice could not be sent", body = Object, example = json!({
            "message": "Request saved, but the notification email could not be sent."
        }))
    ),
    tag = "Requests"
)]
pub async fn submit_request(
    intake: web::Data<RequestIntake>,
    payload: web::Json<SubmitRequest>,
) -> Result<HttpResponse, AppError> {
    let status = intake.submit(payload.into_inner()).await?.into_result()?;

    Ok(HttpResponse::Ok().json(SubmitResponse {
        message: "Request submitted successfully!".to_string(),
        status,
    }))
}

/// All requests, newest first
#[utoipa::path(
    get,
    path = "/api/requests",
    responses(
        (status = 200, description = "Every request, newest first", body = [LeaveRequest]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Requests"
)]
pub async fn list_requests(query: web::Data<RequestQuery>) -> Result<HttpResponse, AppError> {
    let requests = query.list_for_employee().await?;
    Ok(HttpResponse::Ok().json(requests))
}
