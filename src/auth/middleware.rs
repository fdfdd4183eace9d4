use crate::auth::gate::AuthGate;
use crate::auth::session::AdminSession;
use crate::error::AppError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    web::Data,
};

/// Rejects requests without a valid admin bearer token and exposes the
/// verified claims to handlers as [`AdminSession`].
pub async fn admin_guard(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let gate = req
        .app_data::<Data<AuthGate>>()
        .ok_or_else(|| AppError::Internal("AuthGate not registered".into()))?
        .clone();

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|h| h.to_str().unwrap_or_default());

    match gate.verify_bearer(header) {
        Ok(claims) => {
            req.extensions_mut().insert(AdminSession::from(claims));
            next.call(req).await
        }
        Err(e) => {
            tracing::info!(path = %req.path(), reason = %e, "Admin request rejected");
            let resp = AppError::Auth(e).error_response();
            Ok(req.into_response(resp))
        }
    }
}
