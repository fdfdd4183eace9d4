use crate::{
    auth::gate::AuthGate,
    error::AppError,
    models::{LoginReqDto, LoginResponse},
};
use actix_web::{Either, HttpResponse, web};
use tracing::{info, instrument};

/// Admin login
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body(
        content = LoginReqDto,
        description = "JSON or form-encoded credentials",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Signed admin token, valid for two hours", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "message": "Invalid credentials."
        }))
    ),
    tag = "Admin"
)]
#[instrument(name = "admin_login", skip(gate, body))]
pub async fn login(
    body: Either<web::Json<LoginReqDto>, web::Form<LoginReqDto>>,
    gate: web::Data<AuthGate>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let body = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    let token = gate.login(&body.email, &body.password)?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful!".to_string(),
        token,
    }))
}
