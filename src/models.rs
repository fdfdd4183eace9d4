use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Only role ever issued.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[serde(default)]
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful!")]
    pub message: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub role: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}
