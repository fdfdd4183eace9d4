use anyhow::anyhow;
use tracing::{debug, info};

use crate::{
    auth::{
        jwt::{generate_admin_token, verify_token},
        password::{hash_password, verify_password},
    },
    config::AdminConfig,
    error::{AppError, AuthError},
    models::{ADMIN_ROLE, Claims},
};

/// Single administrator identity plus stateless signed sessions.
///
/// Only an Argon2 hash of the configured password is kept in memory. A
/// valid token is the sole proof of an admin session; nothing is stored
/// server side.
#[derive(Clone)]
pub struct AuthGate {
    admin_email: String,
    password_hash: String,
    secret: String,
}

impl AuthGate {
    pub fn new(admin: &AdminConfig, secret: &str) -> anyhow::Result<Self> {
        let password_hash = hash_password(admin.password.trim())
            .map_err(|e| anyhow!("Failed to hash admin password: {e}"))?;

        Ok(Self {
            admin_email: normalize_email(&admin.email),
            password_hash,
            secret: secret.to_string(),
        })
    }

    /// Email is trimmed and case-folded, password only trimmed.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = normalize_email(email);

        if email != self.admin_email {
            info!("Invalid credentials: unknown email");
            return Err(AuthError::InvalidCredentials.into());
        }

        if verify_password(password.trim(), &self.password_hash).is_err() {
            info!("Invalid credentials: password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        let (token, claims) = generate_admin_token(&email, &self.secret)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;

        debug!(jti = %claims.jti, exp = claims.exp, "Admin token issued");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = verify_token(token, &self.secret).map_err(|e| {
            debug!(error = %e, "Token rejected");
            AuthError::InvalidOrExpiredToken
        })?;

        if claims.role != ADMIN_ROLE {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        Ok(claims)
    }

    /// Verifies the raw `Authorization` header value, if any.
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        self.verify(token)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
