use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{ADMIN_ROLE, Claims};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

/// Admin sessions last two hours; there is no refresh.
pub const ADMIN_TOKEN_TTL: usize = 2 * 60 * 60;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

pub fn generate_admin_token(email: &str, secret: &str) -> Result<(String, Claims), Error> {
    let issued_at = now();
    let claims = Claims {
        role: ADMIN_ROLE.to_string(),
        email: email.to_string(),
        iat: issued_at,
        exp: issued_at + ADMIN_TOKEN_TTL,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

/// Checks signature and expiry.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
