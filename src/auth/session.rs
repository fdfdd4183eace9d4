use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::error::{AppError, AuthError};
use crate::models::Claims;

/// Verified administrator, as placed in request extensions by `admin_guard`.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub email: String,
    pub claims: Claims,
}

impl From<Claims> for AdminSession {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email.clone(),
            claims,
        }
    }
}

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AdminSession>()
                .cloned()
                .ok_or(AppError::Auth(AuthError::MissingToken)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn claims() -> Claims {
        Claims {
            role: "admin".into(),
            email: "boss@example.com".into(),
            iat: 1,
            exp: 7201,
            jti: "3f1c".into(),
        }
    }

    #[actix_web::test]
    async fn session_comes_from_verified_claims() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AdminSession::from(claims()));

        let session = AdminSession::extract(&req).await.unwrap();
        assert_eq!(session.email, "boss@example.com");
        assert_eq!(session.claims.jti, "3f1c");
    }

    #[actix_web::test]
    async fn unguarded_request_has_no_session() {
        let req = TestRequest::default().to_http_request();
        let err = AdminSession::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::MissingToken)));
    }
}
