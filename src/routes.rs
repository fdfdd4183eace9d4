use crate::{
    api::{admin, blocked_dates, requests},
    auth::{handlers, middleware::admin_guard},
    config::Config,
    error::{AppError, ValidationError},
};
use actix_cors::Cors;
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Result, anyhow};
use std::sync::Arc;

type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiters. Built once so every worker shares the same buckets.
#[derive(Clone)]
pub struct RateLimiters {
    pub login: Arc<Limiter>,
    pub public: Arc<Limiter>,
    pub admin: Arc<Limiter>,
}

impl RateLimiters {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            login: Arc::new(build_limiter(config.rate_login_per_min)?),
            public: Arc::new(build_limiter(config.rate_public_per_min)?),
            admin: Arc::new(build_limiter(config.rate_admin_per_min)?),
        })
    }
}

fn build_limiter(requests_per_min: u32) -> Result<Limiter> {
    let per_ms = (60_000 / requests_per_min.max(1) as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min}/min"))?;
    Ok(Governor::new(&cfg))
}

/// Any origin when `allowed_origins` is empty, otherwise only the listed ones.
pub fn cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}

/// JSON, form and query extraction failures answer with `{"message": ...}` like every other error.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(ValidationError::MalformedBody(err.to_string())).into()
    }))
    .app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::Validation(ValidationError::MalformedBody(err.to_string())).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(ValidationError::MalformedBody(err.to_string())).into()
    }));
}

pub fn configure(cfg: &mut web::ServiceConfig, limiters: &RateLimiters) {
    extractor_config(cfg);

    // Public: must be registered before the guarded /api/admin scope
    cfg.service(
        web::resource("/api/admin/login")
            .wrap(limiters.login.clone())
            .route(web::post().to(handlers::login)),
    );

    // Admin only
    cfg.service(
        web::scope("/api/admin")
            .wrap(from_fn(admin_guard))
            .wrap(limiters.admin.clone())
            .service(
                web::resource("/requests")
                    .route(web::get().to(admin::list_requests))
                    .route(web::delete().to(admin::delete_requests)),
            )
            .service(
                web::resource("/blocked-dates")
                    .route(web::get().to(blocked_dates::list_blocked_dates))
                    .route(web::post().to(blocked_dates::add_blocked_date)),
            )
            .service(
                web::resource("/blocked-dates/{date}")
                    .route(web::delete().to(blocked_dates::remove_blocked_date)),
            ),
    );

    // Employees
    cfg.service(
        web::scope("/api")
            .wrap(limiters.public.clone())
            .service(
                web::resource("/requests")
                    .route(web::post().to(requests::submit_request))
                    .route(web::get().to(requests::list_requests)),
            ),
    );
}

// LOGIN
//  └─ token (2 h, no refresh)

// ADMIN REQUEST
//  └─ Authorization: Bearer token

// TOKEN EXPIRED
//  └─ log in again
