use crate::{
    api::{attendance, health, register},
    config::Config,
    error::{AppError, ScanError},
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{error::JsonPayloadError, middleware::Condition, web};
use tracing::warn;

type Limiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-route limiters, built once so every worker shares the same buckets.
#[derive(Clone)]
pub struct RateLimits {
    register: Limiter,
    register_enabled: bool,
    attendance: Limiter,
    attendance_enabled: bool,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            register: build_limiter(config.rate_register_per_min),
            register_enabled: config.rate_register_per_min > 0,
            attendance: build_limiter(config.rate_attendance_per_min),
            attendance_enabled: config.rate_attendance_per_min > 0,
        }
    }
}

/// Milliseconds between replenished requests; the governor works in whole
/// milliseconds, so anything above 60000/min is capped at one per ms.
fn replenish_interval_ms(requests_per_min: u32) -> u64 {
    if requests_per_min > MAX_PER_MIN {
        warn!(requests_per_min, "Rate limit above {MAX_PER_MIN}/min, capping");
    }
    (60_000 / requests_per_min.max(1) as u64).max(1)
}

const MAX_PER_MIN: u32 = 60_000;

fn build_limiter(requests_per_min: u32) -> Limiter {
    let burst = requests_per_min.max(1);
    GovernorConfigBuilder::default()
        .milliseconds_per_request(replenish_interval_ms(requests_per_min))
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_else(|| {
            warn!(requests_per_min, "Rejected rate limit settings, using governor defaults");
            GovernorConfig::default()
        })
}

fn form_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        warn!(error = %err, "Unreadable registration payload");
        AppError::Validation(register::REQUIRED_FIELDS.into()).into()
    })
}

fn scan_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        warn!(error = %err, "Unreadable scan payload");
        ScanError(AppError::Validation(attendance::NO_TAG.into())).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig, limits: &RateLimits) {
    // Web form
    cfg.service(
        web::resource("/register")
            .app_data(form_json_config())
            .wrap(Condition::new(
                limits.register_enabled,
                Governor::new(&limits.register),
            ))
            .route(web::post().to(register::register)),
    );

    // RFID scanner
    cfg.service(
        web::resource("/attendance")
            .app_data(scan_json_config())
            .wrap(Condition::new(
                limits.attendance_enabled,
                Governor::new(&limits.attendance),
            ))
            .route(web::post().to(attendance::record_attendance)),
    );

    cfg.service(web::resource("/health").route(web::get().to(health::health)));
}
