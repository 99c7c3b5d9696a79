// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Guard Service
//!
//! Receives contact form submissions from the portfolio page and runs them
//! through the guard pipeline before handing them to the email service.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_IDENTIFIER`: Rate limiter key (default: contact-form)
//! - `RATE_LIMIT_MAX_ATTEMPTS`: Submissions per window (default: 3)
//! - `RATE_LIMIT_WINDOW_MS`: Window length (default: 60000)
//! - `EMAIL_ENDPOINT`, `EMAIL_SERVICE_ID`, `EMAIL_TEMPLATE_ID`,
//!   `EMAIL_PUBLIC_KEY`: Email delivery settings
//! - `STATUS_DISPLAY_MS`: Status display duration (default: 5000)
//! - `METRICS_ENABLED`: Expose `/metrics` (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_guard::{
    config::Config,
    delivery::EmailJsClient,
    events::TracingEventLog,
    handlers::{router, AppState},
    limiter::RateLimiter,
    metrics::Metrics,
    pipeline::{ContactPipeline, PipelineSettings},
    validator::FormValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        identifier = %config.rate_limit.identifier,
        max_attempts = config.rate_limit.max_attempts,
        window_ms = config.rate_limit.window_ms,
        "Starting contact guard"
    );
    if !config.delivery.is_configured() {
        warn!("Email service not configured, submissions will not be delivered");
    }

    // Create application state
    let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
    let pipeline = ContactPipeline::new(
        limiter.clone(),
        FormValidator::new(config.validation.clone()),
        Arc::new(EmailJsClient::new(config.delivery.endpoint.clone())),
        Arc::new(TracingEventLog),
        PipelineSettings::from_config(&config),
    );

    let state = Arc::new(AppState {
        pipeline,
        metrics: Metrics::new()?,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_interval = config.rate_limit.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            limiter.cleanup().await;
        }
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
