#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server exporting cable modem channel metrics.
//!
//! Every request to `/metrics` scrapes the modem status page on the request path
//! and then answers with the Prometheus text exposition. There is no
//! background polling: without requests, the modem is never contacted.

mod handlers;

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use moto_exporter_metrics::ChannelMetrics;
use moto_exporter_orchestrator::ScrapeOrchestrator;
use moto_exporter_scraper::fetch::HttpPageFetcher;
use moto_exporter_scraper::{PageFetcher, ScrapeConfig};

/// Address the server listens on.
pub const BIND_ADDR: &str = "0.0.0.0";

/// Port the server listens on.
pub const PORT: u16 = 8000;

/// Shared application state.
pub struct AppState<F> {
    /// Scrapes the modem into the shared gauge registry.
    pub orchestrator: ScrapeOrchestrator<F, ChannelMetrics>,
}

impl<F: PageFetcher> AppState<F> {
    /// The gauge registry scrapes publish into.
    #[must_use]
    pub fn metrics(&self) -> &ChannelMetrics {
        self.orchestrator.sink()
    }
}

/// Registers the exporter routes.
///
/// `/metrics` scrapes whatever the request method is.
pub fn configure<F: PageFetcher + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::route().to(handlers::metrics::<F>))
        .default_service(web::to(handlers::current::<F>));
}

/// Starts the exporter.
///
/// Creates the gauge registry and HTTP client once, then serves on
/// [`BIND_ADDR`]:[`PORT`] until the server stops. This is a regular async
/// function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the registry or HTTP client cannot
/// be created, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ScrapeConfig) -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let metrics = ChannelMetrics::new().map_err(std::io::Error::other)?;
    let fetcher = HttpPageFetcher::new().map_err(std::io::Error::other)?;

    log::info!(
        "Scraping {} on each /metrics request (timeout {:?})",
        config.url,
        config.timeout
    );

    let state = web::Data::new(AppState {
        orchestrator: ScrapeOrchestrator::new(config, fetcher, Arc::new(metrics)),
    });

    log::info!("Server running on http://localhost:{PORT}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure::<HttpPageFetcher>)
    })
    .bind((BIND_ADDR, PORT))?
    .run()
    .await
}
