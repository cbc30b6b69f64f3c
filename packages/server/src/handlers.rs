//! HTTP handler functions for the exporter.

use actix_web::{HttpResponse, web};
use moto_exporter_metrics::{CONTENT_TYPE, ChannelMetrics};
use moto_exporter_scraper::PageFetcher;

use crate::AppState;

/// `/metrics`, any method
///
/// Scrapes the modem, then returns every gauge. A failed scrape still
/// answers with the values from earlier scrapes.
pub async fn metrics<F: PageFetcher>(state: web::Data<AppState<F>>) -> HttpResponse {
    state.orchestrator.scrape().await;
    exposition(state.metrics())
}

/// Any other path.
///
/// Returns every gauge as last published, without scraping.
pub async fn current<F: PageFetcher>(state: web::Data<AppState<F>>) -> HttpResponse {
    exposition(state.metrics())
}

/// Renders the registry in the Prometheus text format.
fn exposition(metrics: &ChannelMetrics) -> HttpResponse {
    match metrics.gather() {
        Ok(body) => HttpResponse::Ok().content_type(CONTENT_TYPE).body(body),
        Err(e) => {
            log::error!("Failed to encode metrics: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
