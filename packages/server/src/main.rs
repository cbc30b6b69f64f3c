#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Prometheus exporter for cable modem bonded channel statistics.
//!
//! ```text
//! moto_exporter [URL]
//! ```
//!
//! Serves `http://0.0.0.0:8000/metrics`, scraping `URL` on every request.

use clap::Parser;
use moto_exporter_scraper::{DEFAULT_URL, ScrapeConfig};

#[derive(Parser)]
#[command(
    name = "moto_exporter",
    about = "Export cable modem bonded channel statistics as Prometheus gauges"
)]
struct Cli {
    /// URL to scrape
    #[arg(default_value = DEFAULT_URL)]
    url: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    moto_exporter_server::run_server(ScrapeConfig::new(&cli.url)).await
}
