#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scrape orchestration.
//!
//! [`ScrapeOrchestrator::scrape`] runs one full cycle: fetch the status
//! page, then for each [`ChannelSection`] locate its table, classify and
//! parse its rows, and publish every record to a [`ChannelSink`].
//!
//! Failures are contained at the narrowest level that makes sense:
//!
//! * a fetch failure aborts the whole scrape and leaves every gauge as is;
//! * a missing table skips only that section;
//! * a bad measurement or a rejected publish skips only that row.
//!
//! Nothing is retried and nothing is returned as an error. The caller gets a
//! [`ScrapeReport`] describing what happened, and every failure is logged.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moto_exporter_channel_models::ChannelSection;
use moto_exporter_metrics::ChannelSink;
use moto_exporter_scraper::classify::classify;
use moto_exporter_scraper::html_table::{HtmlDocument, Table, TableSource as _};
use moto_exporter_scraper::locate::locate_section;
use moto_exporter_scraper::parsing::parse_row;
use moto_exporter_scraper::{PageFetcher, ScrapeConfig, ScrapeError};

/// The steps of a single scrape, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapePhase {
    /// No scrape in progress
    Idle,
    /// Waiting on the status page
    Fetching,
    /// Looking for a section's table
    Locating(ChannelSection),
    /// Walking a section's rows
    Parsing(ChannelSection),
}

/// What happened to one section during a scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    /// The section processed.
    pub section: ChannelSection,
    /// Whether its table was found.
    pub located: bool,
    /// Records handed to the sink successfully.
    pub published: usize,
    /// Header repeats, totals, and rows too short to be channels.
    pub skipped: usize,
    /// Rows dropped because a measurement was not numeric.
    pub row_errors: usize,
    /// Records the sink rejected.
    pub publish_errors: usize,
}

impl SectionReport {
    const fn new(section: ChannelSection) -> Self {
        Self {
            section,
            located: false,
            published: 0,
            skipped: 0,
            row_errors: 0,
            publish_errors: 0,
        }
    }
}

/// Outcome of one scrape.
#[derive(Debug)]
pub struct ScrapeReport {
    /// Set when the scrape was abandoned before any section was processed.
    pub aborted: Option<ScrapeError>,
    /// One entry per section processed, in scrape order.
    pub sections: Vec<SectionReport>,
    /// Wall-clock duration of the scrape.
    pub elapsed: Duration,
}

impl ScrapeReport {
    /// Whether the page was fetched and every section was attempted.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }

    /// Returns the report for `section`, if it was processed.
    #[must_use]
    pub fn section(&self, section: ChannelSection) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.section == section)
    }

    /// Total records published across all sections.
    #[must_use]
    pub fn published(&self) -> usize {
        self.sections.iter().map(|s| s.published).sum()
    }
}

/// Runs scrapes against one modem and publishes into one sink.
///
/// Holds no per-scrape state, so a shared instance can serve overlapping
/// scrapes; their writes to the same label key simply race.
pub struct ScrapeOrchestrator<F, S> {
    config: ScrapeConfig,
    fetcher: F,
    sink: Arc<S>,
}

impl<F: PageFetcher, S: ChannelSink> ScrapeOrchestrator<F, S> {
    /// Creates an orchestrator for the page described by `config`.
    #[must_use]
    pub const fn new(config: ScrapeConfig, fetcher: F, sink: Arc<S>) -> Self {
        Self {
            config,
            fetcher,
            sink,
        }
    }

    /// The fetcher pages are retrieved with.
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The sink records are published to.
    #[must_use]
    pub const fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Runs one fetch, locate, parse, and publish cycle.
    pub async fn scrape(&self) -> ScrapeReport {
        let start = Instant::now();

        enter(ScrapePhase::Fetching);
        let tables = match self.fetch_tables().await {
            Ok(tables) => tables,
            Err(e) => {
                log::error!("Error fetching data from {}: {e}", self.config.url);
                enter(ScrapePhase::Idle);
                return ScrapeReport {
                    aborted: Some(e),
                    sections: Vec::new(),
                    elapsed: start.elapsed(),
                };
            }
        };

        let sections: Vec<SectionReport> = ChannelSection::all()
            .iter()
            .map(|&section| self.process_section(&tables, section))
            .collect();

        enter(ScrapePhase::Idle);

        let report = ScrapeReport {
            aborted: None,
            sections,
            elapsed: start.elapsed(),
        };

        for s in &report.sections {
            log::info!(
                "{}: published {}, skipped {}, row errors {}, publish errors {}{}",
                s.section,
                s.published,
                s.skipped,
                s.row_errors,
                s.publish_errors,
                if s.located { "" } else { " (table not found)" },
            );
        }
        log::info!(
            "Scrape complete: {} records published, took {:.2}s",
            report.published(),
            report.elapsed.as_secs_f64()
        );

        report
    }

    async fn fetch_tables(&self) -> Result<Vec<Table>, ScrapeError> {
        let body = self.fetcher.fetch(&self.config).await?;
        HtmlDocument::parse(&body).tables()
    }

    fn process_section(&self, tables: &[Table], section: ChannelSection) -> SectionReport {
        let mut report = SectionReport::new(section);

        enter(ScrapePhase::Locating(section));
        let located = match locate_section(tables, section) {
            Ok(located) => located,
            Err(e) => {
                log::warn!("{e}");
                return report;
            }
        };
        report.located = true;

        enter(ScrapePhase::Parsing(section));
        for (index, row) in located.body_rows() {
            let kind = classify(row);
            if !kind.is_data() {
                log::trace!("{section} row {index}: skipping {kind} row");
                report.skipped += 1;
                continue;
            }

            let record = match parse_row(section, row) {
                Ok(Some(record)) => record,
                Ok(None) => {
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    log::warn!(
                        "{section} row {index} (channel '{}'): {e}",
                        row.first_cell().unwrap_or_default()
                    );
                    report.row_errors += 1;
                    continue;
                }
            };

            match self.sink.publish(&record) {
                Ok(()) => report.published += 1,
                Err(e) => {
                    log::error!("Error observing {section} row {index}: {e}");
                    report.publish_errors += 1;
                }
            }
        }

        report
    }
}

fn enter(phase: ScrapePhase) {
    log::trace!("Scrape phase: {phase:?}");
}
