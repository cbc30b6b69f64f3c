#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Prometheus gauges for cable modem bonded channels.
//!
//! [`ChannelMetrics`] owns a dedicated [`Registry`] holding one labeled gauge
//! family per measurement. It is created once at start-up and shared; every
//! scrape writes into it through [`ChannelSink::publish`], and the `/metrics`
//! endpoint renders it with [`ChannelMetrics::gather`].
//!
//! Gauges are last-write-wins and never expire: a channel that disappears
//! from the modem page keeps its last published value.

use std::string::FromUtf8Error;

use moto_exporter_channel_models::{
    ChannelRecord, ChannelSection, DownstreamChannel, LabelKey, UpstreamChannel,
};
use prometheus::{Encoder as _, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use strum_macros::Display;

/// Prefix shared by every exported metric name.
pub const NAMESPACE: &str = "moto";

/// Content type of [`ChannelMetrics::gather`] output.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Errors raised by the metric registry.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Registering, resolving, or encoding a metric failed.
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    /// The text encoder produced invalid UTF-8.
    #[error("Metrics exposition is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// One exported gauge family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum GaugeFamily {
    /// Downstream receive power
    Pwr,
    /// Downstream signal-to-noise ratio
    Snr,
    /// Downstream corrected codewords
    Corrected,
    /// Downstream uncorrectable codewords
    Uncorrected,
    /// Upstream symbol rate
    UpstreamSymbRate,
    /// Upstream transmit power
    UpstreamPwr,
}

impl GaugeFamily {
    /// Every family, downstream first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pwr,
            Self::Snr,
            Self::Corrected,
            Self::Uncorrected,
            Self::UpstreamSymbRate,
            Self::UpstreamPwr,
        ]
    }

    /// The section whose records feed this family.
    #[must_use]
    pub const fn section(self) -> ChannelSection {
        match self {
            Self::Pwr | Self::Snr | Self::Corrected | Self::Uncorrected => {
                ChannelSection::Downstream
            }
            Self::UpstreamSymbRate | Self::UpstreamPwr => ChannelSection::Upstream,
        }
    }

    /// `HELP` text for the family.
    #[must_use]
    pub const fn help(self) -> &'static str {
        match self {
            Self::Pwr => "Power for downstream bonded channels",
            Self::Snr => "SNR for downstream bonded channels",
            Self::Corrected => "Corrected power for downstream bonded channels",
            Self::Uncorrected => "Uncorrected power for downstream bonded channels",
            Self::UpstreamSymbRate => "Symbol rate for upstream bonded channels",
            Self::UpstreamPwr => "Power for upstream bonded channels",
        }
    }

    /// Fully qualified metric name, e.g. `moto_upstream_pwr`.
    #[must_use]
    pub fn metric_name(self) -> String {
        format!("{NAMESPACE}_{self}")
    }
}

/// Receives parsed channel records.
///
/// The scrape orchestrator only depends on this trait; it never reads values
/// back and assumes other scrapes may be writing concurrently.
pub trait ChannelSink: Send + Sync {
    /// Sets every gauge fed by `record` under the record's label key.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError`] if a gauge cannot be resolved. In that case
    /// no gauge for the record is changed.
    fn publish(&self, record: &ChannelRecord) -> Result<(), MetricsError>;
}

/// Gauge families for bonded channel measurements.
#[derive(Clone)]
pub struct ChannelMetrics {
    registry: Registry,
    pwr: GaugeVec,
    snr: GaugeVec,
    corrected: GaugeVec,
    uncorrected: GaugeVec,
    upstream_symb_rate: GaugeVec,
    upstream_pwr: GaugeVec,
}

impl ChannelMetrics {
    /// Creates a fresh registry and registers all gauge families in it.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Prometheus`] if a family cannot be created or
    /// registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let pwr = register(&registry, GaugeFamily::Pwr)?;
        let snr = register(&registry, GaugeFamily::Snr)?;
        let corrected = register(&registry, GaugeFamily::Corrected)?;
        let uncorrected = register(&registry, GaugeFamily::Uncorrected)?;
        let upstream_symb_rate = register(&registry, GaugeFamily::UpstreamSymbRate)?;
        let upstream_pwr = register(&registry, GaugeFamily::UpstreamPwr)?;

        Ok(Self {
            registry,
            pwr,
            snr,
            corrected,
            uncorrected,
            upstream_symb_rate,
            upstream_pwr,
        })
    }

    /// Encodes every family in the Prometheus text exposition format.
    ///
    /// Families with no series yet are omitted by the encoder.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError`] if encoding fails.
    pub fn gather(&self) -> Result<String, MetricsError> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    const fn family(&self, family: GaugeFamily) -> &GaugeVec {
        match family {
            GaugeFamily::Pwr => &self.pwr,
            GaugeFamily::Snr => &self.snr,
            GaugeFamily::Corrected => &self.corrected,
            GaugeFamily::Uncorrected => &self.uncorrected,
            GaugeFamily::UpstreamSymbRate => &self.upstream_symb_rate,
            GaugeFamily::UpstreamPwr => &self.upstream_pwr,
        }
    }

    fn gauge(&self, family: GaugeFamily, key: &LabelKey<'_>) -> Result<Gauge, MetricsError> {
        Ok(self
            .family(family)
            .get_metric_with_label_values(&key.values())?)
    }

    fn publish_downstream(&self, ch: &DownstreamChannel) -> Result<(), MetricsError> {
        let key = ch.label_key();
        let pwr = self.gauge(GaugeFamily::Pwr, &key)?;
        let snr = self.gauge(GaugeFamily::Snr, &key)?;
        let corrected = self.gauge(GaugeFamily::Corrected, &key)?;
        let uncorrected = self.gauge(GaugeFamily::Uncorrected, &key)?;

        pwr.set(ch.power_dbmv);
        snr.set(ch.snr_db);
        corrected.set(ch.corrected_errors);
        uncorrected.set(ch.uncorrected_errors);

        log::debug!(
            "Found {} {} {}: PWR={}, SNR={}, Corrected={}, Uncorrected={}",
            ch.modulation,
            ch.channel_id,
            ch.frequency,
            ch.power_dbmv,
            ch.snr_db,
            ch.corrected_errors,
            ch.uncorrected_errors,
        );
        Ok(())
    }

    fn publish_upstream(&self, ch: &UpstreamChannel) -> Result<(), MetricsError> {
        let key = ch.label_key();
        let symbol_rate = self.gauge(GaugeFamily::UpstreamSymbRate, &key)?;
        let pwr = self.gauge(GaugeFamily::UpstreamPwr, &key)?;

        symbol_rate.set(ch.symbol_rate);
        pwr.set(ch.power_dbmv);

        log::debug!(
            "Found {} {} {}: SymbolRate={}, PWR={}",
            ch.channel_type,
            ch.channel_id,
            ch.frequency,
            ch.symbol_rate,
            ch.power_dbmv,
        );
        Ok(())
    }
}

impl ChannelSink for ChannelMetrics {
    fn publish(&self, record: &ChannelRecord) -> Result<(), MetricsError> {
        match record {
            ChannelRecord::Downstream(ch) => self.publish_downstream(ch),
            ChannelRecord::Upstream(ch) => self.publish_upstream(ch),
        }
    }
}

fn register(registry: &Registry, family: GaugeFamily) -> Result<GaugeVec, MetricsError> {
    let gauge = GaugeVec::new(
        Opts::new(family.to_string(), family.help()).namespace(NAMESPACE),
        &family.section().label_names(),
    )?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}
