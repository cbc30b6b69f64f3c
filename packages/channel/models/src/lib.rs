#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bonded channel record types for the cable modem exporter.
//!
//! A modem status page lists its downstream and upstream bonded channels in
//! two tables. Each data row becomes either a [`DownstreamChannel`] or an
//! [`UpstreamChannel`], wrapped in a [`ChannelRecord`] so callers can handle
//! both shapes uniformly. Records only live for the duration of one scrape;
//! their [`LabelKey`] addresses the gauge series they are projected onto.

use strum_macros::Display;

/// Which of the two bonded channel tables a row came from.
///
/// Determines the expected column layout and which gauge families apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ChannelSection {
    /// Modem-bound channels (power, SNR, codeword error counts)
    Downstream,
    /// Head-end-bound channels (symbol rate, transmit power)
    Upstream,
}

impl ChannelSection {
    /// Returns every section in scrape order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Downstream, Self::Upstream]
    }

    /// Returns the exact caption text that identifies this section's table.
    #[must_use]
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Downstream => "Downstream Bonded Channels",
            Self::Upstream => "Upstream Bonded Channels",
        }
    }

    /// Returns the minimum number of cells a row needs to be parsed as a
    /// channel in this section.
    #[must_use]
    pub const fn min_cells(self) -> usize {
        match self {
            Self::Downstream => 9,
            Self::Upstream => 7,
        }
    }

    /// Returns the label names used by every gauge family in this section,
    /// in the same order as [`LabelKey::values`].
    #[must_use]
    pub const fn label_names(self) -> [&'static str; 3] {
        match self {
            Self::Downstream => ["modulation", "channel_id", "freq"],
            Self::Upstream => ["channel_type", "channel_id", "freq"],
        }
    }
}

/// One row of the "Downstream Bonded Channels" table.
#[derive(Debug, Clone, PartialEq)]
pub struct DownstreamChannel {
    /// Modulation scheme (e.g. `QAM256`, `OFDM PLC`)
    pub modulation: String,
    /// Channel identifier as reported by the modem
    pub channel_id: String,
    /// Centre frequency, unit-bearing text kept verbatim (e.g. `549000000 Hz`)
    pub frequency: String,
    /// Receive power in dBmV
    pub power_dbmv: f64,
    /// Signal-to-noise ratio in dB
    pub snr_db: f64,
    /// Codewords corrected by FEC
    pub corrected_errors: f64,
    /// Codewords FEC could not correct
    pub uncorrected_errors: f64,
}

/// One row of the "Upstream Bonded Channels" table.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamChannel {
    /// Channel type (e.g. `ATDMA`, `OFDMA`)
    pub channel_type: String,
    /// Channel identifier as reported by the modem
    pub channel_id: String,
    /// Centre frequency, unit-bearing text kept verbatim
    pub frequency: String,
    /// Symbol rate in ksym/s
    pub symbol_rate: f64,
    /// Transmit power in dBmV
    pub power_dbmv: f64,
}

/// A parsed channel row from either table.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelRecord {
    /// A downstream bonded channel
    Downstream(DownstreamChannel),
    /// An upstream bonded channel
    Upstream(UpstreamChannel),
}

impl ChannelRecord {
    /// Returns the section this record was parsed from.
    #[must_use]
    pub const fn section(&self) -> ChannelSection {
        match self {
            Self::Downstream(_) => ChannelSection::Downstream,
            Self::Upstream(_) => ChannelSection::Upstream,
        }
    }

    /// Returns the label tuple addressing this record's gauge series.
    #[must_use]
    pub fn label_key(&self) -> LabelKey<'_> {
        match self {
            Self::Downstream(ch) => ch.label_key(),
            Self::Upstream(ch) => ch.label_key(),
        }
    }
}

impl DownstreamChannel {
    /// Returns `(modulation, channel_id, freq)`.
    #[must_use]
    pub fn label_key(&self) -> LabelKey<'_> {
        LabelKey {
            group: &self.modulation,
            channel_id: &self.channel_id,
            freq: &self.frequency,
        }
    }
}

impl UpstreamChannel {
    /// Returns `(channel_type, channel_id, freq)`.
    #[must_use]
    pub fn label_key(&self) -> LabelKey<'_> {
        LabelKey {
            group: &self.channel_type,
            channel_id: &self.channel_id,
            freq: &self.frequency,
        }
    }
}

/// Label values addressing one gauge series within a family.
///
/// `group` is the modulation for downstream channels and the channel type
/// for upstream channels. Two records with equal keys write the same series,
/// so the later one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelKey<'a> {
    /// Modulation (downstream) or channel type (upstream)
    pub group: &'a str,
    /// Channel identifier
    pub channel_id: &'a str,
    /// Verbatim frequency text
    pub freq: &'a str,
}

impl<'a> LabelKey<'a> {
    /// Returns the label values in [`ChannelSection::label_names`] order.
    #[must_use]
    pub const fn values(&self) -> [&'a str; 3] {
        [self.group, self.channel_id, self.freq]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downstream() -> DownstreamChannel {
        DownstreamChannel {
            modulation: "QAM256".to_string(),
            channel_id: "5".to_string(),
            frequency: "549000000 Hz".to_string(),
            power_dbmv: 6.3,
            snr_db: 38.2,
            corrected_errors: 150.0,
            uncorrected_errors: 12.0,
        }
    }

    #[test]
    fn captions_match_modem_markup() {
        assert_eq!(
            ChannelSection::Downstream.caption(),
            "Downstream Bonded Channels"
        );
        assert_eq!(ChannelSection::Upstream.caption(), "Upstream Bonded Channels");
    }

    #[test]
    fn section_names_display_as_variant_names() {
        assert_eq!(ChannelSection::Downstream.to_string(), "Downstream");
        assert_eq!(ChannelSection::Upstream.to_string(), "Upstream");
    }

    #[test]
    fn downstream_label_key_uses_modulation() {
        let record = ChannelRecord::Downstream(downstream());
        assert_eq!(record.section(), ChannelSection::Downstream);
        assert_eq!(record.label_key().values(), ["QAM256", "5", "549000000 Hz"]);
    }

    #[test]
    fn upstream_label_key_uses_channel_type() {
        let record = ChannelRecord::Upstream(UpstreamChannel {
            channel_type: "ATDMA".to_string(),
            channel_id: "3".to_string(),
            frequency: "23700000 Hz".to_string(),
            symbol_rate: 5120.0,
            power_dbmv: 45.0,
        });
        assert_eq!(record.section(), ChannelSection::Upstream);
        assert_eq!(record.label_key().values(), ["ATDMA", "3", "23700000 Hz"]);
    }

    #[test]
    fn duplicate_channels_share_a_label_key() {
        let a = downstream();
        let mut b = downstream();
        b.power_dbmv = 1.0;
        assert_eq!(a.label_key(), b.label_key());
    }
}
