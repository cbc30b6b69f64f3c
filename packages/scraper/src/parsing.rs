//! Channel record parser.
//!
//! Maps the cells of a data row onto a [`DownstreamChannel`] or
//! [`UpstreamChannel`]. Rows too short for their section are structural
//! (spacers, captions) and parse to `Ok(None)`. A measurement cell that is
//! not a number voids the whole row.
//!
//! Downstream columns:
//!
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 |
//! |---|---|---|---|---|---|---|---|---|
//! | channel | lock status | modulation | channel id | freq | power | SNR | corrected | uncorrected |
//!
//! Upstream columns:
//!
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 |
//! |---|---|---|---|---|---|---|
//! | channel | lock status | channel type | channel id | freq | symbol rate | power |

use std::num::ParseFloatError;

use moto_exporter_channel_models::{ChannelRecord, ChannelSection, DownstreamChannel, UpstreamChannel};

use crate::html_table::TableRow;

/// A data row that could not be turned into a record.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// A measurement cell did not hold a number.
    #[error("invalid {field} value '{value}': {source}")]
    FieldCoercion {
        /// Name of the measurement.
        field: &'static str,
        /// The trimmed cell text.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: ParseFloatError,
    },
}

/// Parses a data row for `section`.
///
/// # Errors
///
/// Returns [`RowError::FieldCoercion`] if a measurement cell is not numeric.
pub fn parse_row(
    section: ChannelSection,
    row: &TableRow,
) -> Result<Option<ChannelRecord>, RowError> {
    Ok(match section {
        ChannelSection::Downstream => parse_downstream(row)?.map(ChannelRecord::Downstream),
        ChannelSection::Upstream => parse_upstream(row)?.map(ChannelRecord::Upstream),
    })
}

/// Parses a row of the downstream table.
///
/// # Errors
///
/// Returns [`RowError::FieldCoercion`] if power, SNR, or either error count
/// is not numeric.
pub fn parse_downstream(row: &TableRow) -> Result<Option<DownstreamChannel>, RowError> {
    if row.len() < ChannelSection::Downstream.min_cells() {
        return Ok(None);
    }

    Ok(Some(DownstreamChannel {
        modulation: text(row, 2).to_owned(),
        channel_id: text(row, 3).to_owned(),
        frequency: text(row, 4).to_owned(),
        power_dbmv: measurement(row, 5, "power")?,
        snr_db: measurement(row, 6, "snr")?,
        corrected_errors: measurement(row, 7, "corrected")?,
        uncorrected_errors: measurement(row, 8, "uncorrected")?,
    }))
}

/// Parses a row of the upstream table.
///
/// # Errors
///
/// Returns [`RowError::FieldCoercion`] if symbol rate or power is not
/// numeric.
pub fn parse_upstream(row: &TableRow) -> Result<Option<UpstreamChannel>, RowError> {
    if row.len() < ChannelSection::Upstream.min_cells() {
        return Ok(None);
    }

    Ok(Some(UpstreamChannel {
        channel_type: text(row, 2).to_owned(),
        channel_id: text(row, 3).to_owned(),
        frequency: text(row, 4).to_owned(),
        symbol_rate: measurement(row, 5, "symbol_rate")?,
        power_dbmv: measurement(row, 6, "power")?,
    }))
}

fn text(row: &TableRow, index: usize) -> &str {
    row.cell(index).unwrap_or_default()
}

fn measurement(row: &TableRow, index: usize, field: &'static str) -> Result<f64, RowError> {
    let value = text(row, index);
    value.parse().map_err(|source| RowError::FieldCoercion {
        field,
        value: value.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> TableRow {
        cells.iter().copied().collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < f64::EPSILON
    }

    #[test]
    fn parses_downstream_row() {
        let ch = parse_downstream(&row(&[
            "1",
            "Locked",
            "QAM256",
            "5",
            "549000000 Hz",
            "6.3",
            "38.2",
            "150",
            "12",
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(ch.modulation, "QAM256");
        assert_eq!(ch.channel_id, "5");
        assert_eq!(ch.frequency, "549000000 Hz");
        assert!(approx(ch.power_dbmv, 6.3));
        assert!(approx(ch.snr_db, 38.2));
        assert!(approx(ch.corrected_errors, 150.0));
        assert!(approx(ch.uncorrected_errors, 12.0));
    }

    #[test]
    fn parses_upstream_row() {
        let ch = parse_upstream(&row(&[
            "2",
            "Locked",
            "ATDMA",
            "3",
            "23700000 Hz",
            "5120",
            "45.0",
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(ch.channel_type, "ATDMA");
        assert_eq!(ch.channel_id, "3");
        assert_eq!(ch.frequency, "23700000 Hz");
        assert!(approx(ch.symbol_rate, 5120.0));
        assert!(approx(ch.power_dbmv, 45.0));
    }

    #[test]
    fn cells_are_trimmed_before_use() {
        let ch = parse_downstream(&row(&[
            " 1 ",
            "Locked",
            "\n QAM256 ",
            " 5",
            " 549000000 Hz\t",
            " -1.5 ",
            "40 ",
            " 0",
            "0 ",
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(ch.modulation, "QAM256");
        assert_eq!(ch.channel_id, "5");
        assert_eq!(ch.frequency, "549000000 Hz");
        assert!(approx(ch.power_dbmv, -1.5));
    }

    #[test]
    fn extra_cells_are_ignored() {
        let ch = parse_upstream(&row(&[
            "1", "Locked", "OFDMA", "41", "36000000 Hz", "1000", "38.0", "extra",
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(ch.channel_type, "OFDMA");
    }

    #[test]
    fn short_rows_yield_nothing() {
        let eight = row(&["1", "Locked", "QAM256", "5", "549000000 Hz", "6.3", "38.2", "150"]);
        assert!(parse_downstream(&eight).unwrap().is_none());

        let six = row(&["1", "Locked", "ATDMA", "3", "23700000 Hz", "5120"]);
        assert!(parse_upstream(&six).unwrap().is_none());

        assert!(parse_row(ChannelSection::Downstream, &TableRow::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn non_numeric_measurement_voids_the_row() {
        let err = parse_downstream(&row(&[
            "1",
            "Locked",
            "QAM256",
            "5",
            "549000000 Hz",
            "N/A",
            "38.2",
            "150",
            "12",
        ]))
        .unwrap_err();

        let RowError::FieldCoercion { field, value, .. } = err;
        assert_eq!(field, "power");
        assert_eq!(value, "N/A");
    }

    #[test]
    fn unit_suffixed_measurement_is_rejected() {
        let err = parse_upstream(&row(&[
            "1",
            "Locked",
            "ATDMA",
            "3",
            "23700000 Hz",
            "5120 Ksym/sec",
            "45.0",
        ]))
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid symbol_rate value '5120 Ksym/sec': invalid float literal"
        );
    }

    #[test]
    fn parse_row_dispatches_on_section() {
        let cells = row(&["2", "Locked", "ATDMA", "3", "23700000 Hz", "5120", "45.0"]);

        let up = parse_row(ChannelSection::Upstream, &cells).unwrap().unwrap();
        assert_eq!(up.section(), ChannelSection::Upstream);

        // Seven cells are too few for a downstream row.
        assert!(parse_row(ChannelSection::Downstream, &cells).unwrap().is_none());
    }
}
