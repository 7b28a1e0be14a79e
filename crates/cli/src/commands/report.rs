//! `report`: one dry-run batch written as a flat CSV, one row per position.

use std::fs::File;
use std::io;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use options_tracker_core::{Position, ReportField, ReportRow, TrackerConfig};
use options_tracker_manager::run_batch;

use super::connect;

#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Output file, or `-` for stdout (defaults to `report.path`)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Comma-separated column headers (defaults to `report.fields`)
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

pub async fn run_report(args: ReportArgs, mut config: TrackerConfig) -> Result<()> {
    // Reporting never sends orders.
    config.orders.place_orders = false;
    let gateway = connect(&config)?;

    let report = run_batch(&gateway, &config, Local::now().naive_local()).await?;

    let headers = args.fields.unwrap_or_else(|| config.report.fields.clone());
    let output = args.output.unwrap_or_else(|| config.report.path.clone());

    let rows = if output == "-" {
        write_report(io::stdout().lock(), &headers, report.positions())?
    } else {
        let file =
            File::create(&output).with_context(|| format!("Failed to create {output}"))?;
        write_report(file, &headers, report.positions())?
    };

    tracing::info!(rows, output = %output, "Report written");
    Ok(())
}

/// Writes a header row followed by one row per position.
///
/// Headers that name no report field, and fields with no value for a
/// position, produce empty cells. Returns the number of data rows.
pub fn write_report<'a, W: io::Write>(
    writer: W,
    headers: &[String],
    positions: impl IntoIterator<Item = &'a Position>,
) -> Result<usize> {
    let columns: Vec<Option<ReportField>> = headers
        .iter()
        .map(|header| ReportField::from_header(header))
        .collect();
    let fields = ReportField::parse_header(headers);

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(headers)
        .context("Failed to write report header")?;

    let mut rows = 0;
    for position in positions {
        let row = ReportRow::from_position(position, &fields);
        csv.write_record(row.cells(&columns))
            .with_context(|| format!("Failed to write report row for conid {}", position.conid()))?;
        rows += 1;
    }

    csv.flush().context("Failed to flush report")?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use options_tracker_core::{ContractDetail, FlatTargetRate, PositionRecord, PricingContext};
    use rust_decimal_macros::dec;

    fn short_put() -> Position {
        let policy = FlatTargetRate::default();
        let as_of = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_time(NaiveTime::MIN);
        let ctx = PricingContext::new(as_of, &policy);

        let mut position = Position::from_record(&PositionRecord {
            conid: Some(700),
            asset_class: Some("OPT".to_string()),
            currency: Some("USD".to_string()),
            contract_desc: Some("XYZ APR26 100 P".to_string()),
            mkt_price: None,
            position: Some(dec!(-2)),
            avg_price: Some(dec!(650)),
        })
        .unwrap()
        .unwrap();
        position
            .enrich(&ContractDetail {
                conid: Some(700),
                ticker: Some("XYZ".to_string()),
                expiry: Some("20260401".to_string()),
                strike: Some(dec!(100)),
                put_or_call: Some("P".to_string()),
                multiplier: Some(dec!(100)),
                und_conid: Some(9),
            })
            .unwrap();
        position.apply_prices(dec!(7), dec!(95), &ctx).unwrap();
        position
    }

    fn render(headers: &[&str], positions: &[Position]) -> String {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let mut out = Vec::new();
        write_report(&mut out, &headers, positions).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn writes_selected_columns_in_header_order() {
        let csv = render(&["ticker", "conid", "dte", "target"], &[short_put()]);

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ticker,conid,dte,target"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("XYZ,700,30,"), "{row}");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn unknown_headers_are_blank() {
        let csv = render(&["conid", "notes", "undConid"], &[short_put()]);

        assert_eq!(csv, "conid,notes,undConid\n700,,9\n");
    }

    #[test]
    fn unpriced_fields_are_blank() {
        let mut stock = Position::from_record(&PositionRecord {
            conid: Some(9),
            asset_class: Some("STK".to_string()),
            currency: Some("USD".to_string()),
            contract_desc: Some("XYZ".to_string()),
            mkt_price: None,
            position: Some(dec!(100)),
            avg_price: Some(dec!(90)),
        })
        .unwrap()
        .unwrap();
        stock
            .enrich(&ContractDetail {
                ticker: Some("XYZ".to_string()),
                ..ContractDetail::default()
            })
            .unwrap();

        let csv = render(&["conid", "strike", "dte", "size"], &[stock]);

        assert_eq!(csv, "conid,strike,dte,size\n9,,,100\n");
    }

    #[test]
    fn empty_batch_writes_header_only() {
        let headers = vec!["conid".to_string()];
        let mut out = Vec::new();

        let rows = write_report(&mut out, &headers, std::iter::empty()).unwrap();

        assert_eq!(rows, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "conid\n");
    }
}
