//! CSV export
//!
//! Amounts are written as plain decimals in kronor (`1234.50`) without a
//! currency symbol, so spreadsheets read them as numbers.

use std::io::Write;

use crate::error::{HushallError, HushallResult};
use crate::models::{EstimateSource, Holiday, HolidaySource, Money};
use crate::reports::AccountProjectionReport;
use crate::services::MonthReport;

const ACCOUNTS_HEADER: [&str; 6] = [
    "Month",
    "Account",
    "Starting Balance",
    "Starting Source",
    "Final Balance",
    "Estimated Final Balance",
];

const HOLIDAYS_HEADER: [&str; 3] = ["Date", "Name", "Source"];

const PROJECTION_HEADER: [&str; 5] = [
    "Account",
    "Month",
    "Starting Balance",
    "Starting Source",
    "Estimated Final Balance",
];

fn writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out)
}

fn finish<W: Write>(mut csv: csv::Writer<W>) -> HushallResult<()> {
    csv.flush()
        .map_err(|e| HushallError::Export(format!("CSV flush error: {}", e)))
}

/// `Money` as a bare decimal string
pub fn format_amount(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, amount.kronor().abs(), amount.ore_part())
}

fn source_label(source: EstimateSource) -> &'static str {
    match source {
        EstimateSource::Actual => "actual",
        EstimateSource::PreviousMonth => "previous_month",
        EstimateSource::Reconstructed => "reconstructed",
        EstimateSource::Unavailable => "unavailable",
    }
}

fn holiday_source_label(source: HolidaySource) -> &'static str {
    match source {
        HolidaySource::Fixed => "fixed",
        HolidaySource::EasterRelative => "easter_relative",
        HolidaySource::Moving => "moving",
        HolidaySource::Custom => "custom",
    }
}

/// Export a month's per-account balances
pub fn export_month_report_csv<W: Write>(report: &MonthReport, out: W) -> HushallResult<()> {
    let mut csv = writer(out);
    csv.write_record(ACCOUNTS_HEADER)?;

    let month = report.key.to_string();
    for summary in &report.accounts {
        csv.write_record(&[
            month.clone(),
            summary.account.to_string(),
            format_amount(summary.starting_balance.amount),
            source_label(summary.starting_balance.source).to_string(),
            format_amount(summary.final_balance),
            format_amount(summary.estimated_final_balance),
        ])?;
    }

    finish(csv)
}

/// Export a list of holidays
pub fn export_holidays_csv<W: Write>(holidays: &[Holiday], out: W) -> HushallResult<()> {
    let mut csv = writer(out);
    csv.write_record(HOLIDAYS_HEADER)?;

    for holiday in holidays {
        csv.write_record(&[
            holiday.date.format("%Y-%m-%d").to_string(),
            holiday.name.clone(),
            holiday_source_label(holiday.source).to_string(),
        ])?;
    }

    finish(csv)
}

/// Export every row of a projection report
pub fn export_projection_csv<W: Write>(
    report: &AccountProjectionReport,
    out: W,
) -> HushallResult<()> {
    let mut csv = writer(out);
    csv.write_record(PROJECTION_HEADER)?;

    for projection in &report.accounts {
        for row in &projection.rows {
            csv.write_record(&[
                projection.account.to_string(),
                row.month.to_string(),
                format_amount(row.starting_balance.amount),
                source_label(row.starting_balance.source).to_string(),
                format_amount(row.estimated_final_balance),
            ])?;
        }
    }

    finish(csv)
}
