//! Spreadsheet export (`deals_parallel_II_<timestamp>.xlsx`).

use std::path::Path;

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};

use crate::error::{DealFinderError, Result};
use crate::types::Deal;

const SHEET_NAME: &str = "Deals";

/// Column headers and widths, in output order.
const COLUMNS: &[(&str, f64)] = &[
    ("Date Announced", 14.0),
    ("Target", 30.0),
    ("Acquirer / Partner", 30.0),
    ("Stage", 14.0),
    ("Therapeutic Area", 26.0),
    ("Asset / Focus", 26.0),
    ("Mechanism of Action", 22.0),
    ("Deal Type", 18.0),
    ("Upfront (USD M)", 15.0),
    ("Contingent (USD M)", 17.0),
    ("Total Value (USD M)", 17.0),
    ("Geography", 12.0),
    ("Source URL", 40.0),
    ("Key Evidence", 60.0),
    ("Confidence", 11.0),
    ("Timestamp (UTC)", 26.0),
];

/// Writes one row per deal below a frozen, filterable header row.
#[derive(Debug, Default)]
pub struct ExcelWriter;

impl ExcelWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, deals: &[Deal], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DealFinderError::io(parent, e))?;
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        fill_sheet(worksheet, deals)?;
        workbook.save(path)?;

        tracing::info!(path = %path.display(), rows = deals.len(), "Spreadsheet written");
        Ok(())
    }
}

fn fill_sheet(sheet: &mut Worksheet, deals: &[Deal]) -> std::result::Result<(), XlsxError> {
    sheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    let date = Format::new().set_num_format("yyyy-mm-dd");
    let money = Format::new().set_num_format("#,##0.00");

    for (col, (title, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, *width)?;
    }

    for (i, deal) in deals.iter().enumerate() {
        let row = (i + 1) as u32;

        let announced = &deal.date_announced;
        match ExcelDateTime::from_ymd(
            announced.year() as u16,
            announced.month() as u8,
            announced.day() as u8,
        ) {
            Ok(cell) => sheet.write_datetime_with_format(row, 0, &cell, &date)?,
            // Years Excel cannot represent stay readable as text.
            Err(_) => sheet.write_string(row, 0, announced.to_string())?,
        };

        sheet.write_string(row, 1, &deal.target)?;
        sheet.write_string(row, 2, &deal.acquirer)?;
        sheet.write_string(row, 3, &deal.stage)?;
        sheet.write_string(row, 4, &deal.therapeutic_area)?;
        sheet.write_string(row, 5, &deal.asset_focus)?;
        write_optional(sheet, row, 6, deal.mechanism_of_action.as_deref())?;
        sheet.write_string(row, 7, deal.deal_type_detailed.as_str())?;
        write_money(sheet, row, 8, deal.upfront_value_usd, &money)?;
        write_money(sheet, row, 9, deal.contingent_payment_usd, &money)?;
        write_money(sheet, row, 10, deal.total_deal_value_usd, &money)?;
        write_optional(sheet, row, 11, deal.geography.as_deref())?;
        sheet.write_string(row, 12, &deal.source_url)?;
        write_optional(sheet, row, 13, deal.key_evidence.as_deref())?;
        sheet.write_string(row, 14, deal.confidence.to_string())?;
        sheet.write_string(row, 15, deal.timestamp_utc.to_rfc3339())?;
    }

    sheet.set_freeze_panes(1, 0)?;
    if !deals.is_empty() {
        sheet.autofilter(0, 0, deals.len() as u32, (COLUMNS.len() - 1) as u16)?;
    }
    Ok(())
}

fn write_optional(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> std::result::Result<(), XlsxError> {
    if let Some(value) = value {
        sheet.write_string(row, col, value)?;
    }
    Ok(())
}

/// Excel stores numbers as doubles; the exact decimal lives in the JSON summary.
fn write_money(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<Decimal>,
    format: &Format,
) -> std::result::Result<(), XlsxError> {
    match value.and_then(|d| d.to_f64()) {
        Some(number) => {
            sheet.write_number_with_format(row, col, number, format)?;
        }
        None => {
            if let Some(d) = value {
                sheet.write_string(row, col, d.to_string())?;
            }
        }
    }
    Ok(())
}
