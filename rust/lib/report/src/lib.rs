//! Spreadsheet export of search results.
//!
//! Filtered loads flatten into a single worksheet: a fixed header row
//! naming the report columns, then one row per load with display-ready
//! values (dd/MM/yyyy dates, uppercased material, operator and shift).
//! The workbook is built in memory; callers decide where the bytes go.

use celulog_core::{datetime, DateTimeError, Load};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use thiserror::Error;

/// File name offered for a report download.
pub const DEFAULT_EXPORT_FILE: &str = "export.xlsx";

/// Report column headers, in worksheet order.
pub const COLUMNS: [&str; 7] = [
    "material",
    "pesoMedio",
    "unidadeMedida",
    "data",
    "hora",
    "operador",
    "turno",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("workbook error: {0}")]
    Workbook(#[from] XlsxError),
    #[error(transparent)]
    DateTime(#[from] DateTimeError),
}

/// One worksheet row, display-formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub material: String,
    pub average_weight: f64,
    pub unit: String,
    pub date: String,
    pub time: String,
    pub operator: String,
    pub shift: String,
}

impl ExportRow {
    /// Flatten a load for the report. Material, operator and shift are
    /// uppercased; the timestamp splits into local date and time; the
    /// unit is written as stored.
    pub fn from_load(load: &Load) -> Result<Self, DateTimeError> {
        Ok(Self {
            material: load.material.to_uppercase(),
            average_weight: load.average_weight,
            unit: load.unit.clone(),
            date: datetime::local_date(&load.created_at)?,
            time: datetime::local_time(&load.created_at)?,
            operator: load.operator.to_uppercase(),
            shift: load.shift.to_uppercase(),
        })
    }
}

/// Serialize rows into an in-memory `.xlsx` workbook.
pub fn write_workbook(rows: &[ExportRow]) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, row.material.as_str())?;
        worksheet.write_number(r, 1, row.average_weight)?;
        worksheet.write_string(r, 2, row.unit.as_str())?;
        worksheet.write_string(r, 3, row.date.as_str())?;
        worksheet.write_string(r, 4, row.time.as_str())?;
        worksheet.write_string(r, 5, row.operator.as_str())?;
        worksheet.write_string(r, 6, row.shift.as_str())?;
    }

    workbook.push_worksheet(worksheet);
    Ok(workbook.save_to_buffer()?)
}

/// Format and serialize loads in one step.
pub fn export_loads(loads: &[Load]) -> Result<Vec<u8>, ReportError> {
    let rows = loads
        .iter()
        .map(ExportRow::from_load)
        .collect::<Result<Vec<_>, _>>()?;
    write_workbook(&rows)
}
