//! Writing company records to spreadsheet, CSV or JSON files.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::{debug, info};

use crate::app::{DirscoutError, Result};
use crate::domain::CompanyRecord;

pub const SHEET_NAME: &str = "Sheet1";

/// Output format, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(DirscoutError::Export(format!(
                "Unsupported export extension {:?} (expected xlsx, csv or json)",
                other
            ))),
        }
    }
}

/// Column names for a set of records: scores appear only once something was scored
pub fn columns(records: &[CompanyRecord]) -> Vec<&'static str> {
    let mut columns = vec!["name", "url", "linkedin"];
    if records.iter().any(|r| r.match_score.is_some()) {
        columns.push("match_score");
    }
    if records.iter().any(|r| r.reasoning.is_some()) {
        columns.push("reasoning");
    }
    columns
}

enum Cell<'a> {
    Text(&'a str),
    Number(u8),
    Empty,
}

fn cell<'a>(record: &'a CompanyRecord, column: &str) -> Cell<'a> {
    match column {
        "name" => Cell::Text(&record.name),
        "url" => Cell::Text(&record.url),
        "linkedin" => Cell::Text(&record.linkedin),
        "match_score" => record.match_score.map_or(Cell::Empty, Cell::Number),
        "reasoning" => record.reasoning.as_deref().map_or(Cell::Empty, Cell::Text),
        _ => Cell::Empty,
    }
}

/// Write records to `path` in the format its extension names
pub fn write(path: &Path, records: &[CompanyRecord]) -> Result<()> {
    debug!("Exporting {} companies to {}", records.len(), path.display());

    match ExportFormat::from_path(path)? {
        ExportFormat::Xlsx => std::fs::write(path, to_xlsx(records)?)?,
        ExportFormat::Csv => write_csv(File::create(path)?, records)?,
        ExportFormat::Json => {
            let mut file = File::create(path)?;
            file.write_all(serde_json::to_string_pretty(records)?.as_bytes())?;
        }
    }

    info!("Exported {} companies to {}", records.len(), path.display());
    Ok(())
}

/// Single-sheet workbook with a header row and one row per company
pub fn to_xlsx(records: &[CompanyRecord]) -> Result<Vec<u8>> {
    let columns = columns(records);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }

    for (row, record) in records.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, name) in columns.iter().enumerate() {
            let col = col as u16;
            match cell(record, name) {
                Cell::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row, col, f64::from(n))?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn write_csv<W: Write>(writer: W, records: &[CompanyRecord]) -> Result<()> {
    let columns = columns(records);
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&columns)?;

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|name| match cell(record, name) {
                Cell::Text(text) => text.to_string(),
                Cell::Number(n) => n.to_string(),
                Cell::Empty => String::new(),
            })
            .collect();
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// File name for a search export, e.g. `companies_software_united-states.xlsx`
pub fn default_file_name(industry: &str, country: &str) -> String {
    format!("companies_{}_{}.xlsx", slug(industry), slug(country))
}

fn slug(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
