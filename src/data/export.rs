use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use super::model::{CellValue, Dataset};

/// Filename used when the user leaves the field blank.
pub const DEFAULT_FILENAME: &str = "download";

const SHEET_NAME: &str = "Sheet1";
const XLSX_MAX_ROWS: usize = 1_048_576;
const XLSX_MAX_COLS: usize = 16_384;

// ---------------------------------------------------------------------------
// Formats and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Xlsx => write!(f, "Excel (.xlsx)"),
            ExportFormat::Csv => write!(f, "CSV (.csv)"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid filename '{0}': must not contain path separators")]
    InvalidFilename(String),
    #[error("{0} columns exceed the worksheet limit")]
    TooManyColumns(usize),
    #[error("{0} rows exceed the worksheet limit")]
    TooManyRows(usize),
    #[error("writing file: {0}")]
    Io(#[from] std::io::Error),
    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("writing workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

// ---------------------------------------------------------------------------
// Entry-point
// ---------------------------------------------------------------------------

/// Resolve the user's filename input, falling back to `default` when blank.
pub fn resolve_filename(input: &str, default: &str) -> Result<String, ExportError> {
    let name = input.trim();
    let name = if name.is_empty() { default.trim() } else { name };
    let name = if name.is_empty() { DEFAULT_FILENAME } else { name };
    if name.contains(['/', '\\']) {
        return Err(ExportError::InvalidFilename(name.to_string()));
    }
    Ok(name.to_string())
}

/// Write `dataset` to `<dir>/<filename>.<ext>` and return the written path.
///
/// The workbook or CSV is fully serialized in memory first, so a failure
/// never leaves a half-written file behind from this call.
pub fn export_dataset(
    dataset: &Dataset,
    dir: &Path,
    filename: &str,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let name = resolve_filename(filename, DEFAULT_FILENAME)?;
    let path = dir.join(format!("{name}.{}", format.extension()));

    let bytes = match format {
        ExportFormat::Xlsx => to_xlsx_bytes(dataset)?,
        ExportFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(dataset, &mut buf)?;
            buf
        }
    };
    std::fs::write(&path, bytes)?;

    log::info!(
        "Exported {} rows x {} columns to {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(path)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header record followed by one record per row; null cells are empty.
pub fn write_csv<W: Write>(dataset: &Dataset, out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    if dataset.columns().is_empty() {
        writer.flush()?;
        return Ok(());
    }

    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record(dataset.columns().iter().map(|col| match row.get(col) {
            None | Some(CellValue::Null) => String::new(),
            Some(value) => value.to_string(),
        }))?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

/// One worksheet named `Sheet1`: bold header row, then data rows.
/// Null cells are left blank.
pub fn to_xlsx_bytes(dataset: &Dataset) -> Result<Vec<u8>, ExportError> {
    let n_cols = dataset.columns().len();
    if n_cols > XLSX_MAX_COLS {
        return Err(ExportError::TooManyColumns(n_cols));
    }
    // +1 for the header row.
    if dataset.len() + 1 > XLSX_MAX_ROWS {
        return Err(ExportError::TooManyRows(dataset.len()));
    }

    let mut workbook = Workbook::new();
    let header_fmt = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col_idx, col) in (0u16..).zip(dataset.columns()) {
        sheet.write_string_with_format(0, col_idx, col, &header_fmt)?;
    }

    for (row_idx, row) in (1u32..).zip(dataset.rows()) {
        for (col_idx, col) in (0u16..).zip(dataset.columns()) {
            match row.get(col) {
                None | Some(CellValue::Null) => {}
                Some(CellValue::String(s)) => {
                    sheet.write_string(row_idx, col_idx, s)?;
                }
                Some(CellValue::Integer(i)) => {
                    sheet.write_number(row_idx, col_idx, *i as f64)?;
                }
                // Excel has no NaN / infinity; keep their text.
                Some(CellValue::Float(f)) if !f.is_finite() => {
                    sheet.write_string(row_idx, col_idx, f.to_string())?;
                }
                Some(CellValue::Float(f)) => {
                    sheet.write_number(row_idx, col_idx, *f)?;
                }
                Some(CellValue::Bool(b)) => {
                    sheet.write_boolean(row_idx, col_idx, *b)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx};

    use super::*;
    use crate::data::model::Row;

    fn sample() -> Dataset {
        let rows = vec![
            [
                ("NAME", CellValue::String("ann, jr".into())),
                ("AGE", CellValue::Integer(40)),
                ("OK", CellValue::Null),
            ]
            .into_iter()
            .collect::<Row>(),
            [("NAME", CellValue::Null), ("AGE", CellValue::Float(1.5))]
                .into_iter()
                .collect::<Row>(),
        ];
        Dataset::new(vec!["NAME".into(), "AGE".into(), "OK".into()], rows)
    }

    #[test]
    fn blank_filename_falls_back_to_default() {
        assert_eq!(resolve_filename("   ", DEFAULT_FILENAME).unwrap(), "download");
        assert_eq!(resolve_filename("", "cleaned").unwrap(), "cleaned");
        assert_eq!(resolve_filename(" report ", "cleaned").unwrap(), "report");
        assert!(matches!(
            resolve_filename("../evil", DEFAULT_FILENAME),
            Err(ExportError::InvalidFilename(_))
        ));
    }

    #[test]
    fn csv_writes_header_and_blank_nulls() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "NAME,AGE,OK\n\"ann, jr\",40,\n,1.5,\n");
    }

    #[test]
    fn empty_dataset_with_columns_is_header_only() {
        let empty = sample().with_rows(Vec::new());
        let mut buf = Vec::new();
        write_csv(&empty, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "NAME,AGE,OK\n");
    }

    #[test]
    fn dataset_without_columns_writes_empty_csv() {
        let mut buf = Vec::new();
        write_csv(&Dataset::default(), &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn xlsx_has_sheet1_with_typed_cells() {
        let bytes = to_xlsx_bytes(&sample()).unwrap();
        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("NAME".into())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(40.0)));
        assert_eq!(range.get_value((1, 2)), Some(&Data::Empty));
        assert_eq!(range.get_value((2, 0)), Some(&Data::Empty));
    }

    #[test]
    fn xlsx_of_empty_dataset_is_header_only() {
        let empty = sample().with_rows(Vec::new());
        let mut workbook = Xlsx::new(Cursor::new(to_xlsx_bytes(&empty).unwrap())).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();

        assert_eq!(range.height(), 1);
        assert_eq!(range.width(), 3);
        assert_eq!(range.get_value((0, 2)), Some(&Data::String("OK".into())));
    }

    #[test]
    fn xlsx_without_columns_is_an_empty_sheet1() {
        let mut workbook =
            Xlsx::new(Cursor::new(to_xlsx_bytes(&Dataset::default()).unwrap())).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
        assert!(workbook.worksheet_range(SHEET_NAME).unwrap().is_empty());
    }

    #[test]
    fn xlsx_writes_non_finite_floats_as_text() {
        let row: Row = [("X", CellValue::Float(f64::NAN))].into_iter().collect();
        let ds = Dataset::from_rows(vec![row]);
        let mut workbook = Xlsx::new(Cursor::new(to_xlsx_bytes(&ds).unwrap())).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("NaN".into())));
    }

    #[test]
    fn export_writes_named_file_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_dataset(&sample(), dir.path(), "", ExportFormat::Csv).unwrap();
        assert_eq!(path, dir.path().join("download.csv"));
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("NAME,AGE,OK"));

        let path = export_dataset(&sample(), dir.path(), "clean", ExportFormat::Xlsx).unwrap();
        assert_eq!(path, dir.path().join("clean.xlsx"));
        assert!(path.exists());
    }
}
