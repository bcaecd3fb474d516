// Excel export of the reconciliation report

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;
use tally_recon::report::{Cell, Report};

use crate::error::IoError;

/// Font size used on every sheet.
const FONT_SIZE: f64 = 14.0;

/// Column width (in characters) for report sheets.
const COLUMN_WIDTH: f64 = 22.0;

/// Export statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportResult {
    pub path: PathBuf,
    pub sheets_exported: usize,
    pub rows_exported: usize,
    pub highlighted_rows: usize,
    pub export_duration_ms: u128,
}

/// `<out_dir>/<input stem>.xlsx`
pub fn output_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "report".to_string());
    out_dir.join(format!("{stem}.xlsx"))
}

/// Probe an existing destination without modifying it.
///
/// Opening for append neither truncates nor touches contents; a refusal means
/// the file is locked or read-only and must not be overwritten.
pub fn ensure_writable(path: &Path) -> Result<(), IoError> {
    if !path.exists() {
        return Ok(());
    }
    OpenOptions::new()
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|e| IoError::from_write(path.to_path_buf(), e))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: &Format,
) -> Result<(), IoError> {
    match cell {
        Cell::Text(s) => {
            worksheet.write_string_with_format(row, col, s.as_str(), format)?;
        }
        Cell::Number(d) => {
            worksheet.write_number_with_format(row, col, d.to_f64().unwrap_or_default(), format)?;
        }
        Cell::Integer(n) => {
            worksheet.write_number_with_format(row, col, *n as f64, format)?;
        }
    }
    Ok(())
}

/// Render the report to XLSX bytes: one sheet per table, bold header row,
/// highlighted rows bold.
pub fn render_report(report: &Report) -> Result<(Vec<u8>, ExportResult), IoError> {
    let mut result = ExportResult::default();
    let mut workbook = Workbook::new();

    let body = Format::new().set_font_size(FONT_SIZE);
    let bold = Format::new().set_font_size(FONT_SIZE).set_bold();

    for table in &report.tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(table.name())?;

        for (col, name) in table.columns().iter().enumerate() {
            let col = col as u16;
            worksheet.set_column_format(col, &body)?;
            worksheet.set_column_width(col, COLUMN_WIDTH)?;
            worksheet.write_string_with_format(0, col, *name, &bold)?;
        }

        for (i, row) in table.rows.iter().enumerate() {
            let format = if row.highlight {
                result.highlighted_rows += 1;
                &bold
            } else {
                &body
            };
            for (col, cell) in row.cells.iter().enumerate() {
                write_cell(worksheet, (i + 1) as u32, col as u16, cell, format)?;
            }
        }

        result.rows_exported += table.rows.len();
        result.sheets_exported += 1;
    }

    let bytes = workbook.save_to_buffer()?;
    Ok((bytes, result))
}

/// Replace `path` with `bytes` via a sibling `.tmp` file and a rename.
///
/// On failure the previous contents of `path` are untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), IoError> {
    let tmp_path = path.with_extension("xlsx.tmp");
    if let Err(e) = std::fs::write(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(IoError::from_write(path.to_path_buf(), e));
    }
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        IoError::from_write(path.to_path_buf(), e)
    })
}

/// Write the report to `path`, creating the parent directory if needed.
///
/// The workbook is fully rendered in memory, then written to a temp file
/// and renamed into place, so a failure never leaves a partial file behind.
pub fn export_report(report: &Report, path: &Path) -> Result<ExportResult, IoError> {
    let start_time = Instant::now();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IoError::CreateDir {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }

    ensure_writable(path)?;

    let (bytes, mut result) = render_report(report)?;
    write_atomic(path, &bytes)?;

    result.path = path.to_path_buf();
    result.export_duration_ms = start_time.elapsed().as_millis();
    log::info!(
        "exported {} sheets, {} rows to {}",
        result.sheets_exported,
        result.rows_exported,
        path.display()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use tally_recon::{assemble_report, run_csv, ReconConfig};

    const CSV: &str = "\
Valor;Hist;Complemento
50;20;NF 456
50;133;ADIANT 789
30;20;DUP 999
100;20;NF 123
100;133;NF 123
10;7;TARIFA 1
";

    fn report() -> Report {
        let result = run_csv(&ReconConfig::default(), CSV).unwrap();
        assemble_report(&result)
    }

    #[test]
    fn output_path_uses_input_stem() {
        let out = output_path_for(Path::new("/data/in/janeiro.csv"), Path::new("/data/result"));
        assert_eq!(out, PathBuf::from("/data/result/janeiro.xlsx"));
        let out = output_path_for(Path::new("extrato"), Path::new("r"));
        assert_eq!(out, PathBuf::from("r/extrato.xlsx"));
    }

    #[test]
    fn export_creates_dir_and_sheets() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/out/batch.xlsx");

        let result = export_report(&report(), &path).unwrap();
        assert_eq!(result.sheets_exported, 6);
        assert_eq!(result.rows_exported, 1 + 1 + 1 + 1 + 1 + 6);
        assert_eq!(result.highlighted_rows, 2);
        assert!(path.exists());

        let mut wb: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            wb.sheet_names(),
            vec!["Advance", "Outstanding", "Deferred", "Unrecognized", "Settled", "Cleaned"]
        );

        let advance = wb.worksheet_range("Advance").unwrap();
        assert_eq!(advance.get_value((0, 0)), Some(&Data::String("Id".into())));
        assert_eq!(advance.get_value((1, 0)), Some(&Data::String("789".into())));
        assert_eq!(advance.get_value((1, 1)), Some(&Data::Float(50.0)));

        let deferred = wb.worksheet_range("Deferred").unwrap();
        assert_eq!(deferred.get_value((1, 0)), Some(&Data::String("999".into())));
        assert_eq!(deferred.get_value((1, 1)), Some(&Data::Float(-30.0)));

        let unrecognized = wb.worksheet_range("Unrecognized").unwrap();
        assert_eq!(unrecognized.get_value((0, 2)), Some(&Data::String("Reference".into())));
        assert_eq!(unrecognized.get_value((1, 2)), Some(&Data::String("TARIFA 1".into())));
    }

    #[test]
    fn export_overwrites_writable_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("batch.xlsx");
        std::fs::write(&path, b"stale").unwrap();
        export_report(&report(), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 100);
    }

    #[cfg(unix)]
    #[test]
    fn export_refuses_read_only_destination() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("batch.xlsx");
        std::fs::write(&path, b"locked").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o444)).unwrap();

        // Privileged users bypass file modes; nothing to assert there.
        if OpenOptions::new().append(true).open(&path).is_ok() {
            return;
        }

        let err = export_report(&report(), &path).unwrap_err();
        assert!(err.is_permission_denied());
        assert_eq!(std::fs::read(&path).unwrap(), b"locked");
    }

    #[test]
    fn export_leaves_no_temp_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("batch.xlsx");
        export_report(&report(), &path).unwrap();

        let names: Vec<String> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["batch.xlsx"]);
    }

    #[test]
    fn failed_write_keeps_previous_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("batch.xlsx");
        std::fs::write(&path, b"previous").unwrap();
        // the temp slot is taken by a directory, so the write fails
        std::fs::create_dir(temp_dir.path().join("batch.xlsx.tmp")).unwrap();

        assert!(export_report(&report(), &path).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    }
}
