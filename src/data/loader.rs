//! CSV loading for benchmark measurements.

use super::{Dataset, MatrixType, Measurement, MethodId};
use crate::error::{Result, TopnError};
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns every measurement file must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Type", "Dimension", "topN", "IDMethod", "ExecTime"];

/// Loads a measurement CSV with the default loader settings.
///
/// # Errors
///
/// See [`CsvLoader::load`].
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    CsvLoader::new().load(path)
}

/// Header-driven CSV loader.
///
/// Required columns are located by name, so column order is free and extra
/// columns are ignored.
#[derive(Debug, Clone, Copy)]
pub struct CsvLoader {
    delimiter: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Positions of the required columns within a header row.
struct ColumnIndex {
    matrix_type: usize,
    dimension: usize,
    top_n: usize,
    method: usize,
    exec_time: usize,
}

impl CsvLoader {
    /// Creates a comma-delimited loader.
    #[must_use]
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Loads measurements from a CSV file.
    ///
    /// # Errors
    ///
    /// - [`TopnError::MissingFile`] if the file cannot be opened
    /// - [`TopnError::Schema`] for missing columns or bad values
    /// - [`TopnError::EmptyData`] if the file has no data rows
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TopnError::MissingFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let dataset = self.load_reader(file, &path.display().to_string())?;
        info!(
            "Loaded {} measurements from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Loads measurements from any reader; `label` names the source.
    ///
    /// # Errors
    ///
    /// Same as [`CsvLoader::load`], minus the file-open failure.
    pub fn load_reader<R: Read>(&self, reader: R, label: &str) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| TopnError::schema(1, "headers", format!("failed to read headers: {e}")))?
            .clone();
        let columns = locate_columns(&headers)?;

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let fallback_line = i + 2;
            let record =
                result.map_err(|e| TopnError::schema(fallback_line, "*", e.to_string()))?;
            let line = record
                .position()
                .map_or(fallback_line, |p| p.line() as usize);
            rows.push(parse_record(&record, &columns, line)?);
        }

        if rows.is_empty() {
            return Err(TopnError::EmptyData {
                context: format!("no measurement rows in {label}"),
            });
        }
        debug!("{label}: parsed {} rows", rows.len());

        Ok(Dataset::from_measurements(label, rows))
    }
}

fn locate_columns(headers: &csv::StringRecord) -> Result<ColumnIndex> {
    let find = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            TopnError::schema(
                1,
                name,
                format!(
                    "missing required column; available columns: {:?}",
                    headers.iter().collect::<Vec<_>>()
                ),
            )
        })
    };

    Ok(ColumnIndex {
        matrix_type: find(REQUIRED_COLUMNS[0])?,
        dimension: find(REQUIRED_COLUMNS[1])?,
        top_n: find(REQUIRED_COLUMNS[2])?,
        method: find(REQUIRED_COLUMNS[3])?,
        exec_time: find(REQUIRED_COLUMNS[4])?,
    })
}

fn parse_record(record: &csv::StringRecord, cols: &ColumnIndex, line: usize) -> Result<Measurement> {
    let type_code = parse_count(record, cols.matrix_type, "Type", line)?;
    let matrix_type = MatrixType::from_code(type_code).ok_or_else(|| {
        TopnError::schema(
            line,
            "Type",
            format!("unknown matrix type code {type_code}, expected 0..=4"),
        )
    })?;

    let exec_raw = field(record, cols.exec_time, "ExecTime", line)?;
    let exec_time: f64 = exec_raw.parse().map_err(|_| {
        TopnError::schema(line, "ExecTime", format!("'{exec_raw}' is not a number"))
    })?;
    if !exec_time.is_finite() || exec_time < 0.0 {
        return Err(TopnError::schema(
            line,
            "ExecTime",
            format!("execution time must be finite and non-negative, got {exec_time}"),
        ));
    }

    Ok(Measurement {
        matrix_type,
        dimension: parse_count(record, cols.dimension, "Dimension", line)?,
        top_n: parse_count(record, cols.top_n, "topN", line)?,
        method: MethodId(parse_count(record, cols.method, "IDMethod", line)?),
        exec_time,
    })
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize, column: &str, line: usize) -> Result<&'r str> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(TopnError::schema(line, column, "missing value")),
    }
}

/// Parses a non-negative integer, accepting integral floats such as `"512.0"`.
fn parse_count(record: &csv::StringRecord, idx: usize, column: &str, line: usize) -> Result<u32> {
    let raw = field(record, idx, column, line)?;
    if let Ok(value) = raw.parse::<u32>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= 0.0 && v <= f64::from(u32::MAX) => Ok(v as u32),
        _ => Err(TopnError::schema(
            line,
            column,
            format!("'{raw}' is not a non-negative integer"),
        )),
    }
}
