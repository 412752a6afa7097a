//! Reading and writing csv files as plain string grids.
//!
//! Files are read without header inference: the first record becomes the header
//! and every value stays a string. Quoting on export is left to polars.

use polars::prelude::*;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    CSV,
    TSV,
}

impl FileType {
    /// Tab separated files ignore the configured delimiter.
    pub fn delimiter(&self, configured: u8) -> u8 {
        match self {
            FileType::CSV => configured,
            FileType::TSV => b'\t',
        }
    }
}

#[derive(Debug)]
pub struct FileInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub file_type: FileType,
}

pub type Records = (Vec<String>, Vec<Vec<String>>);

pub fn get_file_info(path: PathBuf) -> Result<FileInfo, AppError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::FileNotFound,
        ErrorKind::PermissionDenied => AppError::PermissionDenied,
        _ => AppError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(AppError::LoadingFailed("Not a file!".into()));
    }

    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size: metadata.len(),
        file_type,
    })
}

fn detect_file_type(path: &Path) -> Result<FileType, AppError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") | Some("TXT") => Ok(FileType::CSV),
        Some("TSV") | Some("TAB") => Ok(FileType::TSV),
        _ => Err(AppError::UnknownFileType),
    }
}

/// Read a file into header and rows.
///
/// Lines longer than the first record are truncated, shorter ones padded with
/// empty cells, so the result always has a consistent shape.
pub fn decode(path: &Path, delimiter: u8) -> Result<Records, AppError> {
    let start_time = Instant::now();

    let df = match LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .with_separator(delimiter)
        .with_truncate_ragged_lines(true)
        .finish()
        .and_then(|lf| lf.collect())
    {
        Ok(df) => df,
        Err(PolarsError::NoData(msg)) => {
            debug!("No records in {:?}: {msg}", path);
            return Ok((Vec::new(), Vec::new()));
        }
        Err(e) => return Err(e.into()),
    };

    // Each column is converted in its own thread.
    let columns = df
        .get_columns()
        .par_iter()
        .map(column_strings)
        .collect::<Result<Vec<Vec<String>>, PolarsError>>()?;

    let nrecords = df.height();
    if columns.is_empty() || nrecords == 0 {
        return Ok((Vec::new(), Vec::new()));
    }

    let header = columns.iter().map(|c| c[0].clone()).collect();
    let rows = (1..nrecords)
        .map(|ridx| columns.iter().map(|c| c[ridx].clone()).collect())
        .collect();

    info!(
        "Decoded {} records with {} columns in {}ms",
        nrecords,
        columns.len(),
        start_time.elapsed().as_millis()
    );
    Ok((header, rows))
}

/// Number of records that are wider or narrower than the first one.
///
/// `decode` pads these with empty cells or cuts them off, this tells how many were touched.
pub fn count_ragged_lines(path: &Path, delimiter: u8) -> Result<usize, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut width = None;
    let mut ragged = 0;
    for record in reader.byte_records() {
        let len = record?.len();
        match width {
            None => width = Some(len),
            Some(w) if w != len => ragged += 1,
            Some(_) => (),
        }
    }
    Ok(ragged)
}

fn column_strings(column: &Column) -> Result<Vec<String>, PolarsError> {
    let col = column.cast(&DataType::String)?;
    let series = col.str()?;
    Ok(series
        .into_iter()
        .map(|value| value.map(str::to_string).unwrap_or_default())
        .collect())
}

/// Write header and rows to `path`. An empty header produces an empty file.
pub fn encode(
    path: &Path,
    header: &[String],
    rows: &[Vec<String>],
    delimiter: u8,
) -> Result<(), AppError> {
    let mut file = File::create(path)?;
    if header.is_empty() {
        debug!("Nothing to write, created empty file {:?}", path);
        return Ok(());
    }

    // The header goes in as the first record, csv headers don't need to be unique.
    let columns = (0..header.len())
        .map(|cidx| {
            let values: Vec<&str> = std::iter::once(header[cidx].as_str())
                .chain(
                    rows.iter()
                        .map(|r| r.get(cidx).map(String::as_str).unwrap_or("")),
                )
                .collect();
            Column::new(format!("column_{}", cidx + 1).into(), values)
        })
        .collect::<Vec<Column>>();
    let mut df = DataFrame::new(columns)?;

    CsvWriter::new(&mut file)
        .include_header(false)
        .with_separator(delimiter)
        .finish(&mut df)?;

    info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

/// Format a single record as one csv line.
pub fn format_record(cells: &[String], delimiter: u8) -> String {
    let delimiter = delimiter as char;
    cells
        .iter()
        .map(|c| wrap_cell_content(c, delimiter))
        .collect::<Vec<String>>()
        .join(&delimiter.to_string())
}

fn wrap_cell_content(c: &str, delimiter: char) -> String {
    let needs_escaping = c.contains('"');
    let needs_wrapping = needs_escaping
        || c.chars()
            .any(|c| c == ' ' || c == '\t' || c == '\n' || c == '\r' || c == delimiter);
    let mut out = String::from(c);

    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_wrapping {
        out = format!("\"{out}\"");
    }
    out
}
