use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use thiserror::Error;

use crate::table::TableError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    IoError(#[from] Error),
    #[error("{0}")]
    PolarsError(#[from] PolarsError),
    #[error("{0}")]
    CsvError(#[from] csv::Error),
    #[error("{0}")]
    TableError(#[from] TableError),
    #[error("loading failed: {0}")]
    LoadingFailed(String),
    #[error("file not found")]
    FileNotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("unknown file type")]
    UnknownFileType,
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct AppConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
    pub delimiter: u8,
    pub output_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            max_column_width: 30,
            delimiter: b',',
            output_path: PathBuf::from("edited_data.csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CMDMode {
    EditCell,
    OpenFile,
    SaveAs,
}

impl CMDMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            CMDMode::EditCell => "edit: ",
            CMDMode::OpenFile => "open: ",
            CMDMode::SaveAs => "save as: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    Exit,
    Enter,
    Help,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    MoveToFirstColumn,
    MoveToLastColumn,
    EditCell,
    AddRow,
    DeleteRow,
    CopyCell,
    CopyRow,
    Save,
    SaveAs,
    Open,
    ToggleChart,
    NextXAxis,
    PrevXAxis,
    NextYAxis,
    PrevYAxis,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
Table
  ←↓↑→ / hjkl   move cursor
  PgUp / PgDn   page up / down
  g / G         first / last row
  ^ / $         first / last column
  Enter / e     edit cell
  a             add row
  d             delete row
  c / C         copy cell / row
  w / W         write csv / write csv as
  o             open file
  p             show chart

Chart
  x / X         next / previous x column
  y / Y         next / previous numeric y column
  Esc           back to table

  ?             help
  q             quit";
