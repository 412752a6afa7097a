use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

use crate::domain::AppConfig;

/// Edit csv files in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Csv file to open on startup
    pub path: Option<String>,

    /// Where `w` writes the edited table to
    #[arg(short, long, default_value = "edited_data.csv")]
    pub output: String,

    /// Field delimiter, a single ascii character or "tab"
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Maximal width of a column in the table view
    #[arg(long, default_value_t = 30)]
    pub max_column_width: usize,

    /// Event poll time in milliseconds
    #[arg(long, default_value_t = 100)]
    pub poll_time: u64,

    /// Log file, defaults to csved.log in the temp directory
    #[arg(long)]
    pub log_file: Option<String>,
}

impl Args {
    pub fn config(&self) -> AppConfig {
        AppConfig::default()
            .with_event_poll_time(self.poll_time)
            .with_max_column_width(self.max_column_width)
            .with_delimiter(self.delimiter)
            .with_output_path(expand_path(&self.output))
    }

    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => expand_path(path),
            None => std::env::temp_dir().join("csved.log"),
        }
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "\"" | "\n" | "\r" => Err(format!("{s:?} cannot be used as a delimiter")),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("expected a single ascii character, got \"{s}\"")),
    }
}

/// Expand `~` and environment variables in a user supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            warn!("Could not expand {path}: {e}");
            PathBuf::from(shellexpand::tilde(path).as_ref())
        }
    }
}
