use crate::session::SessionResult;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_RESULTS_PATH: &str = "typing_results.csv";

pub const HEADER: &str = "datetime,wpm,accuracy_percent,rating,words_typed,seconds_taken";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only destination for finished sessions
pub trait ResultLog {
    fn append(&self, result: &SessionResult) -> Result<(), RecordError>;

    /// Human readable location, used in console messages
    fn location(&self) -> String;
}

/// Comma separated log file. The header is written only when the file is
/// empty at the time it is opened.
#[derive(Debug, Clone)]
pub struct CsvResultLog {
    path: PathBuf,
}

impl CsvResultLog {
    pub fn new<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for CsvResultLog {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_PATH)
    }
}

/// Text fields of one log line, in header order
fn record_fields(result: &SessionResult) -> [String; 6] {
    [
        result.timestamp().format(TIMESTAMP_FORMAT).to_string(),
        format!("{:.2}", result.wpm()),
        format!("{:.2}", result.accuracy()),
        result.rating().to_string(),
        result.words_typed().to_string(),
        format!("{:.2}", result.seconds_taken()),
    ]
}

impl ResultLog for CsvResultLog {
    fn append(&self, result: &SessionResult) -> Result<(), RecordError> {
        let mut log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        if log_file.metadata()?.len() == 0 {
            debug!(path = %self.path.display(), "writing results header");
            writeln!(log_file, "{HEADER}")?;
        }

        // text fields get quoted, numeric ones stay bare
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::NonNumeric)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(log_file);

        writer.write_record(record_fields(result))?;
        writer.flush()?;

        debug!(
            path = %self.path.display(),
            wpm = result.wpm(),
            accuracy = result.accuracy(),
            "appended session result"
        );

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
