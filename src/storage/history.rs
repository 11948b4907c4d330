use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use thiserror::Error;

use crate::game::events::MatchEnded;
use crate::game::types::MatchResult;

/// One finished match, as written to the history log.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub nickname: String,
    pub elapsed: f32,
    pub result: MatchResult,
}

impl From<&MatchEnded> for MatchRecord {
    fn from(ended: &MatchEnded) -> Self {
        Self {
            nickname: ended.nickname.clone(),
            elapsed: ended.elapsed,
            result: ended.result,
        }
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to append to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Append-only store of finished matches.
pub trait MatchHistory: Send + Sync {
    fn append(&self, record: &MatchRecord) -> Result<(), HistoryError>;
}

/// The sink the simulation reports to.
#[derive(Resource)]
pub struct HistorySink(pub Box<dyn MatchHistory>);

pub const CSV_HEADER: &str = "Nickname,Time Passed (s),Result";

/// CSV history file. Created with a header row on first append.
#[derive(Debug, Clone)]
pub struct CsvHistoryLog {
    path: PathBuf,
}

impl CsvHistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl MatchHistory for CsvHistoryLog {
    fn append(&self, record: &MatchRecord) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let fresh = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let mut out = String::new();
        if fresh {
            out.push_str(CSV_HEADER);
            out.push('\n');
        }
        out.push_str(&csv_row(record));
        out.push('\n');
        file.write_all(out.as_bytes()).map_err(|e| self.io_err(e))
    }
}

/// `nickname,elapsed,result` with elapsed rounded to two decimals.
pub fn csv_row(record: &MatchRecord) -> String {
    format!(
        "{},{:.2},{}",
        csv_field(&record.nickname),
        record.elapsed,
        record.result.as_str()
    )
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(nickname: &str, elapsed: f32, result: MatchResult) -> MatchRecord {
        MatchRecord {
            nickname: nickname.into(),
            elapsed,
            result,
        }
    }

    #[test]
    fn row_rounds_elapsed_and_quotes_fields() {
        assert_eq!(csv_row(&record("ana", 12.345_6, MatchResult::Win)), "ana,12.35,win");
        assert_eq!(
            csv_row(&record("a,\"b\"", 3.0, MatchResult::Lose)),
            "\"a,\"\"b\"\"\",3.00,lose"
        );
    }

    #[test]
    fn header_written_once() {
        let dir = std::env::temp_dir().join(format!("time_runner_history_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let log = CsvHistoryLog::new(dir.join("game_history.csv"));

        log.append(&record("ana", 10.0, MatchResult::Lose)).unwrap();
        log.append(&record("bo", 20.5, MatchResult::Win)).unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            text,
            "Nickname,Time Passed (s),Result\nana,10.00,lose\nbo,20.50,win\n"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
