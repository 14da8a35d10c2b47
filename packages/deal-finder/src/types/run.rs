//! Run identity and the files a run produces.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Local;

use crate::error::DealFinderError;

pub const RAW_RESULTS_PREFIX: &str = "parallel_raw_";
pub const CACHE_PREFIX: &str = "openai_responses_";
pub const SUMMARY_PREFIX: &str = "openai_parsed_";
pub const SPREADSHEET_PREFIX: &str = "deals_parallel_II_";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `YYYYMMDD_HHMMSS` identifier shared by every file of one run.
///
/// Lexicographic order equals chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunTimestamp(String);

impl RunTimestamp {
    /// Mint a timestamp from the local wall clock.
    pub fn now() -> Self {
        Self(Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the timestamp from a run file name such as
    /// `openai_responses_20251118_184341.json`.
    pub fn from_file_name(file_name: &str, prefix: &str) -> Option<Self> {
        file_name
            .strip_prefix(prefix)?
            .strip_suffix(".json")?
            .parse()
            .ok()
    }
}

impl FromStr for RunTimestamp {
    type Err = DealFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 15
            && bytes.iter().enumerate().all(|(i, b)| {
                if i == 8 {
                    *b == b'_'
                } else {
                    b.is_ascii_digit()
                }
            });
        if well_formed {
            Ok(Self(s.to_string()))
        } else {
            Err(DealFinderError::InvalidTimestamp(s.to_string()))
        }
    }
}

impl fmt::Display for RunTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Paths of the files written for one run.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
    timestamp: RunTimestamp,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>, timestamp: RunTimestamp) -> Self {
        Self {
            dir: dir.into(),
            timestamp,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn timestamp(&self) -> &RunTimestamp {
        &self.timestamp
    }

    pub fn raw_results(&self) -> PathBuf {
        self.file(RAW_RESULTS_PREFIX, "json")
    }

    pub fn cache(&self) -> PathBuf {
        self.file(CACHE_PREFIX, "json")
    }

    pub fn summary(&self) -> PathBuf {
        self.file(SUMMARY_PREFIX, "json")
    }

    pub fn spreadsheet(&self) -> PathBuf {
        self.file(SPREADSHEET_PREFIX, "xlsx")
    }

    fn file(&self, prefix: &str, extension: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}", prefix, self.timestamp, extension))
    }
}

/// Most recent `<prefix><timestamp>.json` in `dir`, if any.
///
/// A missing directory is treated as empty. Files whose suffix is not a
/// well-formed timestamp are ignored.
pub fn latest_run_file(dir: &Path, prefix: &str) -> crate::error::Result<Option<(PathBuf, RunTimestamp)>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DealFinderError::io(dir, e)),
    };

    let mut latest: Option<(PathBuf, RunTimestamp)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| DealFinderError::io(dir, e))?;
        let file_name = entry.file_name();
        let Some(timestamp) = file_name
            .to_str()
            .and_then(|name| RunTimestamp::from_file_name(name, prefix))
        else {
            continue;
        };
        if latest.as_ref().map_or(true, |(_, best)| timestamp > *best) {
            latest = Some((entry.path(), timestamp));
        }
    }
    Ok(latest)
}
