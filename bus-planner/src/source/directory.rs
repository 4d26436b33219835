//! Timetables read from a local directory.
//!
//! Serves `{dir}/{stop}.json` files, the same layout the HTTP client
//! fetches from. Useful offline and in tests.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::StopId;
use crate::timetable::ScheduleBlock;

use super::TimetableSource;
use super::error::FetchError;

#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, stop: StopId) -> PathBuf {
        self.dir.join(format!("{stop}.json"))
    }
}

impl TimetableSource for DirectorySource {
    async fn fetch(&self, stop: StopId) -> Result<Vec<ScheduleBlock>, FetchError> {
        let path = self.path_for(stop);
        debug!(%stop, path = %path.display(), "reading timetable");

        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(FetchError::NotFound(stop)),
            Err(source) => return Err(FetchError::Io { path, source }),
        };

        serde_json::from_str(&json).map_err(|e| FetchError::Json {
            message: format!("{}: {e}", path.display()),
        })
    }
}
