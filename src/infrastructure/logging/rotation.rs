//! Rolling log file
//!
//! Appends one record per line to `<dir>/<name>.log` and rotates it:
//! - once the file reaches the byte limit
//! - once the file has been open for the rotation interval
//!
//! Rotated files are renamed with timestamps for archival

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::domain::errors::{LogError, LogResult};
use crate::domain::models::RotationPolicy;
use crate::domain::ports::RecordWriter;

/// Pause between rotation attempts after one fails
const ROTATION_RETRY: Duration = Duration::from_secs(60);

/// Size and time rotated append-only file
#[derive(Debug)]
pub struct RollingFileWriter {
    active_path: PathBuf,
    policy: RotationPolicy,
    state: Mutex<ActiveFile>,
}

#[derive(Debug)]
struct ActiveFile {
    file: File,
    size: u64,
    opened_at: Instant,
    /// Set after a failed rotation; no new attempt before this instant
    retry_after: Option<Instant>,
}

impl RollingFileWriter {
    /// Open (or create) `<dir>/<file_name>.log`
    ///
    /// Creates `dir` and any missing parents first. An existing active file
    /// is appended to; its current size counts toward the byte limit.
    pub fn new(dir: impl AsRef<Path>, file_name: &str, policy: RotationPolicy) -> LogResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| LogError::io(dir, e))?;

        let active_path = dir.join(format!("{}.log", sanitize_file_name(file_name)));
        let state = ActiveFile::open(&active_path).map_err(|e| LogError::io(&active_path, e))?;

        debug!(
            path = %active_path.display(),
            size = state.size,
            byte_limit = ?policy.byte_limit,
            interval = ?policy.interval,
            "opened rolling log file"
        );

        Ok(Self {
            active_path,
            policy,
            state: Mutex::new(state),
        })
    }

    /// Path of the file currently being written
    pub fn active_path(&self) -> &Path {
        &self.active_path
    }

    /// Rotation triggers in effect
    pub const fn policy(&self) -> RotationPolicy {
        self.policy
    }

    fn should_rotate(&self, state: &ActiveFile) -> bool {
        if state.size == 0 || state.retry_after.is_some_and(|at| Instant::now() < at) {
            return false;
        }
        let over_size = self.policy.byte_limit.is_some_and(|limit| state.size >= limit);
        let expired = self
            .policy
            .interval
            .is_some_and(|interval| state.opened_at.elapsed() >= interval);
        over_size || expired
    }

    /// Rename the active file with a timestamp and start a fresh one
    fn rotate(&self, state: &mut ActiveFile) -> io::Result<PathBuf> {
        state.file.flush()?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let base = format!("{}.{timestamp}", self.active_path.display());
        let mut rotated_path = PathBuf::from(&base);
        let mut suffix = 1;
        while rotated_path.exists() {
            rotated_path = PathBuf::from(format!("{base}-{suffix}"));
            suffix += 1;
        }

        fs::rename(&self.active_path, &rotated_path)?;
        *state = ActiveFile::open(&self.active_path)?;

        info!(
            old_path = %self.active_path.display(),
            new_path = %rotated_path.display(),
            "rotated log file"
        );
        Ok(rotated_path)
    }

    fn lock(&self) -> MutexGuard<'_, ActiveFile> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ActiveFile {
    fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            file,
            size,
            opened_at: Instant::now(),
            retry_after: None,
        })
    }
}

impl RecordWriter for RollingFileWriter {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut state = self.lock();
        if self.should_rotate(&state) {
            // Keep appending to the current handle when rotation fails
            if let Err(e) = self.rotate(&mut state) {
                warn!(
                    path = %self.active_path.display(),
                    error = %e,
                    "log rotation failed, continuing with the current file"
                );
                state.retry_after = Some(Instant::now() + ROTATION_RETRY);
            }
        }

        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        state.file.write_all(&buf)?;
        state.size += buf.len() as u64;
        Ok(())
    }
}

/// Keep file names to a single path component
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "app".to_string()
    } else {
        cleaned
    }
}
