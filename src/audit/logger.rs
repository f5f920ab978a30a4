//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{ParkingError, ParkingResult};

use super::entry::AuditEntry;

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Append one JSON line; the file is created on first use
    pub fn log(&self, entry: &AuditEntry) -> ParkingResult<()> {
        let mut line = serde_json::to_string(entry)
            .map_err(|e| ParkingError::Json(format!("Failed to serialize audit entry: {}", e)))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| ParkingError::Io(format!("Failed to open audit log: {}", e)))?;

        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| ParkingError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> ParkingResult<Vec<AuditEntry>> {
        let Some(reader) = self.open_reader()? else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line_num = index + 1;
            let line = line.map_err(|e| {
                ParkingError::Io(format!("Failed to read audit log line {}: {}", line_num, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = serde_json::from_str(&line).map_err(|e| {
                ParkingError::Json(format!("Bad audit entry at line {}: {}", line_num, e))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> ParkingResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Number of non-blank lines in the log
    pub fn entry_count(&self) -> ParkingResult<usize> {
        let Some(reader) = self.open_reader()? else {
            return Ok(0);
        };

        Ok(reader
            .lines()
            .map_while(Result::ok)
            .filter(|line| !line.trim().is_empty())
            .count())
    }

    fn open_reader(&self) -> ParkingResult<Option<BufReader<File>>> {
        if !self.log_path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.log_path)
            .map_err(|e| ParkingError::Io(format!("Failed to open audit log: {}", e)))?;
        Ok(Some(BufReader::new(file)))
    }
}
