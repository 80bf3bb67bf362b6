use crate::error::LogError;
use crate::format::LineFormatter;
use crate::record::LogRecord;
use crate::sink::LogSink;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Configuration for [`RotatingFileSink`].
///
/// The sink appends one formatted line per record and rolls the file over
/// by size, keeping a bounded set of numbered backups
/// (`app.log.1` .. `app.log.N`, `.1` being the most recent).
#[derive(Clone, Debug)]
pub struct RotatingFileConfig {
    /// Path of the live log file, e.g. `/var/log/app/events.log`.
    pub path: PathBuf,
    /// Rollover threshold in bytes; `0` disables rotation entirely.
    pub max_bytes: u64,
    /// How many rotated backups to keep. With `0` backups the live file
    /// is started over in place on rollover.
    pub backup_count: usize,
    /// Start from an empty file instead of appending to an existing one.
    pub truncate: bool,
}

impl RotatingFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RotatingFileConfig {
            path: path.into(),
            max_bytes: 0,
            backup_count: 0,
            truncate: false,
        }
    }
}

struct FileState {
    file: File,
    written: u64,
}

/// Size-rotated file implementation of [`LogSink`].
///
/// The file handle and byte counter live behind one mutex, so concurrent
/// emitters serialize on the write and a rollover is observed atomically.
pub struct RotatingFileSink {
    config: RotatingFileConfig,
    formatter: Box<dyn LineFormatter>,
    state: Mutex<FileState>,
}

impl RotatingFileSink {
    /// Open (or create) the live file and construct the sink.
    ///
    /// **Parameters**
    /// - `config`: [`RotatingFileConfig`] with the target path and the
    ///   rotation policy.
    /// - `formatter`: renders each record into one line.
    ///
    /// **Returns**
    /// - `Err(LogError::Io)` if the file or its parent directory cannot
    ///   be created.
    pub fn new(
        config: RotatingFileConfig,
        formatter: impl LineFormatter + 'static,
    ) -> Result<Self, LogError> {
        let (file, written) = open_live(&config.path, config.truncate)?;
        Ok(RotatingFileSink {
            config,
            formatter: Box::new(formatter),
            state: Mutex::new(FileState { file, written }),
        })
    }

    fn rotate(&self, state: &mut FileState) -> Result<(), LogError> {
        state.file.flush()?;
        if self.config.backup_count > 0 {
            // Shift app.log.1 -> app.log.2 -> .. before the live file
            // becomes app.log.1; the oldest backup falls off the end.
            for index in (1..self.config.backup_count).rev() {
                let from = backup_path(&self.config.path, index);
                if from.exists() {
                    fs::rename(&from, backup_path(&self.config.path, index + 1))?;
                }
            }
            fs::rename(&self.config.path, backup_path(&self.config.path, 1))?;
        }
        let (file, written) = open_live(&self.config.path, true)?;
        state.file = file;
        state.written = written;
        Ok(())
    }
}

impl LogSink for RotatingFileSink {
    fn send(&self, record: &LogRecord) -> Result<(), LogError> {
        let line = self.formatter.format_line(record)?;
        let incoming = line.len() as u64 + 1;

        let mut state = self.state.lock().expect("rotating file state poisoned");
        if self.config.max_bytes > 0
            && state.written > 0
            && state.written + incoming > self.config.max_bytes
        {
            self.rotate(&mut state)?;
        }
        state.file.write_all(line.as_bytes())?;
        state.file.write_all(b"\n")?;
        state.written += incoming;
        Ok(())
    }

    fn flush(&self) -> Result<(), LogError> {
        let mut state = self.state.lock().expect("rotating file state poisoned");
        state.file.flush()?;
        Ok(())
    }
}

fn open_live(path: &Path, truncate: bool) -> Result<(File, u64), LogError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = if truncate {
        OpenOptions::new().create(true).write(true).truncate(true).open(path)?
    } else {
        OpenOptions::new().create(true).append(true).open(path)?
    };
    let written = file.metadata()?.len();
    Ok((file, written))
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
