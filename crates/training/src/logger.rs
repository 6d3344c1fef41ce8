use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{InrError, InrResult};

/// Append-only text log for a single run. Each line is flushed as it is written.
pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RunLog {
    pub fn open(path: impl AsRef<Path>) -> InrResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(InrError::io(&path))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_line(&mut self, text: &str) -> InrResult<()> {
        writeln!(self.writer, "{text}")
            .and_then(|_| self.writer.flush())
            .map_err(InrError::io(&self.path))
    }
}

impl Drop for RunLog {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            eprintln!("Failed to flush run log {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_append_across_handles() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("log.txt");
        {
            let mut log = RunLog::open(&path).unwrap();
            log.write_line("first").unwrap();
        }
        let mut log = RunLog::open(&path).unwrap();
        log.write_line("second").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn open_fails_in_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = RunLog::open(tmp.path().join("missing/log.txt")).err().unwrap();
        assert!(matches!(err, InrError::Io { .. }));
    }
}
