//! Connection writing raw bytes to a filesystem path

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::Connection;
use crate::error::{PrintError, PrintResult};

/// File-backed connection
///
/// The file is opened on `open` and released on `close`. Useful for device
/// nodes (e.g. `/dev/usb/lp0`) and for capturing print jobs to disk.
#[derive(Debug)]
pub struct FileConnection {
    path: PathBuf,
    append: bool,
    file: Option<File>,
}

impl FileConnection {
    /// Connection that truncates `path` on open
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            append: false,
            file: None,
        }
    }

    /// Append to the file instead of truncating it
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connection for FileConnection {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn open(&mut self) -> PrintResult<()> {
        if self.file.is_some() {
            debug!("File connection already open");
            return Ok(());
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if self.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let file = options
            .open(&self.path)
            .map_err(|e| PrintError::connection(self.path.display().to_string(), e))?;

        self.file = Some(file);
        info!("File connection opened");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn close(&mut self) -> PrintResult<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        file.flush()?;
        info!("File connection closed");
        Ok(())
    }

    #[instrument(skip(self, data), fields(path = %self.path.display(), data_len = data.len()))]
    fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        let file = self.file.as_mut().ok_or(PrintError::NotOpen)?;
        file.write_all(data)?;
        debug!("Payload written");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.file.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_before_open_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = FileConnection::new(dir.path().join("job.bin"));
        assert!(conn.send(b"x").unwrap_err().is_not_open());
        // Nothing acquired, nothing created
        assert!(!dir.path().join("job.bin").exists());
    }

    #[test]
    fn test_write_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.bin");
        let mut conn = FileConnection::new(&path);

        conn.open().unwrap();
        conn.open().unwrap();
        conn.send(&[0x1B, 0x40, 0xff]).unwrap();
        conn.close().unwrap();
        conn.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![0x1B, 0x40, 0xff]);
    }

    #[test]
    fn test_truncate_vs_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.txt");

        for _ in 0..2 {
            let mut conn = FileConnection::new(&path);
            conn.open().unwrap();
            conn.send(b"ab").unwrap();
            conn.close().unwrap();
        }
        assert_eq!(std::fs::read(&path).unwrap(), b"ab");

        let mut conn = FileConnection::new(&path).with_append(true);
        conn.open().unwrap();
        conn.send(b"cd").unwrap();
        conn.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"abcd");
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = FileConnection::new(dir.path().join("missing").join("job.bin"));
        let err = conn.open().unwrap_err();
        assert!(err.is_connection_failure());
        assert!(!conn.is_open());
    }
}
