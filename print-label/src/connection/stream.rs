//! Debug connection writing decoded text to a stream

use std::io::{self, Stdout, Write};

use tracing::{debug, instrument};

use super::{Connection, ensure_open};
use crate::error::PrintResult;

/// Connection that writes UTF-8 payloads to a writable stream
///
/// The stream is supplied by the caller and defaults to stdout. Payloads
/// must be valid UTF-8; they are decoded before being written.
#[derive(Debug)]
pub struct StreamConnection<W: Write = Stdout> {
    writer: W,
    is_open: bool,
}

impl StreamConnection<Stdout> {
    /// Connection writing to the process stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Default for StreamConnection<Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> StreamConnection<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            is_open: false,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Connection for StreamConnection<W> {
    fn open(&mut self) -> PrintResult<()> {
        if self.is_open {
            debug!("Stream connection already open");
            return Ok(());
        }
        self.is_open = true;
        debug!("Stream connection opened");
        Ok(())
    }

    fn close(&mut self) -> PrintResult<()> {
        if !self.is_open {
            return Ok(());
        }
        self.is_open = false;
        self.writer.flush()?;
        debug!("Stream connection closed");
        Ok(())
    }

    #[instrument(skip(self, data), fields(data_len = data.len()))]
    fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        ensure_open(self.is_open)?;
        let text = std::str::from_utf8(data)?;
        self.writer.write_all(text.as_bytes())?;
        debug!("Payload written");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open
    }
}
