use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tracing::warn;

/// Streams records as the elements of one JSON array.
///
/// The opening bracket is written on construction. The closing bracket is
/// written by [`JsonArrayWriter::finish`], or by `Drop` when the writer goes
/// away without being finished, so the document is closed on every exit path.
pub struct JsonArrayWriter<W: Write> {
    inner: Option<W>,
    written: u64,
}

impl<W: Write> JsonArrayWriter<W> {
    pub fn new(mut inner: W) -> Result<Self> {
        inner
            .write_all(b"[")
            .context("Failed to open JSON array")?;
        Ok(Self {
            inner: Some(inner),
            written: 0,
        })
    }

    pub fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let inner = self
            .inner
            .as_mut()
            .context("JSON array writer already finished")?;
        if self.written > 0 {
            inner.write_all(b",").context("Failed to write separator")?;
        }
        serde_json::to_writer(&mut *inner, record).context("Failed to write record")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Closes the array, flushes, and hands back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        let mut inner = self
            .inner
            .take()
            .context("JSON array writer already finished")?;
        close(&mut inner)?;
        Ok(inner)
    }
}

fn close<W: Write>(inner: &mut W) -> Result<()> {
    inner
        .write_all(b"]")
        .context("Failed to close JSON array")?;
    inner.flush().context("Failed to flush output")?;
    Ok(())
}

impl<W: Write> Drop for JsonArrayWriter<W> {
    fn drop(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            if let Err(e) = close(&mut inner) {
                warn!(error = %e, "Failed to close JSON array on drop");
            }
        }
    }
}
