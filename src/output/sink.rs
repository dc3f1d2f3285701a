//! Chunked result sink
//!
//! Records are newline-terminated canonical URLs. They are buffered and
//! written in chunks; every write covers whole lines only, so an interrupted
//! crawl leaves a well-formed prefix behind.

use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Appends discovered URLs to an output in chunks
#[derive(Debug)]
pub struct ResultSink<W> {
    writer: W,
    buffer: Vec<String>,
    chunk_size: usize,
    written: usize,
}

impl ResultSink<File> {
    /// Creates (or truncates) the result file at `path`
    pub async fn create(path: &Path, chunk_size: usize) -> io::Result<Self> {
        let file = File::create(path).await?;
        Ok(Self::new(file, chunk_size))
    }
}

impl<W: AsyncWrite + Unpin> ResultSink<W> {
    /// Wraps `writer`, flushing every `chunk_size` records
    ///
    /// A chunk size of zero is treated as one.
    pub fn new(writer: W, chunk_size: usize) -> Self {
        Self {
            writer,
            buffer: Vec::new(),
            chunk_size: chunk_size.max(1),
            written: 0,
        }
    }

    /// Writes the root URL immediately, ahead of anything buffered
    pub async fn write_root(&mut self, url: &str) -> io::Result<()> {
        self.writer.write_all(format!("{}\n", url).as_bytes()).await?;
        self.writer.flush().await?;
        self.written += 1;
        Ok(())
    }

    /// Buffers one record, flushing when a full chunk has accumulated
    pub async fn push(&mut self, url: String) -> io::Result<()> {
        self.buffer.push(url);
        if self.buffer.len() >= self.chunk_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Writes every buffered record
    pub async fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let mut chunk = self.buffer.join("\n");
            chunk.push('\n');
            self.writer.write_all(chunk.as_bytes()).await?;
            tracing::debug!("Flushed {} records", self.buffer.len());
            self.written += self.buffer.len();
            self.buffer.clear();
        }
        self.writer.flush().await
    }

    /// Performs the final flush and hands back the writer
    pub async fn finish(mut self) -> io::Result<W> {
        self.flush().await?;
        Ok(self.writer)
    }

    /// Records that have reached the writer
    pub fn written(&self) -> usize {
        self.written
    }

    /// Records waiting for the next flush
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
