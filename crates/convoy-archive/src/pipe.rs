//! Chunk-channel adapters for blocking tar code.
//!
//! The wire moves tar data as discrete chunks; the `tar` crate wants
//! `std::io::Read`/`Write`. These adapters bridge the two across a bounded
//! `tokio::sync::mpsc` channel so a slow consumer applies backpressure to the
//! producer instead of buffering the whole archive.
//!
//! Both adapters use the channel's blocking entry points and must only be
//! driven from `tokio::task::spawn_blocking`.

use std::io::{self, Read, Write};

use tokio::sync::mpsc;

use crate::CHUNK_SIZE;

/// Reads a chunk stream as contiguous bytes.
///
/// Zero-length chunks are legal pings and are skipped. A closed channel is
/// end-of-stream.
pub struct ChunkReader {
    rx: mpsc::Receiver<Vec<u8>>,
    current: Vec<u8>,
    pos: usize,
}

impl ChunkReader {
    pub fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            rx,
            current: Vec::new(),
            pos: 0,
        }
    }
}

impl Read for ChunkReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pos >= self.current.len() {
            match self.rx.blocking_recv() {
                Some(chunk) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    self.current = chunk;
                    self.pos = 0;
                }
                None => return Ok(0),
            }
        }

        let n = buf.len().min(self.current.len() - self.pos);
        buf[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Writes bytes as a chunk stream.
///
/// Bytes are coalesced into [`CHUNK_SIZE`] chunks; `flush` sends any partial
/// chunk. A closed channel surfaces as `BrokenPipe`, which aborts the tar
/// producer when the consumer has gone away.
pub struct ChunkWriter {
    tx: mpsc::Sender<Vec<u8>>,
    buf: Vec<u8>,
}

impl ChunkWriter {
    pub fn new(tx: mpsc::Sender<Vec<u8>>) -> Self {
        Self {
            tx,
            buf: Vec::with_capacity(CHUNK_SIZE),
        }
    }

    fn send(&mut self, chunk: Vec<u8>) -> io::Result<()> {
        self.tx
            .blocking_send(chunk)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "chunk receiver closed"))
    }
}

impl Write for ChunkWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        while self.buf.len() >= CHUNK_SIZE {
            let rest = self.buf.split_off(CHUNK_SIZE);
            let chunk = std::mem::replace(&mut self.buf, rest);
            self.send(chunk)?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let chunk = std::mem::take(&mut self.buf);
            self.send(chunk)?;
        }
        Ok(())
    }
}
