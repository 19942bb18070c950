//! Streaming export: one background worker, one bounded chunk queue.
//!
//! The worker runs `Exporter::dump` with a `QueueWriter` as its sink. The
//! consumer side (`DumpIter`) polls the queue with a timeout, so it notices
//! when the worker is done even if the queue stays empty, and re-raises the
//! worker's error (or panic) after every chunk written before it.

use std::any::Any;
use std::io::Write;
use std::iter::FusedIterator;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError};
use tracing::{debug, trace, warn};

use amcatable_core::{ExportConfig, Table};

use crate::error::{ExportError, Result};
use crate::exporter::{DumpOptions, Exporter};
use crate::sink::QueueWriter;

const WORKER_NAME: &str = "amcatable-export";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Max chunks held in the queue; the worker blocks when it is full. 0 = unbounded.
    pub buffer_size: usize,
    pub poll_interval: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_size: 20,
            poll_interval: Duration::from_millis(200),
        }
    }
}

impl StreamConfig {
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            ..Self::default()
        }
    }
}

impl From<&ExportConfig> for StreamConfig {
    fn from(cfg: &ExportConfig) -> Self {
        Self {
            buffer_size: cfg.buffer_size,
            poll_interval: Duration::from_millis(cfg.poll_interval_ms.max(1)),
        }
    }
}

/// Lazy sequence of export chunks produced by a single background worker.
///
/// Yields `Ok(chunk)` in write order. If the worker failed, the error is the
/// last item. Dropping the iterator early disconnects the queue (the worker's
/// next write fails) and joins the worker.
pub struct DumpIter {
    receiver: Option<Receiver<Vec<u8>>>,
    worker: Option<JoinHandle<Result<()>>>,
    poll_interval: Duration,
    failed_to_start: Option<ExportError>,
    chunks: usize,
    bytes: usize,
    done: bool,
}

impl DumpIter {
    pub fn spawn<E>(
        exporter: Arc<E>,
        table: Arc<Table>,
        options: DumpOptions,
        config: StreamConfig,
    ) -> Self
    where
        E: Exporter + ?Sized,
    {
        let (tx, rx) = if config.buffer_size == 0 {
            unbounded()
        } else {
            bounded(config.buffer_size)
        };

        let spawned = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || -> Result<()> {
                let mut sink = QueueWriter::new(tx);
                exporter.dump(&table, &mut sink, &options)?;
                sink.flush()?;
                Ok(())
            });

        let (worker, failed_to_start) = match spawned {
            Ok(handle) => {
                debug!(
                    buffer_size = config.buffer_size,
                    poll_ms = config.poll_interval.as_millis() as u64,
                    "export worker started"
                );
                (Some(handle), None)
            }
            Err(e) => {
                warn!(error = %e, "could not spawn export worker");
                (None, Some(ExportError::WorkerSpawn(e.to_string())))
            }
        };

        Self {
            receiver: Some(rx),
            worker,
            poll_interval: config.poll_interval,
            failed_to_start,
            chunks: 0,
            bytes: 0,
            done: false,
        }
    }

    pub fn chunks_received(&self) -> usize {
        self.chunks
    }

    pub fn bytes_received(&self) -> usize {
        self.bytes
    }

    /// Drain into one buffer. Stops at the first error.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for chunk in self {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }

    /// Copy every chunk into `sink`; returns the number of bytes written.
    pub fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64> {
        let mut written = 0u64;
        for chunk in self.by_ref() {
            let chunk = chunk?;
            sink.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        sink.flush()?;
        Ok(written)
    }

    fn worker_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Queue drained and worker done: join it and surface its outcome.
    fn finish(&mut self) -> Option<Result<Vec<u8>>> {
        self.done = true;
        self.receiver = None;

        if let Some(err) = self.failed_to_start.take() {
            return Some(Err(err));
        }

        let handle = self.worker.take()?;
        match handle.join() {
            Ok(Ok(())) => {
                debug!(
                    chunks = self.chunks,
                    bytes = self.bytes,
                    "export worker finished"
                );
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, chunks = self.chunks, "export worker failed");
                Some(Err(e))
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                warn!(panic = %msg, chunks = self.chunks, "export worker panicked");
                Some(Err(ExportError::WorkerPanic(msg)))
            }
        }
    }
}

impl Iterator for DumpIter {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let Some(rx) = self.receiver.as_ref() else {
                return self.finish();
            };
            match rx.recv_timeout(self.poll_interval) {
                Ok(chunk) => {
                    self.chunks += 1;
                    self.bytes += chunk.len();
                    return Some(Ok(chunk));
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.worker_finished() && rx.is_empty() {
                        return self.finish();
                    }
                    trace!(chunks = self.chunks, "waiting for export worker");
                }
                Err(RecvTimeoutError::Disconnected) => return self.finish(),
            }
        }
    }
}

impl FusedIterator for DumpIter {}

impl Drop for DumpIter {
    fn drop(&mut self) {
        // Disconnect first so a worker blocked on a full queue wakes up.
        self.receiver = None;
        if let Some(handle) = self.worker.take() {
            warn!(chunks = self.chunks, "export stream dropped before completion");
            let _ = handle.join();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
