//! `io::Write` adapter that turns every write into one queued chunk.

use std::io::{self, Write};

use crossbeam_channel::Sender;

/// Sending half of the streaming queue, handed to `Exporter::dump` as its sink.
///
/// Each non-empty `write` enqueues one chunk and blocks while the queue is full.
/// Once the consumer is gone writes fail with `BrokenPipe`, which aborts the dump.
pub struct QueueWriter {
    queue: Sender<Vec<u8>>,
}

impl QueueWriter {
    pub fn new(queue: Sender<Vec<u8>>) -> Self {
        Self { queue }
    }
}

impl Write for QueueWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.queue.send(buf.to_vec()).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, "stream consumer dropped")
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
