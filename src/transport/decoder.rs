//! Incremental decoding of chunked JSON-lines bodies.

use std::collections::VecDeque;

use futures_util::StreamExt;
use tracing::{trace, warn};

use super::{ByteStream, TransportRecord};
use crate::Result;

/// Reassembles arbitrarily split bytes into complete text lines.
///
/// Bytes are buffered until a `\n` arrives and only then decoded. A
/// newline byte never occurs inside a multi-byte UTF-8 sequence, so a
/// character split across chunks is always decoded whole.
#[derive(Debug, Default)]
pub struct LineDecoder {
    pending: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and drain every complete, non-blank line.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            push_line(&mut lines, &self.pending[start..end]);
            start = end + 1;
        }
        self.pending.drain(..start);

        lines
    }

    /// Flush whatever is left once the body has ended.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        let mut lines = Vec::with_capacity(1);
        push_line(&mut lines, &rest);
        lines.pop()
    }

    /// Number of bytes waiting for a line terminator.
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }
}

fn push_line(lines: &mut Vec<String>, bytes: &[u8]) {
    let text = String::from_utf8_lossy(bytes);
    if !text.trim().is_empty() {
        lines.push(text.into_owned());
    }
}

/// Lazy sequence of [`TransportRecord`]s over a chunked body.
///
/// [`next`](Self::next) is the only suspension point: it awaits a new
/// chunk only when every line decoded from earlier chunks has been handed
/// out. Lines that fail to parse are logged and skipped.
pub struct RecordStream {
    source: ByteStream,
    lines: LineDecoder,
    ready: VecDeque<String>,
    exhausted: bool,
}

impl RecordStream {
    pub fn new(source: ByteStream) -> Self {
        Self {
            source,
            lines: LineDecoder::new(),
            ready: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Pull the next record.
    ///
    /// Returns `None` once the body has ended and all buffered lines are
    /// drained. A transport error is yielded once and ends the sequence.
    pub async fn next(&mut self) -> Option<Result<TransportRecord>> {
        loop {
            while let Some(line) = self.ready.pop_front() {
                match TransportRecord::parse(&line) {
                    Ok(record) => return Some(Ok(record)),
                    Err(e) => warn!(error = %e, line = %line, "skipping malformed transport line"),
                }
            }

            if self.exhausted {
                return None;
            }

            match self.source.next().await {
                Some(Ok(chunk)) => {
                    trace!("transport chunk: {} bytes", chunk.len());
                    self.ready.extend(self.lines.feed(&chunk));
                }
                Some(Err(e)) => {
                    self.exhausted = true;
                    self.lines = LineDecoder::new();
                    return Some(Err(e));
                }
                None => {
                    self.exhausted = true;
                    self.ready.extend(self.lines.finish());
                }
            }
        }
    }

    /// Drain the remaining records, stopping at the first transport error.
    pub async fn collect(mut self) -> Result<Vec<TransportRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await {
            records.push(record?);
        }
        Ok(records)
    }
}
