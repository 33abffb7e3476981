use memchr::memchr;
use tracing::debug;

/// Reassembles complete text lines from arbitrarily-chunked bytes.
///
/// Chunk boundaries carry no meaning: a partial line (or a partial
/// multi-byte character) stays buffered until its terminating newline
/// arrives. An unterminated line left over when the stream ends is dropped.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, draining every line it completes.
    ///
    /// Lines that are not valid UTF-8 are skipped; a bad line never takes
    /// the rest of the stream down with it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = memchr(b'\n', &self.buf) {
            match std::str::from_utf8(&self.buf[..pos]) {
                Ok(line) => {
                    let line = line.strip_suffix('\r').unwrap_or(line);
                    lines.push(line.to_string());
                }
                Err(e) => {
                    debug!(error = %e, "skipping non-UTF-8 line");
                }
            }
            self.buf.drain(..=pos);
        }
        lines
    }
}

/// Extracts the payload of a `data: ` line. Anything else (blank keep-alive
/// lines, other SSE fields) is not a frame.
pub fn frame_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data: ")
}
