//! Chunked content streaming.
//!
//! [`ContentStream`] turns any byte source into a lazy sequence of UTF-8
//! chunks so that large response bodies never have to be held in memory as
//! one string. [`scan_content`] runs the error/expected text checks over such
//! a sequence, carrying only a small window between chunks.

use std::io::{self, Read};

/// Maximum number of bytes read from the source per chunk.
pub const CHUNK_SIZE: usize = 4096;

/// Forward-only, non-restartable sequence of content chunks.
///
/// The sequence ends when the source reports end of input or a read fails.
/// A failed read is logged, the source is dropped (closing it) and iteration
/// stops; the error is not returned to the caller. A multi-byte character
/// split across two reads is carried over so that concatenating every chunk
/// yields the full body.
pub struct ContentStream<R> {
    source: Option<R>,
    pending: Vec<u8>,
}

impl<R: Read> ContentStream<R> {
    pub fn new(source: R) -> Self {
        Self {
            source: Some(source),
            pending: Vec::with_capacity(CHUNK_SIZE),
        }
    }

    /// Drains the stream into one string. Only for callers that need the whole body.
    pub fn collect_all(self) -> String {
        self.collect()
    }

    fn close(&mut self) -> Option<String> {
        self.source = None;
        if self.pending.is_empty() {
            return None;
        }
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(rest)
    }
}

impl<R: Read> Iterator for ContentStream<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let room = CHUNK_SIZE - self.pending.len();
            let source = match self.source.as_mut() {
                Some(source) => source,
                None => return None,
            };
            match source.read(&mut buf[..room]) {
                Ok(0) => return self.close(),
                Ok(n) => {
                    self.pending.extend_from_slice(&buf[..n]);
                    let text = take_decoded(&mut self.pending);
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::error!(error = %e, "unable to fetch next chunk of content");
                    return self.close();
                }
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for ContentStream<R> {}

/// Decodes everything in `pending` except an incomplete trailing character,
/// which is left in place for the next read.
fn take_decoded(pending: &mut Vec<u8>) -> String {
    let tail = incomplete_tail_len(pending);
    let keep = pending.split_off(pending.len() - tail);
    let text = String::from_utf8_lossy(pending).into_owned();
    *pending = keep;
    text
}

fn incomplete_tail_len(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let b = bytes[bytes.len() - back];
        if b & 0b1100_0000 == 0b1000_0000 {
            continue;
        }
        let width = match b {
            0xF0..=0xFF => 4,
            0xE0..=0xEF => 3,
            0xC0..=0xDF => 2,
            _ => 1,
        };
        return if width > back { back } else { 0 };
    }
    0
}

/// Outcome of searching a body for the error and expected response texts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentScan {
    /// Non-empty error text was found in the body.
    pub error_text_present: bool,
    /// Expected text was found, or none was specified.
    pub expected_text_present: bool,
}

impl ContentScan {
    pub fn has_expected_content(&self) -> bool {
        !self.error_text_present && self.expected_text_present
    }
}

/// Searches `chunks` for `error_text` and `expected_text` without buffering
/// the whole body. Empty texts are not searched for: an empty error text is
/// never present and an empty expected text is always present.
///
/// Stops pulling chunks once both answers are known.
pub fn scan_content<I, S>(chunks: I, error_text: &str, expected_text: &str) -> ContentScan
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut error = SubstringFinder::new(error_text);
    let mut expected = SubstringFinder::new(expected_text);

    for chunk in chunks {
        let chunk = chunk.as_ref();
        error.feed(chunk);
        expected.feed(chunk);
        if error.settled() && expected.settled() {
            break;
        }
    }

    ContentScan {
        error_text_present: !error_text.is_empty() && error.found,
        expected_text_present: expected_text.is_empty() || expected.found,
    }
}

/// Substring search across chunk boundaries; keeps the last `needle.len() - 1` bytes.
struct SubstringFinder<'a> {
    needle: &'a str,
    window: String,
    found: bool,
}

impl<'a> SubstringFinder<'a> {
    fn new(needle: &'a str) -> Self {
        Self {
            needle,
            window: String::new(),
            found: false,
        }
    }

    fn settled(&self) -> bool {
        self.found || self.needle.is_empty()
    }

    fn feed(&mut self, chunk: &str) {
        if self.settled() {
            return;
        }
        self.window.push_str(chunk);
        if self.window.contains(self.needle) {
            self.found = true;
            self.window.clear();
            return;
        }
        let mut start = self.window.len().saturating_sub(self.needle.len() - 1);
        while !self.window.is_char_boundary(start) {
            start -= 1;
        }
        self.window.drain(..start);
    }
}
