//! Program input and output buffers
//!
//! The engine never touches the process's stdin/stdout directly. Input
//! instructions read from an [`InputQueue`] that the front end fills, and
//! output instructions append to a [`ProgramOutput`] the front end drains.
//! When an input instruction finds the queue short of data it reports
//! [`Read::Pending`] and the engine pauses until more input arrives.
//!
//! Drained output is not kept as bytes. [`ProgramOutput`] only remembers the
//! last [`OUTPUT_SCROLLBACK`] lines for display.

use super::constants::{MAX_OUTPUT_LINE, OUTPUT_SCROLLBACK};
use std::borrow::Cow;
use std::collections::VecDeque;

/// Result of reading from the input queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Read<T> {
    Ready(T),
    /// Not enough buffered input yet
    Pending,
    /// The input was closed and nothing is left
    Eof,
}

/// Bytes typed (or piped) for the debugged program
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    buffer: VecDeque<u8>,
    closed: bool,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append input bytes
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Mark the input as finished; reads past the buffered data see EOF
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn read_byte(&mut self) -> Read<u8> {
        match self.buffer.pop_front() {
            Some(b) => Read::Ready(b),
            None if self.closed => Read::Eof,
            None => Read::Pending,
        }
    }

    /// Read one whitespace-delimited token. Leading ASCII whitespace,
    /// newlines included, is skipped; the delimiter after the token stays
    /// buffered. A token at the very end is returned once the input is
    /// closed.
    pub fn read_token(&mut self) -> Read<String> {
        while self.buffer.front().is_some_and(u8::is_ascii_whitespace) {
            self.buffer.pop_front();
        }
        let end = match self.buffer.iter().position(u8::is_ascii_whitespace) {
            Some(end) => end,
            None if !self.closed => return Read::Pending,
            None if self.buffer.is_empty() => return Read::Eof,
            None => self.buffer.len(),
        };
        let token: Vec<u8> = self.buffer.drain(..end).collect();
        Read::Ready(String::from_utf8_lossy(&token).into_owned())
    }
}

/// Output of the debugged program: bytes not yet taken by the front end,
/// plus a bounded line scrollback for display
#[derive(Debug, Clone)]
pub struct ProgramOutput {
    pending: Vec<u8>,
    lines: VecDeque<String>,
    /// Bytes of the unfinished last line
    partial: Vec<u8>,
    max_lines: usize,
}

impl ProgramOutput {
    pub fn new() -> Self {
        Self::with_scrollback(OUTPUT_SCROLLBACK)
    }

    /// Keep at most `max_lines` finished lines for display
    pub fn with_scrollback(max_lines: usize) -> Self {
        ProgramOutput {
            pending: Vec::new(),
            lines: VecDeque::new(),
            partial: Vec::new(),
            max_lines: max_lines.max(1),
        }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        for &b in bytes {
            if b == b'\n' {
                self.finish_line();
            } else {
                self.partial.push(b);
                if self.partial.len() >= MAX_OUTPUT_LINE {
                    self.finish_line();
                }
            }
        }
    }

    fn finish_line(&mut self) {
        let line = String::from_utf8_lossy(&self.partial).into_owned();
        self.partial.clear();
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    /// Take the bytes written since the last call
    pub fn take_pending(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pending)
    }

    /// Bytes written since the last [`ProgramOutput::take_pending`]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Number of lines [`ProgramOutput::lines`] yields
    pub fn line_count(&self) -> usize {
        self.lines.len() + usize::from(!self.partial.is_empty())
    }

    /// Scrollback lines, oldest first, ending with the unfinished line
    pub fn lines(&self) -> impl Iterator<Item = Cow<'_, str>> {
        let partial = (!self.partial.is_empty()).then(|| String::from_utf8_lossy(&self.partial));
        self.lines
            .iter()
            .map(|line| Cow::Borrowed(line.as_str()))
            .chain(partial)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.lines.clear();
        self.partial.clear();
    }
}

impl Default for ProgramOutput {
    fn default() -> Self {
        Self::new()
    }
}
