//! Loaded Whitespace programs
//!
//! This module turns source files into executable [`Program`] buffers:
//! - [`opcode`]: decoding of single instructions into [`Instruction`]s
//! - [`listing`]: token-per-token rendering of instruction lines
//!
//! # Loading
//!
//! Only SPACE, TAB and LF are significant; every other byte is a comment and
//! is dropped by [`Program::from_source`]. The remaining stream is segmented
//! into instruction *lines*: `lines[i]` is the offset of the i-th instruction.
//! A malformed instruction is cut at the next LF so that the rest of the
//! program still segments; executing it reports a syntax error.

pub mod listing;
pub mod opcode;

use crate::memory::Number;
use opcode::{DecodeError, Decoded, LF, SPACE, TAB};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use opcode::Instruction;

/// Errors raised while loading a program file
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened or read
    Unreadable { path: PathBuf, source: io::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Unreadable { path, .. } => {
                write!(f, "{}: unable to open file", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Unreadable { source, .. } => Some(source),
        }
    }
}

/// A loaded program: significant bytes plus the instruction line table
#[derive(Debug, Clone, Default)]
pub struct Program {
    bytes: Vec<u8>,
    lines: Vec<usize>,
    name: String,
}

impl Program {
    /// Build a program from raw source text, dropping comment bytes
    pub fn from_source(source: &[u8]) -> Self {
        let bytes: Vec<u8> = source
            .iter()
            .copied()
            .filter(|b| matches!(*b, SPACE | TAB | LF))
            .collect();
        let lines = segment(&bytes);
        Program {
            bytes,
            lines,
            name: String::from("<memory>"),
        }
    }

    /// Read and build a program from a file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let source = fs::read(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut program = Self::from_source(&source);
        program.name = path.display().to_string();
        tracing::info!(
            path = %path.display(),
            bytes = program.len(),
            instructions = program.lines.len(),
            "program loaded"
        );
        Ok(program)
    }

    /// Display name (file path, or `<memory>`)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offsets of all instruction starts, ascending
    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    /// Index into [`Program::lines`] of the line containing `address`
    pub fn line_index(&self, address: usize) -> usize {
        self.lines
            .partition_point(|&start| start <= address)
            .saturating_sub(1)
    }

    /// Map an address to the start of the instruction line containing it.
    /// Addresses at or past the end clamp to the last byte; an empty program
    /// maps everything to 0.
    pub fn line_begin(&self, address: usize) -> usize {
        if self.bytes.is_empty() {
            return 0;
        }
        let address = address.min(self.bytes.len() - 1);
        self.lines[self.line_index(address)]
    }

    /// Offset just past the line starting at or containing `address`
    pub fn line_end(&self, address: usize) -> usize {
        let next = self.lines.partition_point(|&start| start <= address);
        self.lines.get(next).copied().unwrap_or(self.bytes.len())
    }

    /// Decode the instruction starting at `at`
    pub fn decode<N: Number>(&self, at: usize) -> Result<Decoded<N>, DecodeError> {
        opcode::decode(&self.bytes, at)
    }
}

/// Split a filtered byte stream into instruction start offsets
fn segment(bytes: &[u8]) -> Vec<usize> {
    let mut lines = Vec::new();
    let mut at = 0;
    while at < bytes.len() {
        lines.push(at);
        let width = match opcode::instruction_width(bytes, at) {
            Ok(width) => width,
            // resynchronise after the next LF
            Err(_) => bytes[at..]
                .iter()
                .position(|&b| b == LF)
                .map_or(bytes.len() - at, |lf| lf + 1),
        };
        at += width.max(1);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_are_dropped() {
        let program = Program::from_source(b"push\t one\n\n\nend");
        assert_eq!(program.bytes(), b"\t \n\n\n");
    }

    #[test]
    fn test_segmentation() {
        // push 1; outn; end
        let program = Program::from_source(b"   \t\n\t\n \t\n\n\n");
        assert_eq!(program.lines(), &[0, 5, 9]);
        assert_eq!(program.line_end(0), 5);
        assert_eq!(program.line_end(9), program.len());
    }

    #[test]
    fn test_line_begin() {
        let program = Program::from_source(b"   \t\n\t\n \t\n\n\n");
        assert_eq!(program.line_begin(0), 0);
        assert_eq!(program.line_begin(3), 0);
        assert_eq!(program.line_begin(5), 5);
        assert_eq!(program.line_begin(7), 5);
        assert_eq!(program.line_begin(11), 9);
        assert_eq!(program.line_begin(500), 9);
        assert_eq!(Program::default().line_begin(7), 0);
    }

    #[test]
    fn test_malformed_instruction_resyncs_at_lf() {
        // [TAB][TAB][LF] is not a heap command; the push after it still segments
        let program = Program::from_source(b"\t\t\n   \t\n");
        assert_eq!(program.lines(), &[0, 3]);
    }
}
