//! Token-per-token rendering of instruction lines
//!
//! Whitespace is invisible, so the debugger shows each byte as a token:
//! `[SPACE]`, `[TAB]` and `[LF]`. A line is cut after [`MAX_LINE_TOKENS`]
//! tokens and marked with `...`.

use super::opcode::{LF, SPACE, TAB};
use super::Program;
use crate::memory::Number;

/// Tokens printed per line before the ellipsis
pub const MAX_LINE_TOKENS: usize = 7;

/// Marker shown in front of a line carrying a breakpoint
pub const BREAKPOINT_MARKER: &str = "<break-point>";

/// Token text for one program byte
pub fn token(byte: u8) -> &'static str {
    match byte {
        SPACE => "[SPACE]",
        TAB => "[TAB]",
        LF => "[LF]",
        _ => "[?]",
    }
}

/// Render the bytes of one instruction as tokens, cut after
/// [`MAX_LINE_TOKENS`]
pub fn tokens(bytes: &[u8]) -> String {
    let mut out: String = bytes
        .iter()
        .take(MAX_LINE_TOKENS)
        .map(|&b| token(b))
        .collect();
    if bytes.len() > MAX_LINE_TOKENS {
        out.push_str("...");
    }
    out
}

/// `[ip=0x0005]: [TAB][LF][SPACE][TAB]` for the line starting at `start`
pub fn render_line(program: &Program, start: usize, breakpoint: bool) -> String {
    let end = program.line_end(start);
    let mut line = format!("[ip=0x{:04x}]: ", start);
    if breakpoint {
        line.push_str(BREAKPOINT_MARKER);
    }
    line.push_str(&tokens(&program.bytes()[start.min(end)..end]));
    line
}

/// Decoded mnemonic of the line at `start`, or `???` when it does not decode
pub fn mnemonic<N: Number>(program: &Program, start: usize) -> String {
    match program.decode::<N>(start) {
        Ok(decoded) => decoded.instruction.to_string(),
        Err(_) => String::from("???"),
    }
}

/// Instruction line starts for a listing of `count` lines around `address`.
/// The listing scrolls back half of `count` lines from the line containing
/// `address`.
pub fn window(program: &Program, address: usize, count: usize) -> &[usize] {
    if program.is_empty() || count == 0 {
        return &[];
    }
    let lines = program.lines();
    let center = program.line_index(program.line_begin(address));
    let last = (center.saturating_sub(count / 2) + count).min(lines.len());
    let first = last.saturating_sub(count);
    &lines[first..last]
}
