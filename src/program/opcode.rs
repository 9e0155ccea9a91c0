//! Instruction decoding
//!
//! A Whitespace instruction starts with an instruction modification parameter
//! (IMP) selecting one of five groups:
//!
//! ```text
//! [SPACE]         stack manipulation
//! [TAB][SPACE]    arithmetic
//! [TAB][TAB]      heap access
//! [TAB][LF]       I/O
//! [LF]            flow control
//! ```
//!
//! followed by the command bytes and, for some commands, a literal. Literals
//! are SPACE (0) / TAB (1) bits, most significant first, terminated by LF.
//! Numbers carry a leading sign bit (SPACE positive, TAB negative); labels do
//! not and are compared as raw byte patterns.

use crate::memory::Number;
use std::fmt;
use std::ops::Range;

pub const SPACE: u8 = b' ';
pub const TAB: u8 = b'\t';
pub const LF: u8 = b'\n';

/// Why an instruction could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Unrecognized command byte or malformed operand prefix
    Syntax,
    /// The buffer ended in the middle of the instruction
    Truncated,
}

/// A label operand: the bit bytes without the LF terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub bits: Vec<u8>,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(".")?;
        for &b in &self.bits {
            f.write_str(if b == TAB { "T" } else { "S" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StackOp<N> {
    Push(N),
    Duplicate,
    Copy(usize),
    Swap,
    Discard,
    Slide(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOp {
    Store,
    Retrieve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    OutputChar,
    OutputNumber,
    ReadChar,
    ReadNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOp {
    Mark(Label),
    Call(Label),
    Jump(Label),
    JumpIfZero(Label),
    JumpIfNegative(Label),
    Return,
    End,
}

/// A decoded instruction, grouped by IMP
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction<N> {
    Stack(StackOp<N>),
    Arith(ArithOp),
    Heap(HeapOp),
    Io(IoOp),
    Flow(FlowOp),
}

/// An instruction together with the number of bytes it occupies
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<N> {
    pub instruction: Instruction<N>,
    pub width: usize,
}

fn byte_at(bytes: &[u8], index: usize) -> Result<u8, DecodeError> {
    bytes.get(index).copied().ok_or(DecodeError::Truncated)
}

/// Locate the bits of a literal starting at `at`. Returns the range of the
/// bits (excluding the terminator); the terminator sits at `range.end`.
pub fn literal_bits(bytes: &[u8], at: usize) -> Result<Range<usize>, DecodeError> {
    let mut end = at;
    loop {
        match byte_at(bytes, end)? {
            LF => return Ok(at..end),
            SPACE | TAB => end += 1,
            _ => return Err(DecodeError::Syntax),
        }
    }
}

/// Decode a signed number literal whose sign bit is at `at`
fn signed_number<N: Number>(bytes: &[u8], at: usize) -> Result<(N, usize), DecodeError> {
    let negative = match byte_at(bytes, at)? {
        SPACE => false,
        TAB => true,
        _ => return Err(DecodeError::Syntax),
    };
    let bits = literal_bits(bytes, at + 1)?;
    let mut value = N::default();
    for &b in &bytes[bits.clone()] {
        value.push_bit(b == TAB);
    }
    if negative {
        value = value.negate();
    }
    Ok((value, bits.end + 1))
}

/// Decode an unsigned count (copy/slide argument). The sign bit must be SPACE.
fn count(bytes: &[u8], at: usize) -> Result<(usize, usize), DecodeError> {
    if byte_at(bytes, at)? != SPACE {
        return Err(DecodeError::Syntax);
    }
    let bits = literal_bits(bytes, at + 1)?;
    let value = bytes[bits.clone()].iter().fold(0usize, |acc, &b| {
        acc.saturating_mul(2).saturating_add((b == TAB) as usize)
    });
    Ok((value, bits.end + 1))
}

fn label(bytes: &[u8], at: usize) -> Result<(Label, usize), DecodeError> {
    let bits = literal_bits(bytes, at)?;
    let next = bits.end + 1;
    Ok((
        Label {
            bits: bytes[bits].to_vec(),
        },
        next,
    ))
}

/// Decode the instruction starting at `at`
pub fn decode<N: Number>(bytes: &[u8], at: usize) -> Result<Decoded<N>, DecodeError> {
    let (instruction, end) = match byte_at(bytes, at)? {
        SPACE => decode_stack(bytes, at + 1)?,
        TAB => match byte_at(bytes, at + 1)? {
            SPACE => decode_arith(bytes, at + 2)?,
            TAB => decode_heap(bytes, at + 2)?,
            LF => decode_io(bytes, at + 2)?,
            _ => return Err(DecodeError::Syntax),
        },
        LF => decode_flow(bytes, at + 1)?,
        _ => return Err(DecodeError::Syntax),
    };
    Ok(Decoded {
        instruction,
        width: end - at,
    })
}

fn decode_stack<N: Number>(bytes: &[u8], at: usize) -> Result<(Instruction<N>, usize), DecodeError> {
    let op = match byte_at(bytes, at)? {
        SPACE => {
            let (value, end) = signed_number(bytes, at + 1)?;
            return Ok((Instruction::Stack(StackOp::Push(value)), end));
        }
        LF => match byte_at(bytes, at + 1)? {
            SPACE => StackOp::Duplicate,
            TAB => StackOp::Swap,
            LF => StackOp::Discard,
            _ => return Err(DecodeError::Syntax),
        },
        TAB => {
            let (n, end) = match byte_at(bytes, at + 1)? {
                SPACE => {
                    let (n, end) = count(bytes, at + 2)?;
                    (StackOp::Copy(n), end)
                }
                LF => {
                    let (n, end) = count(bytes, at + 2)?;
                    (StackOp::Slide(n), end)
                }
                _ => return Err(DecodeError::Syntax),
            };
            return Ok((Instruction::Stack(n), end));
        }
        _ => return Err(DecodeError::Syntax),
    };
    Ok((Instruction::Stack(op), at + 2))
}

fn decode_arith<N>(bytes: &[u8], at: usize) -> Result<(Instruction<N>, usize), DecodeError> {
    let op = match (byte_at(bytes, at)?, byte_at(bytes, at + 1)?) {
        (SPACE, SPACE) => ArithOp::Add,
        (SPACE, TAB) => ArithOp::Sub,
        (SPACE, LF) => ArithOp::Mul,
        (TAB, SPACE) => ArithOp::Div,
        (TAB, TAB) => ArithOp::Mod,
        _ => return Err(DecodeError::Syntax),
    };
    Ok((Instruction::Arith(op), at + 2))
}

fn decode_heap<N>(bytes: &[u8], at: usize) -> Result<(Instruction<N>, usize), DecodeError> {
    let op = match byte_at(bytes, at)? {
        SPACE => HeapOp::Store,
        TAB => HeapOp::Retrieve,
        _ => return Err(DecodeError::Syntax),
    };
    Ok((Instruction::Heap(op), at + 1))
}

fn decode_io<N>(bytes: &[u8], at: usize) -> Result<(Instruction<N>, usize), DecodeError> {
    let op = match (byte_at(bytes, at)?, byte_at(bytes, at + 1)?) {
        (SPACE, SPACE) => IoOp::OutputChar,
        (SPACE, TAB) => IoOp::OutputNumber,
        (TAB, SPACE) => IoOp::ReadChar,
        (TAB, TAB) => IoOp::ReadNumber,
        _ => return Err(DecodeError::Syntax),
    };
    Ok((Instruction::Io(op), at + 2))
}

fn decode_flow<N>(bytes: &[u8], at: usize) -> Result<(Instruction<N>, usize), DecodeError> {
    let with_label: fn(Label) -> FlowOp = match (byte_at(bytes, at)?, byte_at(bytes, at + 1)?) {
        (SPACE, SPACE) => FlowOp::Mark,
        (SPACE, TAB) => FlowOp::Call,
        (SPACE, LF) => FlowOp::Jump,
        (TAB, SPACE) => FlowOp::JumpIfZero,
        (TAB, TAB) => FlowOp::JumpIfNegative,
        (TAB, LF) => return Ok((Instruction::Flow(FlowOp::Return), at + 2)),
        (LF, LF) => return Ok((Instruction::Flow(FlowOp::End), at + 2)),
        _ => return Err(DecodeError::Syntax),
    };
    let (target, end) = label(bytes, at + 2)?;
    Ok((Instruction::Flow(with_label(target)), end))
}

/// Width of the instruction at `at`, independent of the numeric back end
pub fn instruction_width(bytes: &[u8], at: usize) -> Result<usize, DecodeError> {
    decode::<i64>(bytes, at).map(|decoded| decoded.width)
}

impl<N: fmt::Display> fmt::Display for Instruction<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Stack(op) => match op {
                StackOp::Push(n) => write!(f, "push {}", n),
                StackOp::Duplicate => f.write_str("dup"),
                StackOp::Copy(n) => write!(f, "copy {}", n),
                StackOp::Swap => f.write_str("swap"),
                StackOp::Discard => f.write_str("drop"),
                StackOp::Slide(n) => write!(f, "slide {}", n),
            },
            Instruction::Arith(op) => f.write_str(match op {
                ArithOp::Add => "add",
                ArithOp::Sub => "sub",
                ArithOp::Mul => "mul",
                ArithOp::Div => "div",
                ArithOp::Mod => "mod",
            }),
            Instruction::Heap(HeapOp::Store) => f.write_str("store"),
            Instruction::Heap(HeapOp::Retrieve) => f.write_str("retrieve"),
            Instruction::Io(op) => f.write_str(match op {
                IoOp::OutputChar => "outc",
                IoOp::OutputNumber => "outn",
                IoOp::ReadChar => "readc",
                IoOp::ReadNumber => "readn",
            }),
            Instruction::Flow(op) => match op {
                FlowOp::Mark(l) => write!(f, "label {}", l),
                FlowOp::Call(l) => write!(f, "call {}", l),
                FlowOp::Jump(l) => write!(f, "jmp {}", l),
                FlowOp::JumpIfZero(l) => write!(f, "jz {}", l),
                FlowOp::JumpIfNegative(l) => write!(f, "jn {}", l),
                FlowOp::Return => f.write_str("ret"),
                FlowOp::End => f.write_str("end"),
            },
        }
    }
}
