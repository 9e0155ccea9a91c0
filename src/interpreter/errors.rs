//! Stop conditions of the Whitespace machine
//!
//! This module defines [`Stop`], the reason a call to `step`, `next` or
//! `continue` returned without finishing normally. Most variants are fatal:
//! they end the run and the machine becomes not-running (see
//! [`Stop::halts_machine`]). A few are pauses that leave the machine running:
//! a breakpoint, a request for more input, or a used-up step budget.

use crate::program::opcode::DecodeError;
use std::fmt;

/// Why execution stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop {
    /// Unrecognized opcode byte or malformed operand prefix
    SyntaxError,

    /// An instruction needed more data stack or backtrace depth than present
    StackUnderflow,

    /// Call or jump target has no matching label mark
    LabelNotFound,

    /// The instruction pointer ran off the end of the program
    UnexpectedEnd,

    /// The instruction at `at` carries a breakpoint and was not executed
    Breakpoint { at: usize },

    /// The end-program instruction was executed
    Exit,

    /// Division or modulo by zero
    DivisionByZero,

    /// A heap address was negative or not representable
    InvalidAddress,

    /// A heap address lies beyond the configured heap size
    HeapExhausted { address: usize, limit: usize },

    /// Number input was not a decimal integer, or input ended
    InvalidInput,

    /// An input instruction is waiting for more input (not a real error)
    NeedsInput,

    /// The step budget was used up (not a real error)
    Yielded,

    /// The user interrupted a running command (not a real error)
    Interrupted,

    /// `step` was called while no program is being run
    NotRunning,
}

impl Stop {
    /// Whether this stop ends the run
    pub fn halts_machine(&self) -> bool {
        !matches!(
            self,
            Stop::Breakpoint { .. }
                | Stop::NeedsInput
                | Stop::Yielded
                | Stop::Interrupted
                | Stop::NotRunning
        )
    }

    /// Whether the report for this stop includes the current instruction and
    /// a stack dump
    pub fn shows_location(&self) -> bool {
        !matches!(self, Stop::Exit | Stop::UnexpectedEnd | Stop::NotRunning)
    }
}

impl From<DecodeError> for Stop {
    fn from(error: DecodeError) -> Self {
        match error {
            DecodeError::Syntax => Stop::SyntaxError,
            DecodeError::Truncated => Stop::UnexpectedEnd,
        }
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stop::SyntaxError => write!(f, "Syntax Error, cannot continue."),
            Stop::StackUnderflow => write!(f, "Stack Underflown, unable to continue."),
            Stop::LabelNotFound => write!(
                f,
                "Requested label couldn't be found, cannot continue."
            ),
            Stop::UnexpectedEnd => write!(
                f,
                "Program didn't end on \\n\\n\\n, but no more bits to execute, stop."
            ),
            Stop::Breakpoint { at } => write!(f, "Breakpoint at 0x{:04x} reached.", at),
            Stop::Exit => write!(f, "Program exited normally."),
            Stop::DivisionByZero => write!(f, "Division by zero, cannot continue."),
            Stop::InvalidAddress => write!(
                f,
                "Heap address is negative or out of range, cannot continue."
            ),
            Stop::HeapExhausted { address, limit } => write!(
                f,
                "Heap address 0x{:x} exceeds the heap limit of {} cells, cannot continue.",
                address, limit
            ),
            Stop::InvalidInput => write!(f, "Input is not a number, cannot continue."),
            Stop::NeedsInput => write!(f, "Program is waiting for input."),
            Stop::Yielded => write!(f, "Program is still running."),
            Stop::Interrupted => write!(f, "Program interrupted."),
            Stop::NotRunning => write!(f, "The program is not being run."),
        }
    }
}

impl std::error::Error for Stop {}
