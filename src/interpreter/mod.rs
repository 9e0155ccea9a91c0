//! Whitespace virtual machine
//!
//! This module provides the execution side of the debugger:
//! - [`engine`]: the [`Machine`] that steps instructions
//! - [`errors`]: the [`Stop`] conditions returned by the engine
//! - [`labels`]: the label resolution cache
//! - [`breakpoints`]: the breakpoint side table
//! - [`io`]: buffered program input and output
//!
//! # Execution Model
//!
//! The machine keeps a backtrace stack whose top is the instruction pointer.
//! A call pushes the target, a return pops back to the caller and moves past
//! its call instruction. Everything the program reads comes from an input
//! queue filled by the front end, so a read with no data pauses the machine
//! instead of blocking.

pub mod breakpoints;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod io;
pub mod labels;

pub use engine::{Machine, RunMode};
pub use errors::Stop;
