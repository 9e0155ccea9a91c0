//! # Introduction
//!
//! wsdebug loads a [Whitespace](https://en.wikipedia.org/wiki/Whitespace_(programming_language))
//! program and lets you run it under a debugger: breakpoints, single steps,
//! stepping over calls, and a view of the data stack, heap and call stack.
//! The full-screen interface is built with [ratatui](https://docs.rs/ratatui);
//! a plain line-oriented mode speaks the same command language.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Program (lines) → Machine ⇄ Debugger → TUI / REPL
//! ```
//!
//! 1. [`program`]: strips comment bytes, segments instructions and decodes
//!    them into typed [`program::Instruction`]s.
//! 2. [`memory`]: the [`memory::Number`] back ends (`i64` and `BigInt`), the
//!    growable [`memory::Stack`] and the [`memory::Heap`].
//! 3. [`interpreter`]: the [`interpreter::Machine`] with its label cache,
//!    breakpoint table and buffered I/O.
//! 4. [`debugger`]: command parsing, execution control and console reports.
//! 5. [`repl`] and [`ui`]: the plain and full-screen front ends; not part of
//!    the stable library API. [`logging`] sets up the log file.
//!
//! ## Commands
//!
//! `break <addr>`, `continue`/`cont`, `exit`/`quit`, `file <path>`, `help`,
//! `kill`, `list <addr>`, `next`, `run`, `step`. An empty line repeats the
//! previous command.

pub mod debugger;
pub mod interpreter;
pub mod logging;
pub mod memory;
pub mod program;
pub mod repl;
pub mod ui;
