//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, program input mode
//! - **[`panes`]**: stateless render functions for each visible pane (program listing,
//!   stack, heap, backtrace, program output, console, status bar)
//! - **[`history`]**: Up/Down recall of console commands
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a [`Debugger`] and
//! call [`App::run`] to start the event loop.
//!
//! [`Debugger`]: crate::debugger::Debugger
//! [`App::run`]: app::App::run

pub mod app;
pub mod history;
pub mod panes;
pub mod theme;

pub use app::App;
