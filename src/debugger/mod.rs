//! Interactive debugger on top of the Whitespace machine
//!
//! [`Debugger`] evaluates command lines (`break`, `run`, `step`, ...) against a
//! [`Machine`] and collects everything it has to say in a console buffer that
//! front ends drain and display.
//!
//! # Long-running commands
//!
//! `run`, `continue`, `next` and `step` do not execute inside [`Debugger::eval`].
//! They become the *active* command and make progress through
//! [`Debugger::pump`], a budget of steps at a time, so a front end can keep
//! polling for interrupts. A read instruction without input parks the active
//! command in [`Flow::AwaitingInput`] until [`Debugger::feed_input`] or
//! [`Debugger::close_input`] is called.

pub mod commands;
pub mod report;

use crate::interpreter::breakpoints::{BreakpointError, BreakpointSet};
use crate::interpreter::constants::{MachineConfig, LIST_LINES};
use crate::interpreter::{Machine, RunMode, Stop};
use crate::memory::Number;
use crate::program::Program;
use commands::CommandKind;
use std::path::Path;

/// What the debugger is doing after a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Ready for the next command
    Idle,
    /// A command is active; call [`Debugger::pump`]
    Busy,
    /// The active command waits for program input
    AwaitingInput,
    /// The user asked to leave
    Quit,
}

/// Command controller owning the machine for the loaded program
pub struct Debugger<N: Number> {
    machine: Machine<N>,
    config: MachineConfig,
    console: Vec<String>,
    last_line: Option<String>,
    active: Option<RunMode>,
    last_stop: Option<Stop>,
}

impl<N: Number> Debugger<N> {
    pub fn new(program: Program, config: MachineConfig) -> Self {
        Debugger {
            machine: Machine::new(program, config),
            config,
            console: Vec::new(),
            last_line: None,
            active: None,
            last_stop: None,
        }
    }

    pub fn machine(&self) -> &Machine<N> {
        &self.machine
    }

    /// Stop condition that ended the most recent command, if any
    pub fn last_stop(&self) -> Option<&Stop> {
        self.last_stop.as_ref()
    }

    /// Whether a command is active (running or waiting for input)
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Console lines produced since the last call
    pub fn take_console(&mut self) -> Vec<String> {
        std::mem::take(&mut self.console)
    }

    /// Program output produced since the last call
    pub fn take_output(&mut self) -> Vec<u8> {
        self.machine.output_mut().take_pending()
    }

    fn say(&mut self, line: impl Into<String>) {
        self.console.push(line.into());
    }

    /// Evaluate one command line. An empty line repeats the previous one.
    pub fn eval(&mut self, line: &str) -> Flow {
        let line = if line.trim().is_empty() {
            match self.last_line.clone() {
                Some(last) => last,
                None => return Flow::Idle,
            }
        } else {
            self.last_line = Some(line.to_string());
            line.to_string()
        };

        let Some((name, argument)) = commands::split(&line) else {
            return Flow::Idle;
        };
        tracing::debug!(command = name, argument, "eval");

        let Some(command) = commands::lookup(name) else {
            self.say(format!("Undefined command: \"{}\".  Try \"help\".", name));
            return Flow::Idle;
        };
        let argument = match (command.takes_arg, argument) {
            (true, None) => {
                self.say(format!(
                    "{} takes an argument, however you didn't supply one.",
                    command.name
                ));
                return Flow::Idle;
            }
            (_, argument) => argument.unwrap_or_default(),
        };
        if command.needs_running && !self.machine.is_running() {
            self.say("The program is not being run, try 'run'.");
            return Flow::Idle;
        }

        self.active = None;
        self.last_stop = None;
        match command.kind {
            CommandKind::Break => self.set_breakpoint(commands::parse_address(argument)),
            CommandKind::Exit => return Flow::Quit,
            CommandKind::File => self.load(Path::new(argument)),
            CommandKind::Help => self.help(),
            CommandKind::Kill => self.machine.reset(),
            CommandKind::List => {
                let lines = report::listing(
                    &self.machine,
                    commands::parse_address(argument),
                    LIST_LINES,
                );
                self.console.extend(lines);
            }
            CommandKind::Run => {
                self.machine.input_mut().clear();
                self.machine.init();
                self.active = Some(RunMode::Continue);
            }
            CommandKind::Continue => self.active = Some(RunMode::Continue),
            CommandKind::Next => {
                let depth = self.machine.backtrace().len();
                self.active = Some(RunMode::Next { depth });
            }
            CommandKind::Step => self.active = Some(RunMode::Step),
        }

        if self.active.is_some() {
            Flow::Busy
        } else {
            Flow::Idle
        }
    }

    /// Let the active command execute at most `budget` instructions
    pub fn pump(&mut self, budget: usize) -> Flow {
        let Some(mode) = self.active else {
            return Flow::Idle;
        };
        match self.machine.resume(mode, budget) {
            Ok(()) => {
                self.active = None;
                let lines = report::location(&self.machine);
                self.console.extend(lines);
                Flow::Idle
            }
            Err(Stop::Yielded) => Flow::Busy,
            Err(Stop::NeedsInput) => Flow::AwaitingInput,
            Err(stop) => {
                self.active = None;
                let lines = report::stop_report(&self.machine, &stop);
                self.console.extend(lines);
                self.last_stop = Some(stop);
                Flow::Idle
            }
        }
    }

    /// Stop the active command; the machine stays where it is
    pub fn interrupt(&mut self) -> Flow {
        if self.active.take().is_some() {
            tracing::info!(ip = self.machine.ip(), "interrupted");
            let lines = report::stop_report(&self.machine, &Stop::Interrupted);
            self.console.extend(lines);
            self.last_stop = Some(Stop::Interrupted);
        }
        Flow::Idle
    }

    /// Hand input to the program, resuming an input-starved command
    pub fn feed_input(&mut self, bytes: &[u8]) -> Flow {
        self.machine.input_mut().feed(bytes);
        self.resumed_flow()
    }

    /// Signal end of program input
    pub fn close_input(&mut self) -> Flow {
        self.machine.input_mut().close();
        self.resumed_flow()
    }

    fn resumed_flow(&self) -> Flow {
        if self.active.is_some() {
            Flow::Busy
        } else {
            Flow::Idle
        }
    }

    fn set_breakpoint(&mut self, address: usize) {
        match self.machine.set_breakpoint(address) {
            Ok(BreakpointSet::Inserted(position)) => {
                self.say(format!("Breakpoint set at 0x{:04x}.", position));
            }
            Ok(BreakpointSet::AlreadySet(position)) => {
                self.say(format!("There already is a breakpoint at 0x{:04x}.", position));
            }
            Err(BreakpointError::PastEnd { .. }) => {
                self.say("cannot set breakpoint behind end of file.");
            }
        }
    }

    fn load(&mut self, path: &Path) {
        match Program::load(path) {
            Ok(program) => {
                self.machine = Machine::new(program, self.config);
                self.say(format!("{}: file successfully loaded.", path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "load failed");
                self.say(e.to_string());
            }
        }
    }

    fn help(&mut self) {
        self.say("list of wsdebug-commands:");
        self.say("");
        for command in commands::COMMANDS {
            if let Some(help) = command.help {
                self.say(format!("{} -- {}", command.name, help));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debugger(source: &[u8]) -> Debugger<i64> {
        Debugger::new(Program::from_source(source), MachineConfig::default())
    }

    #[test]
    fn test_missing_argument() {
        let mut dbg = debugger(b"\n\n\n");
        assert_eq!(dbg.eval("break"), Flow::Idle);
        assert_eq!(
            dbg.take_console(),
            vec!["break takes an argument, however you didn't supply one."]
        );
    }

    #[test]
    fn test_needs_running_program() {
        let mut dbg = debugger(b"\n\n\n");
        assert_eq!(dbg.eval("step"), Flow::Idle);
        assert_eq!(
            dbg.take_console(),
            vec!["The program is not being run, try 'run'."]
        );
    }

    #[test]
    fn test_unknown_command() {
        let mut dbg = debugger(b"\n\n\n");
        dbg.eval("frobnicate now");
        assert_eq!(
            dbg.take_console(),
            vec!["Undefined command: \"frobnicate\".  Try \"help\"."]
        );
    }

    #[test]
    fn test_empty_line_repeats_last_command() {
        // push 1; push 2; end
        let mut dbg = debugger(b"   \t\n   \t \n\n\n\n");
        assert_eq!(dbg.eval("run"), Flow::Busy);
        dbg.eval("break 5");
        dbg.take_console();
        dbg.eval("run");
        assert_eq!(dbg.pump(usize::MAX), Flow::Idle);
        dbg.take_console();
        dbg.eval("step");
        dbg.pump(usize::MAX);
        assert_eq!(dbg.machine().ip(), Some(11));
        dbg.eval("");
        assert_eq!(dbg.pump(usize::MAX), Flow::Idle);
        assert!(!dbg.machine().is_running());
    }

    #[test]
    fn test_exit_and_quit() {
        let mut dbg = debugger(b"\n\n\n");
        assert_eq!(dbg.eval("exit"), Flow::Quit);
        assert_eq!(dbg.eval("quit"), Flow::Quit);
    }

    #[test]
    fn test_interrupt_keeps_machine_running() {
        // label .S; jmp .S
        let mut dbg = debugger(b"\n   \n\n \n \n");
        dbg.eval("run");
        assert_eq!(dbg.pump(50), Flow::Busy);
        assert_eq!(dbg.interrupt(), Flow::Idle);
        assert!(dbg.machine().is_running());
        let console = dbg.take_console();
        assert_eq!(console[0], "Program interrupted.");
        assert_eq!(console.len(), 3);
    }
}
