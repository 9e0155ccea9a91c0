//! Main TUI application state and logic

use crate::debugger::{Debugger, Flow};
use crate::interpreter::Stop;
use crate::program::opcode::IoOp;
use crate::program::Instruction;
use crate::memory::Number;
use crate::repl::PROMPT;
use crate::ui::history::History;
use crate::ui::panes::{self, ConsoleRenderData, ProgramScrollState, StatusRenderData};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Prompt shown while the debugged program waits for a line of input
const INPUT_PROMPT: &str = "input> ";

/// Console log lines kept for scrollback
const CONSOLE_SCROLLBACK: usize = 5_000;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Console,
    Program,
    Stack,
    Heap,
    Backtrace,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (console -> program -> stack -> heap -> backtrace -> output)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Console => FocusedPane::Program,
            FocusedPane::Program => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Heap,
            FocusedPane::Heap => FocusedPane::Backtrace,
            FocusedPane::Backtrace => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Console,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Console => FocusedPane::Output,
            FocusedPane::Program => FocusedPane::Console,
            FocusedPane::Stack => FocusedPane::Program,
            FocusedPane::Heap => FocusedPane::Stack,
            FocusedPane::Backtrace => FocusedPane::Heap,
            FocusedPane::Output => FocusedPane::Backtrace,
        }
    }
}

/// The main application state
pub struct App<N: Number> {
    pub debugger: Debugger<N>,

    /// What the debugger is doing
    pub flow: Flow,

    /// Steps executed per event-loop tick while a command runs
    pub budget: usize,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub program_scroll: ProgramScrollState,
    pub stack_scroll: usize,
    pub heap_scroll: usize,
    pub backtrace_scroll: usize,
    pub output_scroll: usize,
    pub console_scroll: usize,

    /// Everything the debugger printed, oldest first
    pub console: Vec<String>,

    /// Line being typed at the prompt
    pub input: String,

    /// Bytes of `input` already handed to the program by per-key reads
    pub input_fed: usize,

    pub history: History,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl<N: Number> App<N> {
    pub fn new(debugger: Debugger<N>, budget: usize) -> Self {
        App {
            debugger,
            flow: Flow::Idle,
            budget: budget.max(1),
            focused_pane: FocusedPane::Console,
            program_scroll: ProgramScrollState::new(),
            stack_scroll: 0,
            heap_scroll: 0,
            backtrace_scroll: 0,
            output_scroll: 0,
            console_scroll: usize::MAX,
            console: Vec::new(),
            input: String::new(),
            input_fed: 0,
            history: History::new(500),
            should_quit: false,
            status_message: String::from("Ready! Type 'help' for a list of commands."),
        }
    }

    /// Evaluate a command line before the event loop starts (e.g. `run`)
    pub fn submit_command(&mut self, line: &str) {
        self.console.push(format!("{}{}", PROMPT, line));
        self.history.add(line);
        self.flow = self.debugger.eval(line);
        if self.flow == Flow::Quit {
            self.should_quit = true;
        }
        self.drain_console();
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Advance the active command by one slice
            if self.flow == Flow::Busy {
                self.flow = self.debugger.pump(self.budget);
                self.drain_console();
            }

            // Don't wait for keys while a command is running
            let timeout = if self.flow == Flow::Busy {
                Duration::ZERO
            } else {
                Duration::from_millis(50)
            };
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Move new debugger messages into the console log and update the status
    fn drain_console(&mut self) {
        // keys already fed to a finished program are echoed like a line
        if self.input_fed > 0 && self.flow == Flow::Idle {
            self.console.push(format!("{}{}", INPUT_PROMPT, self.input));
            self.input.clear();
            self.input_fed = 0;
        }

        let lines = self.debugger.take_console();
        if !lines.is_empty() {
            self.status_message = lines[0].clone();
            self.console.extend(lines);
            if self.console.len() > CONSOLE_SCROLLBACK {
                let excess = self.console.len() - CONSOLE_SCROLLBACK;
                self.console.drain(..excess);
            }
            self.console_scroll = usize::MAX;
        }
        // the output pane reads the machine's scrollback
        self.debugger.take_output();
        self.output_scroll = usize::MAX;

        match self.flow {
            Flow::Busy => self.status_message = String::from("Running..."),
            Flow::AwaitingInput => {
                self.status_message = String::from("Program is waiting for input (Ctrl-D sends end of input)");
            }
            Flow::Idle | Flow::Quit => {}
        }
    }

    fn is_error(&self) -> bool {
        self.debugger
            .last_stop()
            .is_some_and(|stop| stop.halts_machine() && *stop != Stop::Exit)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(pane_area);

        // Left column: Program (top) | Console (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        // Right column: Stack | Heap | Backtrace | Output
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(25),
                Constraint::Percentage(15),
                Constraint::Percentage(30),
            ])
            .split(columns[1]);

        let is_error = self.is_error();
        let is_program_input = self.flow == Flow::AwaitingInput;
        let machine = self.debugger.machine();

        panes::render_program_pane(
            frame,
            left_rows[0],
            machine,
            is_error,
            self.focused_pane == FocusedPane::Program,
            &mut self.program_scroll,
        );

        panes::render_console_pane(
            frame,
            left_rows[1],
            ConsoleRenderData {
                log: &self.console,
                input: &self.input,
                prompt: if is_program_input { INPUT_PROMPT } else { PROMPT },
                is_program_input,
                is_busy: self.flow == Flow::Busy,
            },
            self.focused_pane == FocusedPane::Console,
            &mut self.console_scroll,
        );

        panes::render_stack_pane(
            frame,
            right_rows[0],
            machine.stack(),
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        panes::render_heap_pane(
            frame,
            right_rows[1],
            machine.heap(),
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );

        panes::render_backtrace_pane(
            frame,
            right_rows[2],
            machine,
            self.focused_pane == FocusedPane::Backtrace,
            &mut self.backtrace_scroll,
        );

        panes::render_terminal_pane(
            frame,
            right_rows[3],
            machine.output(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        panes::render_status_bar(
            frame,
            status_area,
            StatusRenderData {
                message: &self.status_message,
                ip: machine.ip(),
                steps: machine.steps(),
                is_running: machine.is_running(),
                is_busy: self.flow == Flow::Busy,
                is_program_input,
                is_error,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.interrupt_or_clear(),
            KeyCode::Esc => self.interrupt_or_clear(),
            KeyCode::Char('d') if ctrl => {
                if self.flow == Flow::AwaitingInput {
                    self.console.push(String::from("^D"));
                    self.flow = self.debugger.close_input();
                    self.drain_console();
                } else if self.flow == Flow::Idle && self.input.is_empty() {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::F(5) => self.shortcut("continue"),
            KeyCode::F(10) => self.shortcut("next"),
            KeyCode::F(11) => self.shortcut("step"),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                if self.input.len() > self.input_fed {
                    self.input.pop();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                if self.awaits_char() {
                    self.feed_typed();
                }
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Console => {
                    if let Some(entry) = self.history.prev(&self.input) {
                        self.input = entry.to_string();
                    }
                }
                pane => self.scroll(pane, -1),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Console => {
                    if let Some(entry) = self.history.next() {
                        self.input = entry.to_string();
                    }
                }
                pane => self.scroll(pane, 1),
            },
            KeyCode::PageUp => self.scroll(self.focused_pane, -10),
            KeyCode::PageDown => self.scroll(self.focused_pane, 10),
            _ => {}
        }
    }

    fn scroll(&mut self, pane: FocusedPane, delta: isize) {
        let offset = match pane {
            FocusedPane::Program => {
                // Scrolling moves the current line's visual row the other way
                if let Some(row) = self.program_scroll.target_line_row {
                    self.program_scroll.target_line_row = Some(row.saturating_add_signed(-delta));
                }
                &mut self.program_scroll.offset
            }
            FocusedPane::Stack => &mut self.stack_scroll,
            FocusedPane::Heap => &mut self.heap_scroll,
            FocusedPane::Backtrace => &mut self.backtrace_scroll,
            FocusedPane::Output => &mut self.output_scroll,
            FocusedPane::Console => &mut self.console_scroll,
        };
        *offset = offset.saturating_add_signed(delta);
    }

    fn interrupt_or_clear(&mut self) {
        match self.flow {
            Flow::Busy | Flow::AwaitingInput => {
                self.flow = self.debugger.interrupt();
                self.drain_console();
            }
            Flow::Idle | Flow::Quit => self.input.clear(),
        }
    }

    fn shortcut(&mut self, command: &str) {
        if self.flow == Flow::Idle {
            self.submit_command(command);
        }
    }

    /// Whether the program waits on a character read, which takes each key
    /// as it is typed
    fn awaits_char(&self) -> bool {
        self.flow == Flow::AwaitingInput
            && matches!(
                self.debugger.machine().current_instruction(),
                Some(Instruction::Io(IoOp::ReadChar))
            )
    }

    /// Hand the not yet fed part of the input line to the program
    fn feed_typed(&mut self) {
        let typed = self.input[self.input_fed..].to_string();
        self.input_fed = self.input.len();
        self.flow = self.debugger.feed_input(typed.as_bytes());
        self.drain_console();
    }

    /// Enter: the typed line goes to the program or to the debugger
    fn submit(&mut self) {
        match self.flow {
            Flow::AwaitingInput => {
                let line = std::mem::take(&mut self.input);
                let unfed = line[self.input_fed..].to_string();
                self.input_fed = 0;
                self.console.push(format!("{}{}", INPUT_PROMPT, line));
                self.flow = self.debugger.feed_input(format!("{}\n", unfed).as_bytes());
                self.drain_console();
            }
            Flow::Idle => {
                let line = std::mem::take(&mut self.input);
                self.submit_command(&line);
            }
            Flow::Busy | Flow::Quit => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::constants::MachineConfig;
    use crate::program::Program;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn settle(app: &mut App<i64>) {
        while app.flow == Flow::Busy {
            app.flow = app.debugger.pump(1_000);
            app.drain_console();
        }
    }

    fn output_lines(app: &App<i64>) -> Vec<String> {
        app.debugger
            .machine()
            .output()
            .lines()
            .map(|line| line.into_owned())
            .collect()
    }

    fn app(source: &[u8]) -> App<i64> {
        let debugger = Debugger::new(Program::from_source(source), MachineConfig::default());
        App::new(debugger, 1_000)
    }

    #[test]
    fn test_char_read_takes_single_keys() {
        // push 0; readc; push 0; retrieve; outc; end
        let mut app = app(b"   \n\t\n\t    \n\t\t\t\t\n  \n\n\n");
        app.submit_command("run");
        settle(&mut app);
        assert_eq!(app.flow, Flow::AwaitingInput);

        app.handle_key_event(key(KeyCode::Char('x')));
        settle(&mut app);
        assert_eq!(app.flow, Flow::Idle);
        assert_eq!(output_lines(&app), vec!["x"]);
        assert!(app.input.is_empty());
        assert!(app.console.iter().any(|line| line == "input> x"));
    }

    #[test]
    fn test_number_read_waits_for_enter() {
        // push 0; readn; push 0; retrieve; outn; end
        let mut app = app(b"   \n\t\n\t\t   \n\t\t\t\t\n \t\n\n\n");
        app.submit_command("run");
        settle(&mut app);
        for c in "45".chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
        assert_eq!(app.flow, Flow::AwaitingInput);
        assert_eq!(app.input, "45");

        app.handle_key_event(key(KeyCode::Enter));
        settle(&mut app);
        assert_eq!(app.flow, Flow::Idle);
        assert_eq!(output_lines(&app), vec!["45"]);
    }
}
