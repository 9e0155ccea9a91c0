//! Line-oriented front ends
//!
//! [`run_session`] drives a [`Debugger`] from a line reader: the classic
//! `(wsdebug) ` prompt on a plain terminal, or a script piped on stdin. The
//! same reader supplies the debugged program's input whenever it asks for
//! more. [`run_program`] executes a program with no debugger attached.

use crate::debugger::{Debugger, Flow};
use crate::interpreter::{Machine, Stop};
use crate::memory::Number;
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "(wsdebug) ";

/// Read one line, `None` at end of input
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

fn flush_debugger<N: Number, W: Write>(debugger: &mut Debugger<N>, out: &mut W) -> io::Result<()> {
    out.write_all(&debugger.take_output())?;
    for line in debugger.take_console() {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

/// Run an interactive debugging session until `exit` or end of input
pub fn run_session<N, R, W>(debugger: &mut Debugger<N>, input: &mut R, out: &mut W) -> io::Result<()>
where
    N: Number,
    R: BufRead,
    W: Write,
{
    loop {
        write!(out, "\n{}", PROMPT)?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            break;
        };

        let mut flow = debugger.eval(&line);
        loop {
            flush_debugger(debugger, out)?;
            flow = match flow {
                Flow::Busy => debugger.pump(usize::MAX),
                Flow::AwaitingInput => match read_line(input)? {
                    Some(data) => debugger.feed_input(data.as_bytes()),
                    None => debugger.close_input(),
                },
                Flow::Idle | Flow::Quit => break,
            };
        }
        if flow == Flow::Quit {
            break;
        }
    }
    writeln!(out)?;
    out.flush()
}

/// Execute a program to completion, reading its input from `input` and
/// writing its output to `out`. Returns the stop condition that ended the run.
pub fn run_program<N, R, W>(machine: &mut Machine<N>, input: &mut R, out: &mut W) -> io::Result<Stop>
where
    N: Number,
    R: BufRead,
    W: Write,
{
    machine.init();
    loop {
        let stop = machine.cont();
        out.write_all(&machine.output_mut().take_pending())?;
        match stop {
            Stop::NeedsInput => {
                out.flush()?;
                match read_line(input)? {
                    Some(data) => machine.input_mut().feed(data.as_bytes()),
                    None => machine.input_mut().close(),
                }
            }
            // breakpoints are not set without a debugger, but step over any
            Stop::Breakpoint { .. } => {}
            stop => {
                out.flush()?;
                return Ok(stop);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::constants::MachineConfig;
    use crate::program::Program;

    #[test]
    fn test_run_program_reads_lines_on_demand() {
        // push 0; readn; push 0; retrieve; outn; end
        let program = Program::from_source(b"   \n\t\n\t\t   \n\t\t\t\t\n \t\n\n\n");
        let mut machine: Machine<i64> = Machine::new(program, MachineConfig::default());
        let mut input = io::Cursor::new(b"41\n".to_vec());
        let mut out = Vec::new();
        let stop = run_program(&mut machine, &mut input, &mut out).unwrap();
        assert_eq!(stop, Stop::Exit);
        assert_eq!(out, b"41");
    }

    #[test]
    fn test_session_ends_at_eof() {
        let program = Program::from_source(b"\n\n\n");
        let mut debugger: Debugger<i64> = Debugger::new(program, MachineConfig::default());
        let mut input = io::Cursor::new(b"run\n".to_vec());
        let mut out = Vec::new();
        run_session(&mut debugger, &mut input, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Program exited normally."));
        assert!(text.ends_with("(wsdebug) \n"));
    }
}
