// Integration tests for the debugger command language and front ends

use num_bigint::BigInt;
use std::io::Cursor;
use std::path::Path;
use wsdebug::debugger::{Debugger, Flow};
use wsdebug::interpreter::constants::MachineConfig;
use wsdebug::interpreter::{Machine, Stop};
use wsdebug::memory::Number;
use wsdebug::program::Program;
use wsdebug::repl::{run_program, run_session};

fn ws(text: &str) -> Program {
    let source: Vec<u8> = text
        .bytes()
        .filter_map(|c| match c {
            b'S' => Some(b' '),
            b'T' => Some(b'\t'),
            b'L' => Some(b'\n'),
            _ => None,
        })
        .collect();
    Program::from_source(&source)
}

/// Feed a script to a plain-mode session and return everything it printed
fn session<N: Number>(program: Program, script: &str) -> String {
    let mut debugger: Debugger<N> = Debugger::new(program, MachineConfig::default());
    let mut input = Cursor::new(script.as_bytes().to_vec());
    let mut out = Vec::new();
    run_session(&mut debugger, &mut input, &mut out).expect("session should not fail");
    String::from_utf8(out).expect("console output is UTF-8")
}

/// Evaluate one command and let it finish
fn eval_to_idle<N: Number>(debugger: &mut Debugger<N>, line: &str) -> Vec<String> {
    let mut flow = debugger.eval(line);
    while flow == Flow::Busy {
        flow = debugger.pump(1_000);
    }
    debugger.take_console()
}

#[test]
fn test_breakpoint_transcript() {
    // push 1; outn; end
    let text = session::<i64>(ws("SS STL TLST LLL"), "break 7\nrun\nstep\ncont\n");
    let expected = [
        "Breakpoint set at 0x0005.",
        "Breakpoint at 0x0005 reached.",
        "[ip=0x0005]: <break-point>[TAB][LF][SPACE][TAB]",
        "[stack=0x0001]: 0x   1 ",
        "[ip=0x0009]: [LF][LF][LF]",
        "[stack=0x0000]: ",
        "Program exited normally.",
    ];
    let mut rest = text.as_str();
    for line in expected {
        let at = rest
            .find(line)
            .unwrap_or_else(|| panic!("missing {:?} in:\n{}", line, text));
        rest = &rest[at + line.len()..];
    }
    // the program's output comes before the step report
    assert!(text.contains("1[ip=0x0009]"));
}

#[test]
fn test_breakpoints_are_idempotent() {
    let mut debugger: Debugger<i64> = Debugger::new(ws("SS STL TLST LLL"), MachineConfig::default());
    assert_eq!(eval_to_idle(&mut debugger, "break 0x6"), vec!["Breakpoint set at 0x0005."]);
    assert_eq!(
        eval_to_idle(&mut debugger, "break 5"),
        vec!["There already is a breakpoint at 0x0005."]
    );
    assert_eq!(
        eval_to_idle(&mut debugger, "break 12"),
        vec!["cannot set breakpoint behind end of file."]
    );
    assert_eq!(debugger.machine().breakpoints().len(), 1);
}

#[test]
fn test_commands_needing_a_run() {
    let mut debugger: Debugger<i64> = Debugger::new(ws("SS STL TLST LLL"), MachineConfig::default());
    for command in ["step", "next", "continue", "cont", "kill"] {
        assert_eq!(
            eval_to_idle(&mut debugger, command),
            vec!["The program is not being run, try 'run'."],
            "{}",
            command
        );
    }
}

#[test]
fn test_kill_resets_machine() {
    let mut debugger: Debugger<i64> = Debugger::new(ws("SS STL TLST LLL"), MachineConfig::default());
    eval_to_idle(&mut debugger, "break 5");
    eval_to_idle(&mut debugger, "run");
    assert!(debugger.machine().is_running());
    assert!(eval_to_idle(&mut debugger, "kill").is_empty());
    assert!(!debugger.machine().is_running());
    assert!(debugger.machine().stack().is_empty());
    assert_eq!(debugger.machine().breakpoints().len(), 1);
}

#[test]
fn test_help_lists_commands_without_aliases() {
    let mut debugger: Debugger<i64> = Debugger::new(Program::default(), MachineConfig::default());
    let lines = eval_to_idle(&mut debugger, "help");
    assert_eq!(lines[0], "list of wsdebug-commands:");
    assert!(lines.contains(&"step -- execute exactly one whitespace instruction".to_string()));
    assert!(lines.contains(&"quit -- leave, just like exit.".to_string()));
    assert!(!lines.iter().any(|line| line.starts_with("cont ")));
    assert_eq!(lines.len(), 2 + 11);
}

#[test]
fn test_list_scrolls_back_half_a_page() {
    // twelve single-byte-ish instructions: dup x 12, then end
    let text = format!("{}LLL", "SLS ".repeat(12));
    let mut debugger: Debugger<i64> = Debugger::new(ws(&text), MachineConfig::default());
    let lines = eval_to_idle(&mut debugger, "list 0x12");
    assert_eq!(lines.len(), 10);
    // line 6 (offset 0x12) is preceded by five lines
    assert!(lines[0].starts_with("[ip=0x0003]: "));
    assert!(lines[5].starts_with("[ip=0x0012]: "));
    assert!(lines[5].ends_with("; dup"));

    let lines = eval_to_idle(&mut debugger, "list 0");
    assert!(lines[0].starts_with("[ip=0x0000]: "));
    let lines = eval_to_idle(&mut debugger, "list 1000");
    assert!(lines[9].ends_with("; end"));
}

#[test]
fn test_file_command() {
    let mut debugger: Debugger<BigInt> = Debugger::new(Program::default(), MachineConfig::default());
    assert_eq!(
        eval_to_idle(&mut debugger, "file demos/missing.ws"),
        vec!["demos/missing.ws: unable to open file"]
    );
    assert_eq!(
        eval_to_idle(&mut debugger, "file demos/count.ws"),
        vec!["demos/count.ws: file successfully loaded."]
    );
    let lines = eval_to_idle(&mut debugger, "run");
    assert_eq!(lines, vec!["Program exited normally."]);
    assert_eq!(debugger.take_output(), b"1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n".to_vec());
}

#[test]
fn test_debugger_run_matches_plain_run() {
    let program = Program::load(Path::new("demos/double.ws")).expect("demo should load");

    let mut machine: Machine<BigInt> = Machine::new(program.clone(), MachineConfig::default());
    let mut out = Vec::new();
    let stop = run_program(&mut machine, &mut Cursor::new(b"21\n".to_vec()), &mut out)
        .expect("run should not fail");
    assert_eq!(stop, Stop::Exit);
    assert_eq!(out, b"Hi\n42\n");

    let text = session::<BigInt>(program, "run\n21\n");
    assert!(text.contains("(wsdebug) Hi\n42\nProgram exited normally."));
}

#[test]
fn test_input_wait_and_feed() {
    let program = Program::load(Path::new("demos/double.ws")).expect("demo should load");
    let mut debugger: Debugger<i64> = Debugger::new(program, MachineConfig::default());
    let mut flow = debugger.eval("run");
    while flow == Flow::Busy {
        flow = debugger.pump(3);
    }
    assert_eq!(flow, Flow::AwaitingInput);
    assert!(debugger.machine().is_running());
    assert_eq!(debugger.take_output(), b"Hi\n".to_vec());

    assert_eq!(debugger.feed_input(b"-4"), Flow::Busy);
    assert_eq!(debugger.pump(100), Flow::AwaitingInput);
    assert_eq!(debugger.feed_input(b"\n"), Flow::Busy);
    assert_eq!(debugger.pump(100), Flow::Idle);
    assert_eq!(debugger.take_output(), b"-8\n".to_vec());
    assert_eq!(debugger.last_stop(), Some(&Stop::Exit));
}

#[test]
fn test_input_end_is_invalid_number() {
    let program = Program::load(Path::new("demos/double.ws")).expect("demo should load");
    let text = session::<i64>(program, "run\n");
    assert!(text.contains("Input is not a number, cannot continue."));
}

#[test]
fn test_step_after_exit_needs_new_run() {
    let text = session::<i64>(ws("LLL"), "run\nstep\n");
    assert!(text.contains("Program exited normally."));
    assert!(text.contains("The program is not being run, try 'run'."));
}

#[test]
fn test_runaway_program_off_the_end() {
    let text = session::<i64>(ws("SS STL"), "run\n");
    assert!(text.contains("Program didn't end on \\n\\n\\n, but no more bits to execute, stop."));
    assert!(!text.contains("[stack="));
}

#[test]
fn test_numbers_share_an_input_line() {
    // push 0; readn; push 1; readn; push 0; retrieve; push 1; retrieve; add; outn; end
    let program = ws("SS SL TLTT SS STL TLTT SS SL TTT SS STL TTT TSSS TLST LLL");
    let text = session::<BigInt>(program, "run\n\n  20 0x16\n");
    assert!(text.contains("42Program exited normally."));
}
