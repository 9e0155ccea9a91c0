//! Debugger command table and command-line parsing

/// What a command does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Break,
    Continue,
    Exit,
    File,
    Help,
    Kill,
    List,
    Next,
    Run,
    Step,
}

/// One entry of the command table
#[derive(Debug, Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    /// Shown by `help`; aliases have none
    pub help: Option<&'static str>,
    pub kind: CommandKind,
    pub takes_arg: bool,
    /// Refused unless a program is being run
    pub needs_running: bool,
}

const fn command(
    name: &'static str,
    help: Option<&'static str>,
    kind: CommandKind,
    takes_arg: bool,
    needs_running: bool,
) -> Command {
    Command {
        name,
        help,
        kind,
        takes_arg,
        needs_running,
    }
}

pub const COMMANDS: &[Command] = &[
    command(
        "break",
        Some("set breakpoint at (or shortly before) address"),
        CommandKind::Break,
        true,
        false,
    ),
    command(
        "continue",
        Some("continue execution"),
        CommandKind::Continue,
        false,
        true,
    ),
    command("cont", None, CommandKind::Continue, false, true),
    command("exit", Some("leave debugger"), CommandKind::Exit, false, false),
    command(
        "file",
        Some("use FILE as whitespace program to be debugged"),
        CommandKind::File,
        true,
        false,
    ),
    command("help", Some("display this screen"), CommandKind::Help, false, false),
    command(
        "kill",
        Some("kill execution of program being debugged"),
        CommandKind::Kill,
        false,
        true,
    ),
    command(
        "list",
        Some("list lines around specified address"),
        CommandKind::List,
        true,
        false,
    ),
    command(
        "next",
        Some("execute a whole instruction"),
        CommandKind::Next,
        false,
        true,
    ),
    command("run", Some("start debugged program"), CommandKind::Run, false, false),
    command(
        "step",
        Some("execute exactly one whitespace instruction"),
        CommandKind::Step,
        false,
        true,
    ),
    command("quit", Some("leave, just like exit."), CommandKind::Exit, false, false),
];

/// Exact-name lookup in [`COMMANDS`]
pub fn lookup(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.name == name)
}

/// Split a command line into the command word and its trimmed argument.
///
/// Leading non-letters are skipped and the command is the following run of
/// ASCII letters. The character ending the run is a separator and is not
/// part of the argument. Returns `None` when the line holds no letter.
pub fn split(line: &str) -> Option<(&str, Option<&str>)> {
    let start = line.find(|c: char| c.is_ascii_alphabetic())?;
    let rest = &line[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let name = &rest[..end];

    let mut tail = rest[end..].chars();
    tail.next();
    let argument = tail.as_str().trim();
    let argument = (!argument.is_empty()).then_some(argument);
    Some((name, argument))
}

/// Parse an address the way `strtoul(text, NULL, 0)` does: decimal, `0x`
/// hexadecimal or leading-zero octal. Parsing stops at the first invalid
/// digit; text without digits yields 0 and overflow saturates.
pub fn parse_address(text: &str) -> usize {
    let text = text.trim_start();
    let (negative, text) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .filter(|hex| hex.starts_with(|c: char| c.is_ascii_hexdigit()))
    {
        (16, hex)
    } else if text.starts_with('0') {
        (8, text)
    } else {
        (10, text)
    };

    let mut value: usize = 0;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        value = match value
            .checked_mul(radix as usize)
            .and_then(|v| v.checked_add(digit as usize))
        {
            Some(v) => v,
            None => return usize::MAX,
        };
    }

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}
