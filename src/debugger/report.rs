//! Console rendering of machine state: stop messages, the current
//! instruction, stack dumps and listings

use crate::interpreter::constants::STACK_DUMP_DEPTH;
use crate::interpreter::{Machine, Stop};
use crate::memory::{Number, Stack};
use crate::program::listing;
use std::cmp::Ordering;

/// Shown in place of the current instruction when no run is active
pub const NOT_RUNNING: &str = "exec_bt stack empty, is the program running?";

/// One stack dump entry: printable characters quoted, everything else hex
pub fn format_entry<N: Number>(value: &N) -> String {
    match value.to_i64() {
        Some(v @ 0x20..=0x7a) => format!(" '{}' ", v as u8 as char),
        _ if value.cmp_zero() == Ordering::Less => format!("-0x{:4x} ", value.negate()),
        _ => format!("0x{:4x} ", value),
    }
}

/// `[stack=0x0003]: ` followed by the top entries, top first
pub fn stack_dump<N: Number>(stack: &Stack<N>) -> String {
    let mut line = format!("[stack=0x{:04x}]: ", stack.len());
    for value in stack.iter_from_top().take(STACK_DUMP_DEPTH) {
        line.push_str(&format_entry(value));
    }
    line
}

/// Disassembly of the current instruction and the stack dump
pub fn location<N: Number>(machine: &Machine<N>) -> Vec<String> {
    let current = match machine.ip() {
        Some(ip) if ip < machine.program().len() => {
            let start = machine.program().line_begin(ip);
            listing::render_line(machine.program(), start, machine.breakpoints().contains(start))
        }
        Some(ip) => format!("[ip=0x{:04x}]: ", ip),
        None => NOT_RUNNING.to_string(),
    };
    vec![current, stack_dump(machine.stack())]
}

/// Message for a stop condition, followed by the location where it applies
pub fn stop_report<N: Number>(machine: &Machine<N>, stop: &Stop) -> Vec<String> {
    let mut lines = vec![stop.to_string()];
    if stop.shows_location() {
        lines.extend(location(machine));
    }
    lines
}

/// Up to `count` listing lines around `address`, each with its mnemonic
pub fn listing<N: Number>(machine: &Machine<N>, address: usize, count: usize) -> Vec<String> {
    let program = machine.program();
    listing::window(program, address, count)
        .iter()
        .map(|&start| {
            let line = listing::render_line(program, start, machine.breakpoints().contains(start));
            format!("{:<64}; {}", line, listing::mnemonic::<N>(program, start))
        })
        .collect()
}
