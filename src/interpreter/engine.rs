// Execution engine for the Whitespace machine

use crate::interpreter::breakpoints::{BreakpointError, BreakpointSet, Breakpoints};
use crate::interpreter::constants::MachineConfig;
use crate::interpreter::errors::Stop;
use crate::interpreter::io::{InputQueue, ProgramOutput, Read};
use crate::interpreter::labels::LabelCache;
use crate::memory::{Heap, HeapError, Number, Stack};
use crate::program::opcode::{ArithOp, FlowOp, HeapOp, Instruction, IoOp, Label, StackOp};
use crate::program::Program;
use std::cmp::Ordering;

/// What a group handler did with the instruction pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Advance to the next instruction line
    Proceed,
    /// The handler already set the instruction pointer
    Jumped,
}

/// How far `resume` runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Exactly one instruction
    Step,
    /// Until the backtrace depth is back at `depth` or below
    Next { depth: usize },
    /// Until something stops the machine
    Continue,
}

impl From<HeapError> for Stop {
    fn from(error: HeapError) -> Self {
        match error {
            HeapError::Exhausted { address, limit } => Stop::HeapExhausted { address, limit },
        }
    }
}

/// The Whitespace virtual machine for one loaded program
pub struct Machine<N: Number> {
    /// Program being executed
    program: Program,

    /// Label mark index, rebuilt lazily per epoch
    labels: LabelCache,

    /// Breakpoint offsets consulted before dispatch
    breakpoints: Breakpoints,

    /// Data stack
    stack: Stack<N>,

    /// Heap memory
    heap: Heap<N>,

    /// Call/return stack; the top is the current instruction pointer
    backtrace: Stack<usize>,

    /// Whether a run is in progress
    running: bool,

    /// Breakpoint offset that was just reported and must not trigger again
    /// before its instruction executes
    resume_at: Option<usize>,

    /// Input for read instructions
    input: InputQueue,

    /// Output of write instructions
    output: ProgramOutput,

    /// Instructions executed in the current run
    steps: u64,

    config: MachineConfig,
}

impl<N: Number> Machine<N> {
    /// Create a not-running machine for the given program
    pub fn new(program: Program, config: MachineConfig) -> Self {
        Machine {
            program,
            labels: LabelCache::new(config.cache_size),
            breakpoints: Breakpoints::new(),
            stack: Stack::new(),
            heap: Heap::new(config.heap_limit),
            backtrace: Stack::new(),
            running: false,
            resume_at: None,
            input: InputQueue::new(),
            output: ProgramOutput::new(),
            steps: 0,
            config,
        }
    }

    /// Start (or restart) execution at offset 0
    pub fn init(&mut self) {
        self.reset();
        self.backtrace.push(0);
        self.running = true;
        self.output.clear();
        // built on the first call or jump
        self.labels.invalidate();
        tracing::info!(program = self.program.name(), "run started");
    }

    /// Stop execution and clear all stacks. The program, its label cache and
    /// the breakpoints are kept.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.heap.clear();
        self.backtrace.clear();
        self.running = false;
        self.resume_at = None;
        self.steps = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current instruction pointer, if a run was started
    pub fn ip(&self) -> Option<usize> {
        self.backtrace.top().copied()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn stack(&self) -> &Stack<N> {
        &self.stack
    }

    pub fn heap(&self) -> &Heap<N> {
        &self.heap
    }

    pub fn backtrace(&self) -> &Stack<usize> {
        &self.backtrace
    }

    pub fn labels(&self) -> &LabelCache {
        &self.labels
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn input_mut(&mut self) -> &mut InputQueue {
        &mut self.input
    }

    pub fn output(&self) -> &ProgramOutput {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut ProgramOutput {
        &mut self.output
    }

    /// The instruction at the instruction pointer, if it decodes
    pub fn current_instruction(&self) -> Option<Instruction<N>> {
        let ip = self.ip().filter(|_| self.running)?;
        self.program.decode::<N>(ip).ok().map(|decoded| decoded.instruction)
    }

    /// Set a breakpoint at the instruction containing `address`
    pub fn set_breakpoint(&mut self, address: usize) -> Result<BreakpointSet, BreakpointError> {
        self.breakpoints.set(&self.program, address)
    }

    /// Execute exactly one instruction
    pub fn step(&mut self) -> Result<(), Stop> {
        if !self.running {
            return Err(Stop::NotRunning);
        }
        let ip = *self.backtrace.top().ok_or(Stop::NotRunning)?;

        let result = self.execute_at(ip);
        match &result {
            Ok(()) => self.steps += 1,
            Err(stop) if stop.halts_machine() => {
                self.running = false;
                tracing::info!(ip, steps = self.steps, reason = %stop, "run stopped");
            }
            Err(_) => {}
        }
        result
    }

    /// Step over calls: run until the backtrace is back at its current depth
    pub fn next(&mut self) -> Result<(), Stop> {
        let depth = self.backtrace.len();
        self.resume(RunMode::Next { depth }, usize::MAX)
    }

    /// Run until something stops the machine
    pub fn cont(&mut self) -> Stop {
        match self.resume(RunMode::Continue, usize::MAX) {
            Err(stop) => stop,
            Ok(()) => Stop::Yielded,
        }
    }

    /// Run in `mode` for at most `budget` instructions. `Ok` means the mode
    /// completed (one step, or the step-over returned); a used-up budget is
    /// reported as [`Stop::Yielded`].
    pub fn resume(&mut self, mode: RunMode, budget: usize) -> Result<(), Stop> {
        for _ in 0..budget {
            self.step()?;
            match mode {
                RunMode::Step => return Ok(()),
                RunMode::Next { depth } if self.backtrace.len() <= depth => return Ok(()),
                _ => {}
            }
        }
        Err(Stop::Yielded)
    }

    fn execute_at(&mut self, ip: usize) -> Result<(), Stop> {
        if ip >= self.program.len() {
            return Err(Stop::UnexpectedEnd);
        }

        if self.breakpoints.contains(ip) && self.resume_at != Some(ip) {
            self.resume_at = Some(ip);
            return Err(Stop::Breakpoint { at: ip });
        }

        let decoded = self.program.decode::<N>(ip)?;
        tracing::trace!(ip, instruction = %decoded.instruction, "step");

        let outcome = match decoded.instruction {
            Instruction::Stack(op) => self.exec_stack(op),
            Instruction::Arith(op) => self.exec_arith(op),
            Instruction::Heap(op) => self.exec_heap(op),
            Instruction::Io(op) => self.exec_io(op),
            Instruction::Flow(op) => self.exec_flow(op),
        };

        // a paused read keeps the breakpoint disarmed for the retry
        if outcome != Err(Stop::NeedsInput) {
            self.resume_at = None;
        }

        if outcome? == Outcome::Proceed {
            self.backtrace.replace_top(ip + decoded.width);
        }
        Ok(())
    }

    fn exec_stack(&mut self, op: StackOp<N>) -> Result<Outcome, Stop> {
        match op {
            StackOp::Push(value) => self.stack.push(value),
            StackOp::Duplicate => {
                if !self.stack.duplicate() {
                    return Err(Stop::StackUnderflow);
                }
            }
            StackOp::Copy(n) => {
                let value = self
                    .stack
                    .nth_from_top(n)
                    .cloned()
                    .ok_or(Stop::StackUnderflow)?;
                self.stack.push(value);
            }
            StackOp::Swap => {
                if !self.stack.has(2) {
                    return Err(Stop::StackUnderflow);
                }
                let first = self.stack.pop().ok_or(Stop::StackUnderflow)?;
                let second = self.stack.pop().ok_or(Stop::StackUnderflow)?;
                self.stack.push(first);
                self.stack.push(second);
            }
            StackOp::Discard => {
                self.stack.pop().ok_or(Stop::StackUnderflow)?;
            }
            StackOp::Slide(n) => {
                if !self.stack.slide(n) {
                    return Err(Stop::StackUnderflow);
                }
            }
        }
        Ok(Outcome::Proceed)
    }

    fn exec_arith(&mut self, op: ArithOp) -> Result<Outcome, Stop> {
        // the first pushed operand is the left-hand side
        let right = self.stack.nth_from_top(0).ok_or(Stop::StackUnderflow)?;
        let left = self.stack.nth_from_top(1).ok_or(Stop::StackUnderflow)?;

        let result = match op {
            ArithOp::Add => left.plus(right),
            ArithOp::Sub => left.minus(right),
            ArithOp::Mul => left.times(right),
            ArithOp::Div => left.quotient(right).ok_or(Stop::DivisionByZero)?,
            ArithOp::Mod => left.remainder(right).ok_or(Stop::DivisionByZero)?,
        };

        self.stack.pop();
        self.stack.replace_top(result);
        Ok(Outcome::Proceed)
    }

    /// Heap address held `depth` entries below the top of the data stack
    fn address_at(&self, depth: usize) -> Result<usize, Stop> {
        self.stack
            .nth_from_top(depth)
            .ok_or(Stop::StackUnderflow)?
            .to_address()
            .ok_or(Stop::InvalidAddress)
    }

    fn exec_heap(&mut self, op: HeapOp) -> Result<Outcome, Stop> {
        match op {
            HeapOp::Store => {
                // stack order: address, then value on top
                if !self.stack.has(2) {
                    return Err(Stop::StackUnderflow);
                }
                let address = self.address_at(1)?;
                let value = self.stack.top().cloned().ok_or(Stop::StackUnderflow)?;
                self.heap.store(address, value)?;
                self.stack.pop();
                self.stack.pop();
            }
            HeapOp::Retrieve => {
                let address = self.address_at(0)?;
                let value = self.heap.load(address)?;
                self.stack.replace_top(value);
            }
        }
        Ok(Outcome::Proceed)
    }

    fn exec_io(&mut self, op: IoOp) -> Result<Outcome, Stop> {
        match op {
            IoOp::OutputChar => {
                let value = self.stack.top().ok_or(Stop::StackUnderflow)?;
                let byte = value.low_byte();
                self.output.write(&[byte]);
                self.stack.pop();
            }
            IoOp::OutputNumber => {
                let value = self.stack.top().ok_or(Stop::StackUnderflow)?;
                let text = value.to_string();
                self.output.write(text.as_bytes());
                self.stack.pop();
            }
            IoOp::ReadChar | IoOp::ReadNumber => {
                let address = self.address_at(0)?;
                self.heap.ensure(address)?;
                let value = match op {
                    IoOp::ReadChar => match self.input.read_byte() {
                        Read::Ready(b) => N::from_i64(b as i64),
                        Read::Eof => N::from_i64(-1),
                        Read::Pending => return Err(Stop::NeedsInput),
                    },
                    _ => match self.input.read_token() {
                        Read::Ready(token) => {
                            N::parse_number(&token).ok_or(Stop::InvalidInput)?
                        }
                        Read::Eof => return Err(Stop::InvalidInput),
                        Read::Pending => return Err(Stop::NeedsInput),
                    },
                };
                self.heap.store(address, value)?;
                self.stack.pop();
            }
        }
        Ok(Outcome::Proceed)
    }

    fn resolve(&mut self, label: &Label) -> Result<usize, Stop> {
        self.labels
            .lookup(&self.program, &label.bits)
            .ok_or(Stop::LabelNotFound)
    }

    fn exec_flow(&mut self, op: FlowOp) -> Result<Outcome, Stop> {
        match op {
            FlowOp::Mark(_) => Ok(Outcome::Proceed),
            FlowOp::Call(label) => {
                // the caller's ip stays below the target; Return advances it
                let target = self.resolve(&label)?;
                self.backtrace.push(target);
                Ok(Outcome::Jumped)
            }
            FlowOp::Jump(label) => {
                let target = self.resolve(&label)?;
                self.backtrace.replace_top(target);
                Ok(Outcome::Jumped)
            }
            FlowOp::JumpIfZero(ref label) | FlowOp::JumpIfNegative(ref label) => {
                let sign = self.stack.top().ok_or(Stop::StackUnderflow)?.cmp_zero();
                let taken = match op {
                    FlowOp::JumpIfZero(_) => sign == Ordering::Equal,
                    _ => sign == Ordering::Less,
                };
                // resolve before popping so a missing label leaves the stack intact
                let target = if taken { Some(self.resolve(label)?) } else { None };
                self.stack.pop();
                match target {
                    Some(target) => {
                        self.backtrace.replace_top(target);
                        Ok(Outcome::Jumped)
                    }
                    None => Ok(Outcome::Proceed),
                }
            }
            FlowOp::Return => {
                if !self.backtrace.has(2) {
                    return Err(Stop::StackUnderflow);
                }
                self.backtrace.pop();
                let caller = self.backtrace.pop().ok_or(Stop::StackUnderflow)?;
                self.backtrace.push(self.program.line_end(caller));
                Ok(Outcome::Jumped)
            }
            FlowOp::End => Err(Stop::Exit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::constants::{MAX_OUTPUT_LINE, OUTPUT_SCROLLBACK};

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

    fn machine(text: &str) -> Machine<i64> {
        let mut machine = Machine::new(ws(text), MachineConfig::default());
        machine.init();
        machine
    }

    #[test]
    fn test_init_pushes_entry_point() {
        let machine = machine("LLL");
        assert!(machine.is_running());
        assert_eq!(machine.backtrace().as_slice(), &[0]);
        assert!(machine.stack().is_empty());
    }

    #[test]
    fn test_step_when_not_running() {
        let mut machine: Machine<i64> = Machine::new(ws("LLL"), MachineConfig::default());
        assert_eq!(machine.step(), Err(Stop::NotRunning));
    }

    #[test]
    fn test_arith_operand_order() {
        // push 7; push 2; sub; end
        let mut machine = machine("SS STTTL SS STSL TSST LLL");
        assert_eq!(machine.cont(), Stop::Exit);
        assert_eq!(machine.stack().as_slice(), &[5]);
        assert!(!machine.is_running());
    }

    #[test]
    fn test_division_by_zero_keeps_operands() {
        // push 1; push 0; div
        let mut machine = machine("SS STL SS SL TSTS");
        assert_eq!(machine.cont(), Stop::DivisionByZero);
        assert_eq!(machine.stack().as_slice(), &[1, 0]);
    }

    #[test]
    fn test_swap_underflow_leaves_stack() {
        // push 1; swap
        let mut machine = machine("SS STL SLT");
        assert_eq!(machine.cont(), Stop::StackUnderflow);
        assert_eq!(machine.stack().as_slice(), &[1]);
        assert_eq!(machine.ip(), Some(5));
    }

    #[test]
    fn test_heap_store_and_retrieve() {
        // push 3; push 42; store; push 3; retrieve; end
        let mut machine = machine("SS STTL SS STSTSTSL TTS SS STTL TTT LLL");
        assert_eq!(machine.cont(), Stop::Exit);
        assert_eq!(machine.stack().as_slice(), &[42]);
        assert_eq!(machine.heap().peek(3), Some(&42));
    }

    #[test]
    fn test_negative_address_is_rejected() {
        // push -1; retrieve
        let mut machine = machine("SS TTL TTT");
        assert_eq!(machine.cont(), Stop::InvalidAddress);
        assert_eq!(machine.stack().as_slice(), &[-1]);
    }

    #[test]
    fn test_call_and_return() {
        // call .T; end; label .T; push 1; ret
        let mut machine = machine("LST TL LLL LSS TL SS STL LTL");
        assert_eq!(machine.step(), Ok(()));
        assert_eq!(machine.backtrace().len(), 2);
        assert_eq!(machine.cont(), Stop::Exit);
        assert_eq!(machine.stack().as_slice(), &[1]);
        assert_eq!(machine.backtrace().as_slice(), &[5]);
    }

    #[test]
    fn test_next_steps_over_call() {
        let mut machine = machine("LST TL LLL LSS TL SS STL LTL");
        assert_eq!(machine.next(), Ok(()));
        assert_eq!(machine.ip(), Some(5));
        assert_eq!(machine.backtrace().len(), 1);
        assert_eq!(machine.stack().as_slice(), &[1]);
    }

    #[test]
    fn test_return_needs_caller() {
        let mut machine = machine("LTL");
        assert_eq!(machine.cont(), Stop::StackUnderflow);
    }

    #[test]
    fn test_conditional_jumps() {
        // push 0; jz .T; push 9; label .T; push -1; jn .S; end; label .S; end
        let mut machine = machine("SS SL LTS TL SS STSSTL LSS TL SS TTL LTT SL LLL LSS SL LLL");
        assert_eq!(machine.cont(), Stop::Exit);
        assert!(machine.stack().is_empty());
        assert_eq!(machine.ip(), Some(machine.program().len() - 3));
    }

    #[test]
    fn test_missing_label() {
        // push 0; jz .T
        let mut machine = machine("SS SL LTS TL");
        assert_eq!(machine.cont(), Stop::LabelNotFound);
        assert_eq!(machine.stack().as_slice(), &[0]);
    }

    #[test]
    fn test_breakpoint_pauses_before_instruction() {
        // push 1; outn; end
        let mut machine = machine("SS STL TLST LLL");
        assert!(machine.set_breakpoint(5).is_ok());
        assert_eq!(machine.cont(), Stop::Breakpoint { at: 5 });
        assert!(machine.is_running());
        assert_eq!(machine.ip(), Some(5));
        assert_eq!(machine.stack().as_slice(), &[1]);
        assert_eq!(machine.cont(), Stop::Exit);
        assert_eq!(machine.output().pending(), b"1");
    }

    #[test]
    fn test_breakpoint_rearms_in_loops() {
        // label .S; push 1; outn; jmp .S
        let mut machine = machine("LSS SL SS STL TLST LSL SL");
        assert!(machine.set_breakpoint(5).is_ok());
        assert_eq!(machine.cont(), Stop::Breakpoint { at: 5 });
        assert_eq!(machine.cont(), Stop::Breakpoint { at: 5 });
        assert_eq!(machine.output().pending(), b"1");
    }

    #[test]
    fn test_read_waits_for_input() {
        // push 0; readn; push 0; retrieve; outn; end
        let mut machine = machine("SS SL TLTT SS SL TTT TLST LLL");
        assert_eq!(machine.cont(), Stop::NeedsInput);
        assert!(machine.is_running());
        assert_eq!(machine.stack().as_slice(), &[0]);
        machine.input_mut().feed(b"-17\n");
        assert_eq!(machine.cont(), Stop::Exit);
        assert_eq!(machine.output().pending(), b"-17");
    }

    #[test]
    fn test_read_numbers_from_one_line() {
        // push 0; readn; push 1; readn; push 0; retrieve; push 1; retrieve; outn; outn; end
        let mut machine = machine(
            "SS SL TLTT SS STL TLTT SS SL TTT SS STL TTT TLST TLST LLL",
        );
        machine.input_mut().feed(b"12 34\n");
        assert_eq!(machine.cont(), Stop::Exit);
        assert_eq!(machine.output().pending(), b"3412");
    }

    #[test]
    fn test_read_number_skips_blank_lines() {
        // push 0; readn; push 0; retrieve; end
        let mut machine = machine("SS SL TLTT SS SL TTT LLL");
        machine.input_mut().feed(b"\n");
        assert_eq!(machine.cont(), Stop::NeedsInput);
        assert_eq!(
            machine.current_instruction(),
            Some(Instruction::Io(IoOp::ReadNumber))
        );
        machine.input_mut().feed(b"  0x2a\n");
        assert_eq!(machine.cont(), Stop::Exit);
        assert_eq!(machine.stack().as_slice(), &[42]);
    }

    #[test]
    fn test_read_char_at_eof_stores_minus_one() {
        // push 0; readc; push 0; retrieve; end
        let mut machine = machine("SS SL TLTS SS SL TTT LLL");
        machine.input_mut().close();
        assert_eq!(machine.cont(), Stop::Exit);
        assert_eq!(machine.stack().as_slice(), &[-1]);
    }

    #[test]
    fn test_bad_number_input() {
        let mut machine = machine("SS SL TLTT LLL");
        machine.input_mut().feed(b"abc\n");
        assert_eq!(machine.cont(), Stop::InvalidInput);
    }

    #[test]
    fn test_running_off_the_end() {
        let mut machine = machine("SS STL");
        assert_eq!(machine.cont(), Stop::UnexpectedEnd);
        assert!(!machine.is_running());
    }

    #[test]
    fn test_drained_output_stays_bounded() {
        // label .S; push 65; outc; jmp .S
        let mut machine = machine("LSS SL SS STSSSSSTL TLSS LSL SL");
        for _ in 0..5 {
            assert_eq!(machine.resume(RunMode::Continue, 300_000), Err(Stop::Yielded));
            assert!(!machine.output_mut().take_pending().is_empty());
            assert!(machine.output().pending().is_empty());
        }
        assert!(machine.output().line_count() <= OUTPUT_SCROLLBACK);
        assert!(machine.output().lines().all(|line| line.len() <= MAX_OUTPUT_LINE));
    }

    #[test]
    fn test_budget_yields() {
        // label .S; jmp .S
        let mut machine = machine("LSS SL LSL SL");
        assert_eq!(machine.resume(RunMode::Continue, 100), Err(Stop::Yielded));
        assert!(machine.is_running());
        assert_eq!(machine.steps(), 100);
    }
}
