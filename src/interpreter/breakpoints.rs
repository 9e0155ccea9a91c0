//! Breakpoint side table
//!
//! Breakpoints are instruction-start offsets kept in a set that the engine
//! consults before dispatching an instruction. The program buffer is never
//! patched, so label cache offsets stay valid when breakpoints are added.

use crate::program::Program;
use rustc_hash::FxHashSet;

/// Outcome of a successful breakpoint request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointSet {
    Inserted(usize),
    AlreadySet(usize),
}

/// Rejected breakpoint request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointError {
    /// The requested address lies at or beyond the end of the program
    PastEnd { address: usize },
}

#[derive(Debug, Clone, Default)]
pub struct Breakpoints {
    offsets: FxHashSet<usize>,
}

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a breakpoint at the start of the instruction containing `address`
    pub fn set(
        &mut self,
        program: &Program,
        address: usize,
    ) -> Result<BreakpointSet, BreakpointError> {
        if address >= program.len() {
            return Err(BreakpointError::PastEnd { address });
        }
        let position = program.line_begin(address);
        if self.offsets.insert(position) {
            tracing::info!(position, "breakpoint set");
            Ok(BreakpointSet::Inserted(position))
        } else {
            Ok(BreakpointSet::AlreadySet(position))
        }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.offsets.contains(&offset)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// All breakpoint offsets, ascending
    pub fn sorted(&self) -> Vec<usize> {
        let mut offsets: Vec<usize> = self.offsets.iter().copied().collect();
        offsets.sort_unstable();
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_resolves_to_line_start() {
        // push 1; outn; end
        let program = Program::from_source(b"   \t\n\t\n \t\n\n\n");
        let mut breakpoints = Breakpoints::new();
        assert_eq!(
            breakpoints.set(&program, 7),
            Ok(BreakpointSet::Inserted(5))
        );
        assert_eq!(
            breakpoints.set(&program, 6),
            Ok(BreakpointSet::AlreadySet(5))
        );
        assert_eq!(breakpoints.len(), 1);
        assert!(breakpoints.contains(5));
    }

    #[test]
    fn test_set_past_end_is_rejected() {
        let program = Program::from_source(b"\n\n\n");
        let mut breakpoints = Breakpoints::new();
        assert_eq!(
            breakpoints.set(&program, 3),
            Err(BreakpointError::PastEnd { address: 3 })
        );
        assert!(breakpoints.is_empty());
    }
}
