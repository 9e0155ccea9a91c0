// Constants and tunables for the Whitespace machine

use super::labels::CacheSize;

/// Default heap size limit, in cells (16 Mi)
pub const DEFAULT_HEAP_CELLS: usize = 1 << 24;

/// Default number of steps a front end runs before polling for interrupts
pub const DEFAULT_STEP_BUDGET: usize = 20_000;

/// Number of data stack entries shown in a stack dump
pub const STACK_DUMP_DEPTH: usize = 5;

/// Number of lines printed by the `list` command
pub const LIST_LINES: usize = 10;

/// Program output lines kept for display
pub const OUTPUT_SCROLLBACK: usize = 5_000;

/// Longest output line kept for display; longer lines are wrapped
pub const MAX_OUTPUT_LINE: usize = 4_096;

/// Machine tunables, fixed when a program is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Label cache bucket count
    pub cache_size: CacheSize,

    /// Largest heap, in cells
    pub heap_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            cache_size: CacheSize::Small,
            heap_limit: DEFAULT_HEAP_CELLS,
        }
    }
}
