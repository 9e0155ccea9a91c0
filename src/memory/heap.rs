//! Heap implementation for the interpreter
//!
//! The Whitespace heap maps non-negative addresses to numbers. It is stored
//! as a dense array that grows on demand: [`Heap::ensure`] must make an
//! address valid before it is read or written. Cells that were grown but
//! never written read as zero.
//!
//! # Limits
//!
//! The array never grows past `max_cells`, which keeps a program storing to
//! address `10^12` from exhausting host memory.

use super::number::Number;

/// Reasons a heap access can fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    /// The address lies beyond the configured cell limit
    Exhausted { address: usize, limit: usize },
}

/// The heap
#[derive(Debug, Clone)]
pub struct Heap<N> {
    cells: Vec<N>,
    max_cells: usize,
}

impl<N: Number> Heap<N> {
    /// Create a new heap holding at most `max_cells` cells
    pub fn new(max_cells: usize) -> Self {
        Heap {
            cells: Vec::new(),
            max_cells,
        }
    }

    /// Grow the heap so that `address` is valid
    pub fn ensure(&mut self, address: usize) -> Result<(), HeapError> {
        if address >= self.max_cells {
            return Err(HeapError::Exhausted {
                address,
                limit: self.max_cells,
            });
        }
        if address >= self.cells.len() {
            self.cells.resize(address + 1, N::default());
        }
        Ok(())
    }

    /// Write a value, growing the heap as needed
    pub fn store(&mut self, address: usize, value: N) -> Result<(), HeapError> {
        self.ensure(address)?;
        self.cells[address] = value;
        Ok(())
    }

    /// Read a value, growing the heap as needed
    pub fn load(&mut self, address: usize) -> Result<N, HeapError> {
        self.ensure(address)?;
        Ok(self.cells[address].clone())
    }

    /// Read without growing; addresses past the end read as `None`
    pub fn peek(&self, address: usize) -> Option<&N> {
        self.cells.get(address)
    }

    /// Number of cells allocated so far
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// All allocated cells, indexed by address
    pub fn cells(&self) -> &[N] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
