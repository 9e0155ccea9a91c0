//! Memory model of the Whitespace machine
//!
//! This module provides the storage the execution engine works on:
//! - [`number`]: the [`Number`] capability and its two back ends (`i64`, `BigInt`)
//! - [`stack`]: the growable [`Stack`] used for data and backtrace stacks
//! - [`heap`]: the densely grown [`Heap`] addressed by non-negative integers

pub mod heap;
pub mod number;
pub mod stack;

pub use heap::{Heap, HeapError};
pub use number::Number;
pub use stack::Stack;
