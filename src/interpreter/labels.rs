//! Label resolution cache
//!
//! Calls and jumps name their target by a label bit-pattern. Scanning the
//! whole program on every jump would make loops quadratic, so the first lookup
//! scans the program once and indexes every label mark in a small hash table.
//!
//! # Hashing
//!
//! The hash XORs a rotating one-bit mask (1, 2, 4, ..., 128, 1, ...) into an
//! accumulator for every TAB in the label. [`CacheSize::Small`] folds the
//! high nibble into the low one for 16 buckets; [`CacheSize::Large`] keeps all
//! 256.
//!
//! # Duplicate marks
//!
//! Marks are indexed from low to high offsets and a lookup checks the most
//! recently indexed entry of a bucket first, so the last mark of a label wins.
//!
//! # Epochs
//!
//! The cache is valid for one program layout. [`LabelCache::invalidate`] ends
//! the epoch; the next lookup rebuilds.

use crate::program::opcode::{literal_bits, LF, SPACE, TAB};
use crate::program::Program;
use std::ops::Range;

/// Number of hash buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheSize {
    /// 16 buckets, plenty for programs with a few dozen labels
    #[default]
    Small,
    /// 256 buckets
    Large,
}

impl CacheSize {
    pub fn buckets(self) -> usize {
        match self {
            CacheSize::Small => 16,
            CacheSize::Large => 256,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    /// Bits of the label inside the program (terminator excluded)
    label: Range<usize>,
    /// First byte after the mark's terminator
    target: usize,
}

/// Per-bucket statistics, for tuning the hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub bucket_depths: Vec<usize>,
}

/// Hash index from label bit-pattern to jump target
#[derive(Debug, Clone)]
pub struct LabelCache {
    size: CacheSize,
    buckets: Vec<Vec<Entry>>,
    ready: bool,
    rebuilds: usize,
}

/// Bucket of a label bit-pattern
pub fn hash(bits: &[u8], size: CacheSize) -> usize {
    let mut hash: u8 = 0;
    let mut mask: u8 = 1;
    for &b in bits {
        if b == TAB {
            hash ^= mask;
        }
        mask = mask.rotate_left(1);
    }
    match size {
        CacheSize::Small => ((hash & 0x0f) ^ (hash >> 4)) as usize,
        CacheSize::Large => hash as usize,
    }
}

impl LabelCache {
    pub fn new(size: CacheSize) -> Self {
        LabelCache {
            size,
            buckets: vec![Vec::new(); size.buckets()],
            ready: false,
            rebuilds: 0,
        }
    }

    /// Whether the index matches the current program layout
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// End the current epoch; the next lookup rebuilds the index
    pub fn invalidate(&mut self) {
        self.ready = false;
    }

    /// Number of times the index has been built
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Resolve a label to the offset following its mark, rebuilding the index
    /// first if the epoch ended
    pub fn lookup(&mut self, program: &Program, bits: &[u8]) -> Option<usize> {
        if !self.ready {
            self.rebuild(program);
        }
        let bytes = program.bytes();
        self.buckets[hash(bits, self.size)]
            .iter()
            .rev()
            .find(|entry| &bytes[entry.label.clone()] == bits)
            .map(|entry| entry.target)
    }

    /// Scan every instruction line for label marks
    pub fn rebuild(&mut self, program: &Program) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }

        let bytes = program.bytes();
        for &start in program.lines() {
            if !bytes[start..].starts_with(&[LF, SPACE, SPACE]) {
                continue;
            }
            let Ok(label) = literal_bits(bytes, start + 3) else {
                continue;
            };
            let bucket = hash(&bytes[label.clone()], self.size);
            let target = label.end + 1;
            self.buckets[bucket].push(Entry { label, target });
        }

        self.ready = true;
        self.rebuilds += 1;

        let stats = self.stats();
        tracing::debug!(
            entries = stats.entries,
            buckets = self.buckets.len(),
            deepest = stats.bucket_depths.iter().max().copied().unwrap_or(0),
            "label cache rebuilt"
        );
    }

    pub fn stats(&self) -> CacheStats {
        let bucket_depths: Vec<usize> = self.buckets.iter().map(Vec::len).collect();
        CacheStats {
            entries: bucket_depths.iter().sum(),
            bucket_depths,
        }
    }
}
