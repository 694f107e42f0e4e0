//! Growable bitset used for BFS visited sets and dirty-node masks.

use serde::{Deserialize, Serialize};

const WORD_BITS: usize = 64;

/// A dense, resizable set of bits addressed by `u32` index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// An all-clear set of `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resize to `len` bits. New bits are clear.
    pub fn resize(&mut self, len: usize) {
        if len < self.len {
            self.words.truncate(len.div_ceil(WORD_BITS));
            // Keep bits past `len` clear so a later grow starts clean.
            let tail = len % WORD_BITS;
            if tail != 0 {
                if let Some(last) = self.words.last_mut() {
                    *last &= (1u64 << tail) - 1;
                }
            }
        } else {
            self.words.resize(len.div_ceil(WORD_BITS), 0);
        }
        self.len = len;
    }

    /// Clear every bit, keeping the length.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Clear every bit and resize to `len` in one go.
    pub fn reset(&mut self, len: usize) {
        self.words.clear();
        self.words.resize(len.div_ceil(WORD_BITS), 0);
        self.len = len;
    }

    pub fn contains(&self, index: u32) -> bool {
        let index = index as usize;
        debug_assert!(index < self.len, "bit {index} out of range {}", self.len);
        self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Set a bit. Returns `true` if it was previously clear.
    pub fn insert(&mut self, index: u32) -> bool {
        let index = index as usize;
        debug_assert!(index < self.len, "bit {index} out of range {}", self.len);
        let word = &mut self.words[index / WORD_BITS];
        let mask = 1 << (index % WORD_BITS);
        let was_clear = *word & mask == 0;
        *word |= mask;
        was_clear
    }

    pub fn remove(&mut self, index: u32) {
        let index = index as usize;
        debug_assert!(index < self.len, "bit {index} out of range {}", self.len);
        self.words[index / WORD_BITS] &= !(1 << (index % WORD_BITS));
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }

    /// Indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let bit = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some((w * WORD_BITS + bit) as u32)
            })
        })
    }

    /// Splice clear bits in at the post-insertion positions in `inserted`.
    pub fn expand(&mut self, inserted: &[u32]) {
        if inserted.is_empty() {
            return;
        }
        let mut flags: Vec<bool> = (0..self.len as u32).map(|i| self.contains(i)).collect();
        super::expand_with(&mut flags, inserted, false);
        self.rebuild_from(&flags);
    }

    /// Drop the bits at `removed` and close the gaps.
    pub fn collapse(&mut self, removed: &[u32]) {
        if removed.is_empty() {
            return;
        }
        let mut flags: Vec<bool> = (0..self.len as u32).map(|i| self.contains(i)).collect();
        super::collapse(&mut flags, removed);
        self.rebuild_from(&flags);
    }

    fn rebuild_from(&mut self, flags: &[bool]) {
        self.reset(flags.len());
        for (i, &set) in flags.iter().enumerate() {
            if set {
                self.insert(i as u32);
            }
        }
    }
}
