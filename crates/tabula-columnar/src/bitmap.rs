#![forbid(unsafe_code)]

/// A compact bit vector marking null (absent) cells.
///
/// A set bit means the cell at that index is null. Bits are stored little-endian within each
/// `u64` word: bit 0 is the LSB of word 0.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Bitmap {
    words: Vec<u64>,
    len: usize,
    ones: usize,
}

impl Bitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: Vec::with_capacity(bits.div_ceil(64)),
            len: 0,
            ones: 0,
        }
    }

    /// A bitmap of `bits` entries, all cleared (no nulls).
    pub fn all_clear(bits: usize) -> Self {
        Self {
            words: vec![0u64; bits.div_ceil(64)],
            len: bits,
            ones: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, value: bool) {
        let bit = self.len % 64;
        if bit == 0 {
            self.words.push(0);
        }
        if value {
            self.words[self.len / 64] |= 1u64 << bit;
            self.ones += 1;
        }
        self.len += 1;
    }

    /// Returns the bit at `index`; out-of-range indices read as cleared.
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let word = self.words[index / 64];
        ((word >> (index % 64)) & 1) == 1
    }

    pub fn set(&mut self, index: usize, value: bool) {
        debug_assert!(index < self.len, "Bitmap index out of bounds");
        let word_idx = index / 64;
        let mask = 1u64 << (index % 64);
        let was_set = (self.words[word_idx] & mask) != 0;

        match (was_set, value) {
            (true, false) => {
                self.words[word_idx] &= !mask;
                self.ones -= 1;
            }
            (false, true) => {
                self.words[word_idx] |= mask;
                self.ones += 1;
            }
            _ => {}
        }
    }

    pub fn count_ones(&self) -> usize {
        self.ones
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut out = Self::with_capacity(iter.size_hint().0);
        for bit in iter {
            out.push(bit);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_get_across_word_boundary() {
        let mut bits = Bitmap::new();
        for i in 0..130 {
            bits.push(i % 3 == 0);
        }
        assert_eq!(bits.len(), 130);
        assert_eq!(bits.count_ones(), 44);
        assert!(bits.get(0));
        assert!(!bits.get(64));
        assert!(bits.get(129));
        assert!(!bits.get(500), "out of range reads as clear");
    }

    #[test]
    fn set_tracks_ones() {
        let mut bits = Bitmap::all_clear(10);
        bits.set(3, true);
        bits.set(3, true);
        bits.set(9, true);
        assert_eq!(bits.count_ones(), 2);
        bits.set(3, false);
        assert_eq!(bits.count_ones(), 1);
        assert!(!bits.get(3));
        assert!(bits.get(9));
    }
}
