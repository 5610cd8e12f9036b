//! Fixed-size bitset keyed by dense cell indices.

const WORD_BITS: usize = u64::BITS as usize;

/// Set of cell indices backed by one bit per grid cell.
///
/// Used for the body's O(1) membership test and for the pathfinder's global
/// visited table. Indices at or beyond the configured capacity are ignored by
/// every operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OccupancyMask {
    words: Vec<u64>,
    capacity: usize,
}

impl OccupancyMask {
    /// Creates an empty mask able to hold indices below `capacity`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            capacity,
        }
    }

    /// Number of indices the mask can address.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clears every bit and resizes the mask to `capacity` indices.
    pub fn reset(&mut self, capacity: usize) {
        self.words.clear();
        self.words.resize(capacity.div_ceil(WORD_BITS), 0);
        self.capacity = capacity;
    }

    /// Sets the bit for `index`, returning `true` when it was previously clear.
    pub fn insert(&mut self, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }

        let (word, bit) = split(index);
        let was_clear = self.words[word] & bit == 0;
        self.words[word] |= bit;
        was_clear
    }

    /// Clears the bit for `index`, returning `true` when it was previously set.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }

        let (word, bit) = split(index);
        let was_set = self.words[word] & bit != 0;
        self.words[word] &= !bit;
        was_set
    }

    /// Reports whether the bit for `index` is set.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }

        let (word, bit) = split(index);
        self.words[word] & bit != 0
    }

    /// Number of set bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum()
    }

    /// Reports whether no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }
}

fn split(index: usize) -> (usize, u64) {
    (index / WORD_BITS, 1 << (index % WORD_BITS))
}
