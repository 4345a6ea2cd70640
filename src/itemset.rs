//! Compact sets of item indices.

use std::fmt;

const BLOCK_BITS: usize = 64;

/// A set of item indices backed by a dynamically sized bitmask.
///
/// Members are only ever added, and blocks are allocated on demand, so the
/// block vector never carries trailing zeros: two sets with the same members
/// compare equal and hash identically regardless of how they were built.
/// That canonical form is what lets the route cost cache key on the set
/// directly.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ItemSet {
    blocks: Vec<u64>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set containing only `item`.
    pub fn single(item: usize) -> Self {
        let mut set = Self::new();
        set.insert(item);
        set
    }

    pub fn insert(&mut self, item: usize) {
        let block = item / BLOCK_BITS;
        if self.blocks.len() <= block {
            self.blocks.resize(block + 1, 0);
        }
        self.blocks[block] |= 1 << (item % BLOCK_BITS);
    }

    pub fn contains(&self, item: usize) -> bool {
        self.blocks
            .get(item / BLOCK_BITS)
            .is_some_and(|block| block & (1 << (item % BLOCK_BITS)) != 0)
    }

    /// Adds every member of `other` to `self`.
    pub fn union_with(&mut self, other: &ItemSet) {
        if self.blocks.len() < other.blocks.len() {
            self.blocks.resize(other.blocks.len(), 0);
        }
        for (dst, src) in self.blocks.iter_mut().zip(&other.blocks) {
            *dst |= src;
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Members in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks.iter().enumerate().flat_map(|(bi, &block)| {
            (0..BLOCK_BITS)
                .filter(move |bit| block & (1 << bit) != 0)
                .map(move |bit| bi * BLOCK_BITS + bit)
        })
    }
}

impl FromIterator<usize> for ItemSet {
    fn from_iter<T: IntoIterator<Item = usize>>(items: T) -> Self {
        let mut set = Self::new();
        for item in items {
            set.insert(item);
        }
        set
    }
}

impl fmt::Debug for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
