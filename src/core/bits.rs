//! Fixed-size bit-set used for pill slots.
//!
//! One bit per slot, packed into `u64` words. Cloning copies the words, so a
//! forked state never shares consumables with its parent.

use serde::{Deserialize, Serialize};

/// Fixed-capacity bit-set.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotSet {
    words: Vec<u64>,
    len: usize,
}

impl SlotSet {
    /// A set of `len` slots, all cleared.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// A set of `len` slots, all set.
    pub fn full(len: usize) -> Self {
        let mut set = Self::new(len);
        set.set_all();
        set
    }

    /// Number of slots (set or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the set has no slots at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Is slot `index` set? Out-of-range slots read as cleared.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Set slot `index`. Out-of-range slots are ignored.
    #[inline]
    pub fn set(&mut self, index: usize) {
        if index < self.len {
            self.words[index / 64] |= 1u64 << (index % 64);
        }
    }

    /// Clear slot `index`. Out-of-range slots are ignored.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        if index < self.len {
            self.words[index / 64] &= !(1u64 << (index % 64));
        }
    }

    /// Set every slot.
    pub fn set_all(&mut self) {
        for word in &mut self.words {
            *word = u64::MAX;
        }
        // Keep bits past `len` at zero so `count` stays exact
        let tail = self.len % 64;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
    }

    /// Clear every slot.
    pub fn clear_all(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
    }

    /// Number of set slots.
    #[inline]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// No slot is set.
    #[inline]
    pub fn none(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Indices of set slots in ascending order.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |i| self.get(*i))
    }

    /// Raw words, for hashing.
    pub fn words(&self) -> &[u64] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_counts_exactly() {
        let set = SlotSet::full(70);
        assert_eq!(set.len(), 70);
        assert_eq!(set.count(), 70);
        assert!(set.get(69));
        assert!(!set.get(70));
    }

    #[test]
    fn test_set_and_clear() {
        let mut set = SlotSet::new(130);
        assert!(set.none());

        set.set(0);
        set.set(64);
        set.set(129);
        set.set(500);
        assert_eq!(set.count(), 3);
        assert_eq!(set.iter_set().collect::<Vec<_>>(), vec![0, 64, 129]);

        set.clear(64);
        assert!(!set.get(64));
        set.clear_all();
        assert!(set.none());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = SlotSet::full(10);
        let mut copy = original.clone();
        copy.clear(3);
        assert!(original.get(3));
        assert!(!copy.get(3));
    }
}
