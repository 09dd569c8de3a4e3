//! The [`InputSet`] bitset over accumulator input indices.

use crate::id::InputId;

/// A set of input indices implemented as a dynamically-sized bitset.
///
/// `InputSet` is the change-batch currency of the solver: a pending batch
/// for an accumulator names which of its declared inputs changed since the
/// accumulator last ran. Batches form a monoid under [`union`](Self::union)
/// with [`empty`](Self::empty) as identity, which is what lets the worklist
/// collapse multiple notifications for one locus into a single entry.
#[derive(Clone, Debug, Default)]
pub struct InputSet {
    bits: Vec<u64>,
}

impl InputSet {
    const BITS_PER_WORD: usize = 64;

    /// Create an empty input set.
    pub fn empty() -> Self {
        Self { bits: Vec::new() }
    }

    /// Create the set `{0, 1, …, count − 1}`.
    ///
    /// Used to seed a freshly finished accumulator with the obligation to
    /// process every one of its inputs at least once.
    pub fn full(count: u32) -> Self {
        let mut set = Self::empty();
        for i in 0..count {
            set.insert(InputId(i));
        }
        set
    }

    /// Insert an input index into the set.
    pub fn insert(&mut self, input: InputId) {
        let word = input.0 as usize / Self::BITS_PER_WORD;
        let bit = input.0 as usize % Self::BITS_PER_WORD;
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        self.bits[word] |= 1u64 << bit;
    }

    /// Check whether the set contains an input index.
    pub fn contains(&self, input: InputId) -> bool {
        let word = input.0 as usize / Self::BITS_PER_WORD;
        let bit = input.0 as usize % Self::BITS_PER_WORD;
        word < self.bits.len() && (self.bits[word] & (1u64 << bit)) != 0
    }

    /// Return the union of two sets (`self | other`).
    pub fn union(&self, other: &Self) -> Self {
        let max_len = self.bits.len().max(other.bits.len());
        let mut bits = Vec::with_capacity(max_len);
        for i in 0..max_len {
            let a = self.bits.get(i).copied().unwrap_or(0);
            let b = other.bits.get(i).copied().unwrap_or(0);
            bits.push(a | b);
        }
        Self { bits }
    }

    /// Returns `true` if the set contains no inputs.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Returns the number of inputs in the set.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over the input indices in the set, in ascending order.
    ///
    /// Ascending order is load-bearing: the solver delivers changed input
    /// values to a combiner in declaration order, which is this order.
    pub fn iter(&self) -> InputSetIter<'_> {
        InputSetIter {
            bits: &self.bits,
            word_idx: 0,
            bit_idx: 0,
        }
    }
}

impl PartialEq for InputSet {
    fn eq(&self, other: &Self) -> bool {
        let max_len = self.bits.len().max(other.bits.len());
        for i in 0..max_len {
            let a = self.bits.get(i).copied().unwrap_or(0);
            let b = other.bits.get(i).copied().unwrap_or(0);
            if a != b {
                return false;
            }
        }
        true
    }
}

impl Eq for InputSet {}

impl FromIterator<InputId> for InputSet {
    fn from_iter<I: IntoIterator<Item = InputId>>(iter: I) -> Self {
        let mut set = Self::empty();
        for input in iter {
            set.insert(input);
        }
        set
    }
}

impl<'a> IntoIterator for &'a InputSet {
    type Item = InputId;
    type IntoIter = InputSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over input indices in an [`InputSet`], ascending.
pub struct InputSetIter<'a> {
    bits: &'a [u64],
    word_idx: usize,
    bit_idx: usize,
}

impl Iterator for InputSetIter<'_> {
    type Item = InputId;

    fn next(&mut self) -> Option<Self::Item> {
        while self.word_idx < self.bits.len() {
            let word = self.bits[self.word_idx];
            while self.bit_idx < 64 {
                let bit = self.bit_idx;
                self.bit_idx += 1;
                if word & (1u64 << bit) != 0 {
                    return Some(InputId((self.word_idx * 64 + bit) as u32));
                }
            }
            self.word_idx += 1;
            self.bit_idx = 0;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_input_set() -> impl Strategy<Value = InputSet> {
        prop::collection::vec(0u32..128, 0..32)
            .prop_map(|ids| ids.into_iter().map(InputId).collect::<InputSet>())
    }

    proptest! {
        #[test]
        fn union_commutative(a in arb_input_set(), b in arb_input_set()) {
            prop_assert_eq!(a.union(&b), b.union(&a));
        }

        #[test]
        fn union_associative(
            a in arb_input_set(),
            b in arb_input_set(),
            c in arb_input_set(),
        ) {
            prop_assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
        }

        #[test]
        fn union_identity(a in arb_input_set()) {
            prop_assert_eq!(a.union(&InputSet::empty()), a.clone());
        }

        #[test]
        fn union_idempotent(a in arb_input_set()) {
            prop_assert_eq!(a.union(&a), a.clone());
        }

        #[test]
        fn insert_contains(id in 0u32..256) {
            let mut set = InputSet::empty();
            set.insert(InputId(id));
            prop_assert!(set.contains(InputId(id)));
            prop_assert_eq!(set.len(), 1);
        }

        #[test]
        fn len_matches_iter_count(a in arb_input_set()) {
            prop_assert_eq!(a.len(), a.iter().count());
        }

        #[test]
        fn iter_is_ascending(a in arb_input_set()) {
            let ids: Vec<InputId> = a.iter().collect();
            for pair in ids.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }

        #[test]
        fn full_contains_exactly_prefix(n in 0u32..200) {
            let set = InputSet::full(n);
            prop_assert_eq!(set.len(), n as usize);
            for i in 0..n {
                prop_assert!(set.contains(InputId(i)));
            }
            prop_assert!(!set.contains(InputId(n)));
        }
    }

    #[test]
    fn empty_is_empty() {
        assert!(InputSet::empty().is_empty());
        assert_eq!(InputSet::empty().len(), 0);
        assert_eq!(InputSet::empty().iter().count(), 0);
    }

    #[test]
    fn equality_ignores_trailing_zero_words() {
        let mut a = InputSet::empty();
        a.insert(InputId(3));
        let mut b = InputSet::empty();
        b.insert(InputId(3));
        b.insert(InputId(100));
        // a and b differ while the high word is set…
        assert_ne!(a, b);
        // …and a union with empty never changes equality.
        assert_eq!(a.union(&InputSet::empty()), a);
    }
}
