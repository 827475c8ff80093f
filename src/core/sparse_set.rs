//! # Sparse Set
//!
//! A fixed-capacity set of small non-negative integers with O(1) insert, delete
//! and membership tests, plus gap-free enumeration through the dense array.
//!
//! ## Layout
//! - `sparse[value]` holds the slot of `value` inside `dense`
//! - `dense[0..count)` holds the members, packed with no gaps
//!
//! A value is present iff `sparse[v] < count && dense[sparse[v]] == v`. The double
//! check makes stale `sparse` entries harmless, which is what lets `clear()` and
//! `delete()` skip resetting them.

/// Fixed-capacity sparse/dense integer set.
///
/// Both backing arrays are allocated once in [`SparseSet::new`] and never grow.
#[derive(Debug, Clone)]
pub struct SparseSet {
    sparse: Vec<usize>,
    dense: Vec<usize>,
    count: usize,
    max_value: usize,
    capacity: usize,
}

impl SparseSet {
    /// Creates an empty set accepting values in `0..=max_value`, holding at most
    /// `capacity` members at once.
    pub fn new(max_value: usize, capacity: usize) -> Self {
        SparseSet {
            sparse: vec![0; max_value + 1],
            dense: vec![0; capacity],
            count: 0,
            max_value,
            capacity,
        }
    }

    /// Inserts `value`.
    ///
    /// # Returns
    /// `false` if `value` exceeds the bound, the set is full, or `value` is already present.
    pub fn insert(&mut self, value: usize) -> bool {
        if value > self.max_value || self.count >= self.capacity || self.search(value).is_some() {
            return false;
        }

        self.dense[self.count] = value;
        self.sparse[value] = self.count;
        self.count += 1;
        true
    }

    /// Removes `value` by swapping the last member into its slot.
    ///
    /// Dense order is not preserved across deletions.
    ///
    /// # Returns
    /// `false` if `value` was not present.
    pub fn delete(&mut self, value: usize) -> bool {
        let Some(slot) = self.search(value) else {
            return false;
        };

        let last = self.dense[self.count - 1];
        self.dense[slot] = last;
        self.sparse[last] = slot;
        self.count -= 1;
        true
    }

    /// Returns the dense slot of `value`, if present.
    pub fn search(&self, value: usize) -> Option<usize> {
        if value > self.max_value {
            return None;
        }

        let slot = self.sparse[value];
        if slot < self.count && self.dense[slot] == value {
            Some(slot)
        } else {
            None
        }
    }

    /// Whether `value` is a member.
    pub fn contains(&self, value: usize) -> bool {
        self.search(value).is_some()
    }

    /// Returns the member stored at dense slot `index`.
    pub fn get(&self, index: usize) -> Option<usize> {
        if index < self.count {
            Some(self.dense[index])
        } else {
            None
        }
    }

    /// Builds a new set holding the values present in both `self` and `other`.
    ///
    /// Walks the smaller set and probes the larger one. The result takes the
    /// smaller capacity and the larger value bound, which always fits since the
    /// intersection is a subset of either input.
    pub fn intersect(&self, other: &SparseSet) -> SparseSet {
        let capacity = self.capacity.min(other.capacity);
        let max_value = self.max_value.max(other.max_value);
        let mut result = SparseSet::new(max_value, capacity);

        let (smaller, larger) = if self.count <= other.count {
            (self, other)
        } else {
            (other, self)
        };

        for value in smaller.iter() {
            if larger.contains(value) {
                result.insert(value);
            }
        }

        result
    }

    /// Empties the set without touching the backing arrays.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Iterates the members in dense order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.dense[..self.count].iter().copied()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Maximum number of members.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest value the set accepts.
    pub fn max_value(&self) -> usize {
        self.max_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_packed(set: &SparseSet) {
        for i in 0..set.len() {
            let value = set.dense[i];
            assert_eq!(set.sparse[value], i, "sparse/dense disagree at slot {i}");
        }
    }

    #[test]
    fn insert_search_and_delete() {
        let mut set = SparseSet::new(100, 10);
        assert!(set.insert(5));
        assert!(set.insert(42));
        assert!(set.insert(7));
        assert_eq!(set.len(), 3);
        assert_eq!(set.search(42), Some(1));

        assert!(set.delete(5));
        assert_eq!(set.search(5), None);
        // 7 was last and moved into the freed slot
        assert_eq!(set.get(0), Some(7));
        assert!(set.contains(42));
        assert_packed(&set);
    }

    #[test]
    fn insert_rejects_out_of_range_full_and_duplicate() {
        let mut set = SparseSet::new(8, 2);
        assert!(!set.insert(9));
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
        assert!(set.insert(2));
        assert!(!set.insert(3));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn delete_missing_is_false() {
        let mut set = SparseSet::new(8, 4);
        assert!(!set.delete(3));
        assert!(!set.delete(100));
        set.insert(3);
        assert!(set.delete(3));
        assert!(!set.delete(3));
    }

    #[test]
    fn search_ignores_stale_entries() {
        let mut set = SparseSet::new(16, 4);
        set.insert(3);
        set.insert(9);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.search(3), None);
        assert_eq!(set.search(9), None);
        assert_eq!(set.get(0), None);

        set.insert(9);
        assert_eq!(set.search(9), Some(0));
        assert_eq!(set.search(3), None);
    }

    #[test]
    fn random_operations_keep_sparse_and_dense_in_sync() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut set = SparseSet::new(64, 32);
        let mut model = std::collections::BTreeSet::new();

        for _ in 0..2000 {
            let value = rng.usize(0..=64);
            if rng.bool() {
                let inserted = set.insert(value);
                let expected = model.len() < 32 && !model.contains(&value);
                assert_eq!(inserted, expected);
                if inserted {
                    model.insert(value);
                }
            } else {
                assert_eq!(set.delete(value), model.remove(&value));
            }
            assert_eq!(set.len(), model.len());
            assert_packed(&set);
            for v in 0..=64 {
                assert_eq!(set.contains(v), model.contains(&v));
            }
        }
    }

    #[test]
    fn intersect_keeps_common_values() {
        let mut a = SparseSet::new(50, 10);
        let mut b = SparseSet::new(200, 4);
        for v in [1, 4, 9, 16, 25] {
            a.insert(v);
        }
        for v in [4, 25, 150] {
            b.insert(v);
        }

        let both = a.intersect(&b);
        let mut values: Vec<usize> = both.iter().collect();
        values.sort_unstable();
        assert_eq!(values, vec![4, 25]);
        assert!(both.len() <= a.len().min(b.len()));
        assert_eq!(both.capacity(), 4);
        assert_eq!(both.max_value(), 200);
    }

    #[test]
    fn intersect_with_empty_is_empty() {
        let mut a = SparseSet::new(10, 5);
        a.insert(2);
        let b = SparseSet::new(10, 5);
        assert!(a.intersect(&b).is_empty());
        assert!(b.intersect(&a).is_empty());
    }
}
