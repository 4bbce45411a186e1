//! Shape inspection and invariant checks.
//!
//! The checks walk the whole tree, so mutations never run them; call them from
//! tests or when debugging.

use alloc::collections::VecDeque;

use super::LlrbMap;

impl<K: Ord, V> LlrbMap<K, V> {
    /// Returns the number of links on the longest path from the root to a
    /// node, or `None` for an empty map.
    ///
    /// A map of `n` entries never grows taller than `2 * log2(n + 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let mut st = LlrbMap::new();
    /// assert_eq!(st.height(), None);
    /// st.put(Some(1), ());
    /// assert_eq!(st.height(), Some(0));
    /// ```
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        self.raw.height()
    }

    /// Returns the keys level by level, starting at the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let st: LlrbMap<i32, ()> = (1..=7).map(|k| (k, ())).collect();
    /// let levels: Vec<i32> = st.level_order().into_iter().copied().collect();
    /// assert_eq!(levels, [4, 2, 6, 1, 3, 5, 7]);
    /// ```
    #[must_use]
    pub fn level_order(&self) -> VecDeque<&K> {
        self.raw.level_order()
    }

    /// Returns `true` if every key is greater than all keys in its left
    /// subtree and less than all keys in its right subtree.
    #[must_use]
    pub fn is_bst(&self) -> bool {
        self.raw.is_bst()
    }

    /// Returns `true` if every subtree size counter is accurate.
    #[must_use]
    pub fn is_size_consistent(&self) -> bool {
        self.raw.is_size_consistent()
    }

    /// Returns `true` if `rank(select(i)) == i` for every rank and
    /// `select(rank(k)) == k` for every key.
    #[must_use]
    pub fn is_rank_consistent(&self) -> bool {
        self.raw.is_rank_consistent()
    }

    /// Returns `true` if no red link leans right and no two red links are
    /// consecutive, i.e. the tree encodes a 2-3 tree.
    #[must_use]
    pub fn is_23(&self) -> bool {
        self.raw.is_23()
    }

    /// Returns `true` if every path from the root to an empty link crosses
    /// the same number of black links.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.raw.is_balanced()
    }

    /// Runs every structural check above.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let mut st: LlrbMap<u32, u32> = (0..100).map(|k| (k, k)).collect();
    /// for k in (0..100).step_by(3) {
    ///     st.delete(Some(&k)).unwrap();
    ///     assert!(st.check());
    /// }
    /// ```
    #[must_use]
    pub fn check(&self) -> bool {
        self.raw.check()
    }
}
