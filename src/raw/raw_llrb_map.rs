use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;

use alloc::collections::VecDeque;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};

/// The left-leaning red-black tree backing `LlrbMap`.
///
/// Every restructuring step takes the handle of a subtree root and returns the
/// handle of the (possibly different) node that roots the subtree afterwards.
/// Parents store whatever handle comes back, so no node is ever reachable from
/// two places.
#[derive(Clone)]
pub(crate) struct RawLlrbMap<K, V> {
    /// Arena storing all tree nodes.
    pub(super) nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    pub(super) root: Option<Handle>,
}

impl<K, V> RawLlrbMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new, empty tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of nodes the arena can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) fn len(&self) -> usize {
        self.size(self.root)
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Discards every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    // ─── Node & invariant layer ─────────────────────────────────────────────

    /// Subtree size; zero for an absent link.
    #[inline]
    pub(crate) fn size(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |h| self.nodes.get(h).size)
    }

    /// An absent link counts as black.
    #[inline]
    pub(crate) fn is_red(&self, link: Option<Handle>) -> bool {
        link.is_some_and(|h| self.nodes.get(h).is_red())
    }

    #[inline]
    pub(crate) fn left(&self, h: Handle) -> Option<Handle> {
        self.nodes.get(h).left
    }

    #[inline]
    pub(crate) fn right(&self, h: Handle) -> Option<Handle> {
        self.nodes.get(h).right
    }

    fn left_left(&self, h: Handle) -> Option<Handle> {
        self.left(h).and_then(|l| self.left(l))
    }

    fn right_left(&self, h: Handle) -> Option<Handle> {
        self.right(h).and_then(|r| self.left(r))
    }

    fn update_size(&mut self, h: Handle) {
        let node = self.nodes.get(h);
        let size = 1 + self.size(node.left) + self.size(node.right);
        self.nodes.get_mut(h).size = size;
    }

    /// Makes a right-leaning link lean left.
    fn rotate_left(&mut self, h: Handle) -> Handle {
        let x = self.right(h).expect("`rotate_left()` - right link is absent!");
        let (color, size) = {
            let node = self.nodes.get(h);
            (node.color, node.size)
        };

        let x_left = self.left(x);
        let node = self.nodes.get_mut(h);
        node.right = x_left;
        node.color = Color::Red;

        let pivot = self.nodes.get_mut(x);
        pivot.left = Some(h);
        pivot.color = color;
        pivot.size = size;

        self.update_size(h);
        x
    }

    /// Makes a left-leaning link lean right.
    fn rotate_right(&mut self, h: Handle) -> Handle {
        let x = self.left(h).expect("`rotate_right()` - left link is absent!");
        let (color, size) = {
            let node = self.nodes.get(h);
            (node.color, node.size)
        };

        let x_right = self.right(x);
        let node = self.nodes.get_mut(h);
        node.left = x_right;
        node.color = Color::Red;

        let pivot = self.nodes.get_mut(x);
        pivot.right = Some(h);
        pivot.color = color;
        pivot.size = size;

        self.update_size(h);
        x
    }

    /// Flips `h` and both of its children.
    fn flip_colors(&mut self, h: Handle) {
        let (left, right) = {
            let node = self.nodes.get_mut(h);
            node.flip_color();
            (node.left, node.right)
        };
        self.nodes.get_mut(left.expect("`flip_colors()` - left link is absent!")).flip_color();
        self.nodes.get_mut(right.expect("`flip_colors()` - right link is absent!")).flip_color();
    }

    /// Restores the LLRB shape of `h` on the way back up, and its size.
    fn balance(&mut self, mut h: Handle) -> Handle {
        if self.is_red(self.right(h)) && !self.is_red(self.left(h)) {
            h = self.rotate_left(h);
        }
        if self.is_red(self.left(h)) && self.is_red(self.left_left(h)) {
            h = self.rotate_right(h);
        }
        if self.is_red(self.left(h)) && self.is_red(self.right(h)) {
            self.flip_colors(h);
        }
        self.update_size(h);
        h
    }

    /// Assuming `h` is red and both `h.left` and `h.left.left` are black,
    /// makes `h.left` or one of its children red.
    fn move_red_left(&mut self, mut h: Handle) -> Handle {
        self.flip_colors(h);
        if self.is_red(self.right_left(h)) {
            let right = self.right(h).expect("`move_red_left()` - right link is absent!");
            let right = self.rotate_right(right);
            self.nodes.get_mut(h).right = Some(right);
            h = self.rotate_left(h);
            self.flip_colors(h);
        }
        h
    }

    /// Assuming `h` is red and both `h.right` and `h.right.left` are black,
    /// makes `h.right` or one of its children red.
    fn move_red_right(&mut self, mut h: Handle) -> Handle {
        self.flip_colors(h);
        if self.is_red(self.left_left(h)) {
            h = self.rotate_right(h);
            self.flip_colors(h);
        }
        h
    }

    /// Before a top-down deletion, lends the root a red link if it has none.
    fn redden_root_for_delete(&mut self, root: Handle) {
        if !self.is_red(self.left(root)) && !self.is_red(self.right(root)) {
            self.nodes.get_mut(root).color = Color::Red;
        }
    }

    fn set_root(&mut self, root: Option<Handle>) {
        self.root = root;
        if let Some(root) = root {
            self.nodes.get_mut(root).color = Color::Black;
        }
    }

    // ─── Deletion paths ─────────────────────────────────────────────────────

    /// Removes and returns the smallest entry.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        self.redden_root_for_delete(root);
        let (root, entry) = self.delete_min_at(root);
        self.set_root(root);
        Some(entry)
    }

    /// Removes and returns the largest entry.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        self.redden_root_for_delete(root);
        let (root, entry) = self.delete_max_at(root);
        self.set_root(root);
        Some(entry)
    }

    fn delete_min_at(&mut self, mut h: Handle) -> (Option<Handle>, (K, V)) {
        let Some(left) = self.left(h) else {
            let node = self.nodes.take(h);
            return (node.right, (node.key, node.value));
        };

        if !self.is_red(Some(left)) && !self.is_red(self.left(left)) {
            h = self.move_red_left(h);
        }

        let left = self.left(h).expect("`delete_min_at()` - left link vanished while borrowing!");
        let (left, entry) = self.delete_min_at(left);
        self.nodes.get_mut(h).left = left;
        (Some(self.balance(h)), entry)
    }

    fn delete_max_at(&mut self, mut h: Handle) -> (Option<Handle>, (K, V)) {
        if self.is_red(self.left(h)) {
            h = self.rotate_right(h);
        }

        let Some(right) = self.right(h) else {
            let node = self.nodes.take(h);
            return (node.left, (node.key, node.value));
        };

        if !self.is_red(Some(right)) && !self.is_red(self.left(right)) {
            h = self.move_red_right(h);
        }

        let right = self.right(h).expect("`delete_max_at()` - right link vanished while borrowing!");
        let (right, entry) = self.delete_max_at(right);
        self.nodes.get_mut(h).right = right;
        (Some(self.balance(h)), entry)
    }
}

impl<K: Ord, V> RawLlrbMap<K, V> {
    #[inline]
    fn compare<Q>(&self, key: &Q, h: Handle) -> Ordering
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        key.cmp(self.nodes.get(h).key.borrow())
    }

    /// Returns the handle of the node holding `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.nodes.get(h);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(h),
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|h| &self.nodes.get(h).value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.search(key)?;
        Some(&mut self.nodes.get_mut(h).value)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    // ─── Insertion path ─────────────────────────────────────────────────────

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, replaced) = self.insert_at(self.root, key, value);
        self.set_root(Some(root));
        replaced
    }

    fn insert_at(&mut self, link: Option<Handle>, key: K, value: V) -> (Handle, Option<V>) {
        let Some(h) = link else {
            return (self.nodes.alloc(Node::new(key, value)), None);
        };

        let replaced = match key.cmp(&self.nodes.get(h).key) {
            Ordering::Less => {
                let (left, replaced) = self.insert_at(self.left(h), key, value);
                self.nodes.get_mut(h).left = Some(left);
                replaced
            }
            Ordering::Greater => {
                let (right, replaced) = self.insert_at(self.right(h), key, value);
                self.nodes.get_mut(h).right = Some(right);
                replaced
            }
            Ordering::Equal => Some(mem::replace(&mut self.nodes.get_mut(h).value, value)),
        };

        (self.balance(h), replaced)
    }

    /// Removes a key from the tree and returns the key-value pair.
    ///
    /// A key that is not present leaves the tree untouched.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        // The top-down borrowing below assumes the key will be found.
        if !self.contains_key(key) {
            return None;
        }

        let root = self.root?;
        self.redden_root_for_delete(root);
        let (root, entry) = self.delete_at(root, key);
        self.set_root(root);
        Some(entry)
    }

    fn delete_at<Q>(&mut self, mut h: Handle, key: &Q) -> (Option<Handle>, (K, V))
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if self.compare(key, h) == Ordering::Less {
            if !self.is_red(self.left(h)) && !self.is_red(self.left_left(h)) {
                h = self.move_red_left(h);
            }
            let left = self.left(h).expect("`delete_at()` - key is absent from the left subtree!");
            let (left, entry) = self.delete_at(left, key);
            self.nodes.get_mut(h).left = left;
            return (Some(self.balance(h)), entry);
        }

        if self.is_red(self.left(h)) {
            h = self.rotate_right(h);
        }

        if self.compare(key, h) == Ordering::Equal && self.right(h).is_none() {
            let node = self.nodes.take(h);
            return (node.left, (node.key, node.value));
        }

        if !self.is_red(self.right(h)) && !self.is_red(self.right_left(h)) {
            h = self.move_red_right(h);
        }

        let right = self.right(h).expect("`delete_at()` - key is absent from the right subtree!");
        let entry = if self.compare(key, h) == Ordering::Equal {
            // Replace with the in-order successor, then drop the successor's node.
            let (right, (key, value)) = self.delete_min_at(right);
            let node = self.nodes.get_mut(h);
            node.right = right;
            (mem::replace(&mut node.key, key), mem::replace(&mut node.value, value))
        } else {
            let (right, entry) = self.delete_at(right, key);
            self.nodes.get_mut(h).right = right;
            entry
        };

        (Some(self.balance(h)), entry)
    }

    // ─── Query layer ────────────────────────────────────────────────────────

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut h = self.root?;
        while let Some(left) = self.left(h) {
            h = left;
        }
        let node = self.nodes.get(h);
        Some((&node.key, &node.value))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut h = self.root?;
        while let Some(right) = self.right(h) {
            h = right;
        }
        let node = self.nodes.get(h);
        Some((&node.key, &node.value))
    }

    /// Returns the largest key less than or equal to `key`.
    pub(crate) fn floor<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.nodes.get(h);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(&node.key),
                Ordering::Less => node.left,
                Ordering::Greater => {
                    best = Some(&node.key);
                    node.right
                }
            };
        }
        best
    }

    /// Returns the smallest key greater than or equal to `key`.
    pub(crate) fn ceiling<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.nodes.get(h);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(&node.key),
                Ordering::Greater => node.right,
                Ordering::Less => {
                    best = Some(&node.key);
                    node.left
                }
            };
        }
        best
    }

    /// Gets the node at `rank` (0-indexed position in sorted order).
    pub(crate) fn select(&self, mut rank: usize) -> Option<Handle> {
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.nodes.get(h);
            let left_size = self.size(node.left);
            current = match rank.cmp(&left_size) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some(h),
                Ordering::Greater => {
                    rank -= left_size + 1;
                    node.right
                }
            };
        }
        None
    }

    /// Returns the number of keys strictly less than `key`.
    pub(crate) fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.nodes.get(h);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => {
                    rank += self.size(node.left) + 1;
                    node.right
                }
                Ordering::Equal => return rank + self.size(node.left),
            };
        }
        rank
    }

    /// Appends the keys in `low..=high` to `queue`, in order.
    pub(crate) fn collect_keys<'a, Q>(&'a self, link: Option<Handle>, low: &Q, high: &Q, queue: &mut VecDeque<&'a K>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(h) = link else {
            return;
        };
        let node = self.nodes.get(h);
        let key: &Q = node.key.borrow();

        let above_low = low <= key;
        let below_high = key <= high;
        if above_low {
            self.collect_keys(node.left, low, high, queue);
        }
        if above_low && below_high {
            queue.push_back(&node.key);
        }
        if below_high {
            self.collect_keys(node.right, low, high, queue);
        }
    }

    /// Number of links on the longest path from the root; `None` when empty.
    pub(crate) fn height(&self) -> Option<usize> {
        fn height_at<K, V>(tree: &RawLlrbMap<K, V>, h: Handle) -> usize {
            let node = tree.node(h);
            let left = node.left.map_or(0, |l| 1 + height_at(tree, l));
            let right = node.right.map_or(0, |r| 1 + height_at(tree, r));
            left.max(right)
        }

        self.root.map(|root| height_at(self, root))
    }

    /// Keys in breadth-first order, level by level from the root.
    pub(crate) fn level_order(&self) -> VecDeque<&K> {
        let mut keys = VecDeque::with_capacity(self.len());
        let mut pending: VecDeque<Handle> = self.root.into_iter().collect();

        while let Some(h) = pending.pop_front() {
            let node = self.nodes.get(h);
            keys.push_back(&node.key);
            pending.extend(node.left);
            pending.extend(node.right);
        }
        keys
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn tree_of(keys: impl IntoIterator<Item = i32>) -> RawLlrbMap<i32, i32> {
        let mut tree = RawLlrbMap::new();
        for key in keys {
            tree.insert(key, key * 2);
        }
        tree
    }

    #[test]
    fn rotations_preserve_order_and_size() {
        // 1 <- 2 (red left), built by hand then rotated both ways.
        let mut tree: RawLlrbMap<i32, ()> = RawLlrbMap::new();
        let one = tree.nodes.alloc(Node::new(1, ()));
        let mut two = Node::new(2, ());
        two.left = Some(one);
        two.size = 2;
        two.color = Color::Black;
        let two = tree.nodes.alloc(two);

        let top = tree.rotate_right(two);
        assert_eq!(top, one);
        assert_eq!(tree.node(one).color, Color::Black);
        assert_eq!(tree.node(one).size, 2);
        assert_eq!(tree.node(two).color, Color::Red);
        assert_eq!(tree.node(two).size, 1);
        assert_eq!(tree.right(one), Some(two));

        let top = tree.rotate_left(one);
        assert_eq!(top, two);
        assert_eq!(tree.node(two).color, Color::Black);
        assert_eq!(tree.node(two).size, 2);
        assert_eq!(tree.node(one).color, Color::Red);
        assert_eq!(tree.left(two), Some(one));
    }

    #[test]
    #[should_panic(expected = "`flip_colors()` - left link is absent!")]
    fn flip_colors_needs_both_children() {
        let mut tree: RawLlrbMap<i32, ()> = RawLlrbMap::new();
        let lone = tree.nodes.alloc(Node::new(1, ()));
        tree.flip_colors(lone);
    }

    #[test]
    fn ascending_inserts_stay_logarithmic() {
        let tree = tree_of(0..1024);
        assert_eq!(tree.len(), 1024);
        // 2 * log2(n + 1) bounds the height of any LLRB tree.
        assert!(tree.height().unwrap() <= 20);
        assert!(tree.check());
    }

    #[test]
    fn root_is_black_after_every_mutation() {
        let mut tree = RawLlrbMap::new();
        for key in [5, 3, 8, 1, 4] {
            tree.insert(key, ());
            assert!(!tree.node(tree.root().unwrap()).is_red());
        }
        tree.pop_first();
        assert!(!tree.is_red(tree.root()));
        tree.pop_last();
        assert!(!tree.is_red(tree.root()));
        tree.remove_entry(&4);
        assert!(!tree.is_red(tree.root()));
    }

    #[test]
    fn removing_an_absent_key_does_not_restructure() {
        let mut tree = tree_of([10, 20, 30, 40, 50, 60, 70]);
        let before: Vec<i32> = tree.level_order().into_iter().copied().collect();
        assert!(tree.remove_entry(&35).is_none());
        let after: Vec<i32> = tree.level_order().into_iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn successor_replacement_keeps_the_node_count() {
        let mut tree = tree_of(1..=15);
        let root_key = tree.node(tree.root().unwrap()).key;
        assert_eq!(tree.remove_entry(&root_key), Some((root_key, root_key * 2)));
        assert_eq!(tree.len(), 14);
        assert_eq!(tree.nodes.len(), 14);
        assert!(tree.check());
    }

    #[test]
    fn empty_tree_queries() {
        let mut tree: RawLlrbMap<i32, i32> = RawLlrbMap::new();
        assert_eq!(tree.height(), None);
        assert!(tree.level_order().is_empty());
        assert!(tree.floor(&0).is_none());
        assert!(tree.ceiling(&0).is_none());
        assert!(tree.select(0).is_none());
        assert_eq!(tree.rank(&0), 0);
        assert!(tree.pop_first().is_none());
        assert!(tree.pop_last().is_none());
        assert!(tree.remove_entry(&0).is_none());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        PopFirst,
        PopLast,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..500).prop_map(Op::Insert),
            3 => (0i32..500).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawLlrbMap<i32, i32> = RawLlrbMap::new();
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        prop_assert_eq!(tree.insert(key, key * 2), model.insert(key, key * 2));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(tree.remove_entry(&key), model.remove_entry(&key));
                    }
                    Op::PopFirst => {
                        prop_assert_eq!(tree.pop_first(), model.pop_first());
                    }
                    Op::PopLast => {
                        prop_assert_eq!(tree.pop_last(), model.pop_last());
                    }
                }

                prop_assert!(tree.check(), "invariants broken after {:?}", op);
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(tree.nodes.len(), model.len());
            }
        }

        #[test]
        fn select_and_rank_match_sorted_order(keys in prop::collection::btree_set(-1000i32..1000, 1..200)) {
            let tree = tree_of(keys.iter().copied());
            for (rank, key) in keys.iter().enumerate() {
                let h = tree.select(rank).expect("rank within bounds");
                prop_assert_eq!(&tree.node(h).key, key);
                prop_assert_eq!(tree.rank(key), rank);
            }
            prop_assert!(tree.select(keys.len()).is_none());
        }

        #[test]
        fn floor_and_ceiling_match_linear_scan(
            keys in prop::collection::btree_set(-500i32..500, 0..100),
            probe in -600i32..600,
        ) {
            let tree = tree_of(keys.iter().copied());
            let floor = keys.iter().rev().find(|&&k| k <= probe);
            let ceiling = keys.iter().find(|&&k| k >= probe);
            prop_assert_eq!(tree.floor(&probe), floor);
            prop_assert_eq!(tree.ceiling(&probe), ceiling);
        }
    }
}
