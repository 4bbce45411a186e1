//! Structural invariant checks. These walk the whole tree and are meant for
//! tests and diagnostics, not for the mutation path.

use super::handle::Handle;
use super::raw_llrb_map::RawLlrbMap;

impl<K: Ord, V> RawLlrbMap<K, V> {
    /// Runs every check below.
    pub(crate) fn check(&self) -> bool {
        self.is_bst() && self.is_size_consistent() && self.is_rank_consistent() && self.is_23() && self.is_balanced()
    }

    /// Symmetric order: each node lies strictly between the bounds inherited
    /// from its ancestors, on both sides.
    pub(crate) fn is_bst(&self) -> bool {
        self.is_bst_at(self.root, None, None)
    }

    fn is_bst_at(&self, link: Option<Handle>, low: Option<&K>, high: Option<&K>) -> bool {
        let Some(h) = link else {
            return true;
        };
        let node = self.nodes.get(h);
        if low.is_some_and(|low| node.key <= *low) || high.is_some_and(|high| node.key >= *high) {
            return false;
        }
        self.is_bst_at(node.left, low, Some(&node.key)) && self.is_bst_at(node.right, Some(&node.key), high)
    }

    /// Every stored size equals one plus the sizes of the children, and the
    /// root's size accounts for every live node in the arena.
    pub(crate) fn is_size_consistent(&self) -> bool {
        self.is_size_consistent_at(self.root) && self.nodes.len() == self.len()
    }

    fn is_size_consistent_at(&self, link: Option<Handle>) -> bool {
        let Some(h) = link else {
            return true;
        };
        let node = self.nodes.get(h);
        node.size == 1 + self.size(node.left) + self.size(node.right)
            && self.is_size_consistent_at(node.left)
            && self.is_size_consistent_at(node.right)
    }

    /// `rank(select(i)) == i` for every rank and `select(rank(k)) == k` for
    /// every stored key.
    pub(crate) fn is_rank_consistent(&self) -> bool {
        let len = self.len();
        let ranks_round_trip = (0..len).all(|i| self.select(i).is_some_and(|h| self.rank(&self.node(h).key) == i));
        if !ranks_round_trip {
            return false;
        }

        let mut keys = alloc::collections::VecDeque::with_capacity(len);
        if let (Some((low, _)), Some((high, _))) = (self.first_key_value(), self.last_key_value()) {
            self.collect_keys(self.root, low, high, &mut keys);
        }
        keys.len() == len && keys.into_iter().all(|key| self.select(self.rank(key)).is_some_and(|h| self.node(h).key == *key))
    }

    /// No red right links, and no red node with a red left child.
    pub(crate) fn is_23(&self) -> bool {
        self.is_23_at(self.root)
    }

    fn is_23_at(&self, link: Option<Handle>) -> bool {
        let Some(h) = link else {
            return true;
        };
        let node = self.nodes.get(h);
        if self.is_red(node.right) {
            return false;
        }
        if node.is_red() && self.is_red(node.left) {
            return false;
        }
        self.is_23_at(node.left) && self.is_23_at(node.right)
    }

    /// Every path from the root to an empty link crosses the same number of
    /// black links.
    pub(crate) fn is_balanced(&self) -> bool {
        let mut black = 0;
        let mut current = self.root;
        while let Some(h) = current {
            if !self.is_red(Some(h)) {
                black += 1;
            }
            current = self.left(h);
        }
        self.is_balanced_at(self.root, black)
    }

    fn is_balanced_at(&self, link: Option<Handle>, mut black: usize) -> bool {
        let Some(h) = link else {
            return black == 0;
        };
        let node = self.nodes.get(h);
        if !node.is_red() {
            // Underflow means this path has more black links than the leftmost one.
            let Some(rest) = black.checked_sub(1) else {
                return false;
            };
            black = rest;
        }
        self.is_balanced_at(node.left, black) && self.is_balanced_at(node.right, black)
    }
}
