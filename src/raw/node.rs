use super::handle::Handle;

/// Color of the link from a node's parent, stored on the child.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    pub(crate) const fn flipped(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

// LLRB: a node owns its children exclusively through arena handles.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    // Number of nodes in the subtree rooted here, including this one.
    pub(crate) size: usize,
    pub(crate) color: Color,
}

impl<K, V> Node<K, V> {
    /// Creates a new leaf, attached to its parent by a red link.
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            size: 1,
            color: Color::Red,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn flip_color(&mut self) {
        self.color = self.color.flipped();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_nodes_are_red_leaves() {
        let node = Node::new("k", 1);
        assert!(node.is_red());
        assert_eq!(node.size, 1);
        assert!(node.left.is_none() && node.right.is_none());
    }

    #[test]
    fn flip_color_toggles() {
        let mut node = Node::new(0, ());
        node.flip_color();
        assert_eq!(node.color, Color::Black);
        node.flip_color();
        assert_eq!(node.color, Color::Red);
    }
}
