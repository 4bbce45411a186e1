use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::raw::{Handle, RawLlrbMap};
use crate::{Error, Result};

mod diagnostics;
mod order_statistic;

/// Unwraps a key argument, or reports which operation was handed `None`.
fn require<'k, Q: ?Sized>(key: Option<&'k Q>, operation: &'static str) -> Result<&'k Q> {
    key.ok_or(Error::MissingKey { operation })
}

/// An ordered symbol table based on a [left-leaning red-black tree].
///
/// Given a key type with a [total order], the map stores its entries in key
/// order and answers order-statistic questions about them (rank, select,
/// floor, ceiling, range counts) in O(log n).
///
/// Every operation that takes a key takes it as an `Option`. Passing `None` is
/// reported as [`Error::MissingKey`] and leaves the map untouched; the one
/// exception is [`put`](LlrbMap::put), which logs a warning and does nothing,
/// since asking a map to store nothing is harmless.
///
/// It is a logic error for a key to be modified in such a way that the key's
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the map.
///
/// # Examples
///
/// ```
/// use llrb_table::{Error, LlrbMap};
///
/// let mut st = LlrbMap::new();
/// st.put(Some("sea"), 0);
/// st.put(Some("shells"), 1);
/// st.put(Some("she"), 2);
/// st.put(Some("sells"), 3);
///
/// assert_eq!(st.get(Some(&"she")), Ok(Some(&2)));
/// assert_eq!(st.get(Some(&"shore")), Ok(None));
/// assert_eq!(st.get(None::<&&str>), Err(Error::MissingKey { operation: "get" }));
///
/// // `keys()` yields the table in sorted order.
/// let words: Vec<_> = st.keys().into_iter().copied().collect();
/// assert_eq!(words, ["sea", "sells", "she", "shells"]);
///
/// assert_eq!(st.delete_min(), Ok(("sea", 0)));
/// assert_eq!(st.len(), 3);
/// ```
///
/// [left-leaning red-black tree]: https://en.wikipedia.org/wiki/Left-leaning_red%E2%80%93black_tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
#[derive(Clone)]
pub struct LlrbMap<K, V> {
    raw: RawLlrbMap<K, V>,
}

impl<K, V> LlrbMap<K, V> {
    /// Makes a new, empty `LlrbMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let mut st = LlrbMap::new();
    /// st.put(Some(1), "a");
    /// ```
    #[must_use]
    pub const fn new() -> LlrbMap<K, V> {
        LlrbMap { raw: RawLlrbMap::new() }
    }

    /// Makes a new, empty `LlrbMap` with room for at least `capacity` entries
    /// before it reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let st: LlrbMap<u32, u32> = LlrbMap::with_capacity(64);
    /// assert!(st.capacity() >= 64);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> LlrbMap<K, V> {
        LlrbMap {
            raw: RawLlrbMap::with_capacity(capacity),
        }
    }

    /// Returns the number of entries the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Removes every entry.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let mut st = LlrbMap::new();
    /// assert_eq!(st.len(), 0);
    /// st.put(Some(1), "a");
    /// assert_eq!(st.len(), 1);
    /// ```
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// The iterator is lazy: it walks the tree with a stack of at most
    /// `height() + 1` handles.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let st = LlrbMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// let entries: Vec<_> = st.iter().collect();
    /// assert_eq!(entries, [(&1, &"a"), (&2, &"b"), (&3, &"c")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.raw)
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// [`Error::Underflow`] if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::{Error, LlrbMap};
    ///
    /// let mut st = LlrbMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(st.delete_min(), Ok((1, "a")));
    /// assert_eq!(st.delete_min(), Ok((2, "b")));
    /// assert_eq!(st.delete_min(), Err(Error::Underflow { operation: "delete_min" }));
    /// ```
    pub fn delete_min(&mut self) -> Result<(K, V)> {
        self.raw.pop_first().ok_or(Error::Underflow { operation: "delete_min" })
    }

    /// Removes and returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// [`Error::Underflow`] if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn delete_max(&mut self) -> Result<(K, V)> {
        self.raw.pop_last().ok_or(Error::Underflow { operation: "delete_max" })
    }

    fn require_entries(&self, operation: &'static str) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Underflow { operation });
        }
        Ok(())
    }
}

impl<K: Ord, V> LlrbMap<K, V> {
    /// Inserts a key-value pair, replacing the value of an existing key.
    ///
    /// Returns the value previously stored under `key`, if any. A missing key
    /// is logged as a warning and ignored.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let mut st = LlrbMap::new();
    /// assert_eq!(st.put(Some(37), "a"), None);
    /// assert_eq!(st.put(Some(37), "b"), Some("a"));
    /// assert_eq!(st.put(None, "c"), None);
    /// assert_eq!(st.len(), 1);
    /// ```
    pub fn put(&mut self, key: Option<K>, value: V) -> Option<V> {
        let Some(key) = key else {
            log::warn!("called `put()` with a missing key; nothing stored");
            return None;
        };
        self.raw.insert(key, value)
    }

    /// Returns a reference to the value stored under `key`, or `None` if the
    /// key is not present.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if `key` is `None`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let st = LlrbMap::from([(String::from("to"), 1)]);
    /// assert_eq!(st.get(Some("to")), Ok(Some(&1)));
    /// assert_eq!(st.get(Some("be")), Ok(None));
    /// ```
    pub fn get<Q>(&self, key: Option<&Q>) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let key = require(key, "get")?;
        Ok(self.raw.get(key))
    }

    /// Returns a mutable reference to the value stored under `key`, or `None`
    /// if the key is not present.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if `key` is `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let mut st = LlrbMap::from([("it", 1)]);
    /// if let Ok(Some(count)) = st.get_mut(Some(&"it")) {
    ///     *count += 1;
    /// }
    /// assert_eq!(st.get(Some(&"it")), Ok(Some(&2)));
    /// ```
    pub fn get_mut<Q>(&mut self, key: Option<&Q>) -> Result<Option<&mut V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let key = require(key, "get_mut")?;
        Ok(self.raw.get_mut(key))
    }

    /// Returns `true` if the map holds `key`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if `key` is `None`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, key: Option<&Q>) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let key = require(key, "contains")?;
        Ok(self.raw.contains_key(key))
    }

    /// Removes `key` and returns its value, or `Ok(None)` if it was not present.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if `key` is `None`, [`Error::Underflow`] if the
    /// map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::{Error, LlrbMap};
    ///
    /// let mut st = LlrbMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(st.delete(Some(&1)), Ok(Some("a")));
    /// assert_eq!(st.delete(Some(&1)), Ok(None));
    /// assert_eq!(st.delete(Some(&2)), Ok(Some("b")));
    /// assert_eq!(st.delete(Some(&2)), Err(Error::Underflow { operation: "delete" }));
    /// ```
    pub fn delete<Q>(&mut self, key: Option<&Q>) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let key = require(key, "delete")?;
        self.require_entries("delete")?;
        let removed = self.raw.remove_entry(key).map(|(_, value)| value);
        if removed.is_none() {
            log::debug!("`delete()` found no matching key; table unchanged");
        }
        Ok(removed)
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for LlrbMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for LlrbMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LlrbMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for LlrbMap<K, V> {
    fn default() -> Self {
        LlrbMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for LlrbMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = LlrbMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for LlrbMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(Some(k), v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for LlrbMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, K, V> IntoIterator for &'a LlrbMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> IntoIterator for LlrbMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Consumes the map, yielding its entries in key order.
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter { map: self }
    }
}

/// An iterator over the entries of a `LlrbMap`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`LlrbMap`]. Cloning it
/// restarts nothing: the clone resumes from the same position.
///
/// [`iter`]: LlrbMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    tree: &'a RawLlrbMap<K, V>,
    // Nodes whose left subtrees are exhausted but which are not yet yielded.
    stack: SmallVec<[Handle; 32]>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(tree: &'a RawLlrbMap<K, V>) -> Self {
        let mut iter = Iter {
            tree,
            stack: SmallVec::new(),
            remaining: tree.len(),
        };
        iter.push_left_spine(tree.root());
        iter
    }

    fn push_left_spine(&mut self, mut link: Option<Handle>) {
        while let Some(h) = link {
            self.stack.push(h);
            link = self.tree.left(h);
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.stack.pop()?;
        let tree = self.tree;
        self.push_left_spine(tree.right(h));
        self.remaining -= 1;

        let node = tree.node(h);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

/// An owning iterator over the entries of a `LlrbMap`, in key order.
///
/// This `struct` is created by the [`into_iter`] method on [`LlrbMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    map: LlrbMap<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.map.raw.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.map.len();
        (len, Some(len))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.map.raw.pop_last()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.map.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.map).finish()
    }
}
