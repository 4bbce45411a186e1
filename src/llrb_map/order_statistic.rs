use core::borrow::Borrow;

use alloc::collections::VecDeque;

use super::{LlrbMap, require};
use crate::{Error, Result};

impl<K: Ord, V> LlrbMap<K, V> {
    /// Returns the smallest key.
    ///
    /// # Errors
    ///
    /// [`Error::Underflow`] if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn min(&self) -> Result<&K> {
        self.raw
            .first_key_value()
            .map(|(key, _)| key)
            .ok_or(Error::Underflow { operation: "min" })
    }

    /// Returns the largest key.
    ///
    /// # Errors
    ///
    /// [`Error::Underflow`] if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn max(&self) -> Result<&K> {
        self.raw
            .last_key_value()
            .map(|(key, _)| key)
            .ok_or(Error::Underflow { operation: "max" })
    }

    /// Returns the largest key less than or equal to `key`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if `key` is `None`, [`Error::Underflow`] if the
    /// map is empty, [`Error::NoSuchKey`] if every key is greater than `key`.
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
    /// let st = LlrbMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(st.floor(Some(&25)), Ok(&20));
    /// assert_eq!(st.floor(Some(&30)), Ok(&30));
    /// assert_eq!(st.floor(Some(&5)), Err(Error::NoSuchKey { operation: "floor" }));
    /// ```
    pub fn floor<Q>(&self, key: Option<&Q>) -> Result<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let key = require(key, "floor")?;
        self.require_entries("floor")?;
        self.raw.floor(key).ok_or(Error::NoSuchKey { operation: "floor" })
    }

    /// Returns the smallest key greater than or equal to `key`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if `key` is `None`, [`Error::Underflow`] if the
    /// map is empty, [`Error::NoSuchKey`] if every key is less than `key`.
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
    /// let st = LlrbMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(st.ceiling(Some(&25)), Ok(&30));
    /// assert_eq!(st.ceiling(Some(&31)), Err(Error::NoSuchKey { operation: "ceiling" }));
    /// ```
    pub fn ceiling<Q>(&self, key: Option<&Q>) -> Result<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let key = require(key, "ceiling")?;
        self.require_entries("ceiling")?;
        self.raw.ceiling(key).ok_or(Error::NoSuchKey { operation: "ceiling" })
    }

    /// Returns the key at position `rank` in sorted order, counting from zero.
    ///
    /// # Errors
    ///
    /// [`Error::RankOutOfRange`] unless `rank < len()`.
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
    /// let st = LlrbMap::from([("b", 2), ("a", 1), ("c", 3)]);
    /// assert_eq!(st.select(1), Ok(&"b"));
    /// assert_eq!(st.select(3), Err(Error::RankOutOfRange { rank: 3, len: 3 }));
    /// ```
    pub fn select(&self, rank: usize) -> Result<&K> {
        self.raw
            .select(rank)
            .map(|h| &self.raw.node(h).key)
            .ok_or(Error::RankOutOfRange { rank, len: self.len() })
    }

    /// Returns the number of keys strictly less than `key`.
    ///
    /// `key` need not be present; for a present key this is its position in
    /// sorted order, so `select(rank(k)) == k`.
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
    /// let st = LlrbMap::from([(10, ()), (20, ()), (30, ())]);
    /// assert_eq!(st.rank(Some(&20)), Ok(1));
    /// assert_eq!(st.rank(Some(&25)), Ok(2));
    /// assert_eq!(st.rank(Some(&99)), Ok(3));
    /// ```
    pub fn rank<Q>(&self, key: Option<&Q>) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let key = require(key, "rank")?;
        Ok(self.raw.rank(key))
    }

    /// Returns the number of keys in `low..=high`, or zero if `low > high`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if either bound is `None`.
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
    /// let st: LlrbMap<i32, ()> = (0..10).map(|k| (k * 10, ())).collect();
    /// assert_eq!(st.size_in(Some(&15), Some(&40)), Ok(3));
    /// assert_eq!(st.size_in(Some(&10), Some(&40)), Ok(4));
    /// assert_eq!(st.size_in(Some(&40), Some(&10)), Ok(0));
    /// ```
    pub fn size_in<Q>(&self, low: Option<&Q>, high: Option<&Q>) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let low = require(low, "size_in")?;
        let high = require(high, "size_in")?;
        if low > high {
            return Ok(0);
        }

        let span = self.raw.rank(high) - self.raw.rank(low);
        Ok(if self.raw.contains_key(high) { span + 1 } else { span })
    }

    /// Returns every key in sorted order, as a FIFO queue.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn keys(&self) -> VecDeque<&K> {
        let mut queue = VecDeque::with_capacity(self.len());
        if let (Ok(low), Ok(high)) = (self.min(), self.max()) {
            self.raw.collect_keys(self.raw.root(), low, high, &mut queue);
        }
        queue
    }

    /// Returns the keys in `low..=high` in sorted order, as a FIFO queue.
    /// The queue is empty if `low > high`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if either bound is `None`.
    ///
    /// # Complexity
    ///
    /// O(log n + m), for m keys in range.
    ///
    /// # Examples
    ///
    /// ```
    /// use llrb_table::LlrbMap;
    ///
    /// let st: LlrbMap<char, ()> = "searchexample".chars().map(|c| (c, ())).collect();
    /// let keys: Vec<char> = st.keys_in(Some(&'e'), Some(&'m')).unwrap().into_iter().copied().collect();
    /// assert_eq!(keys, ['e', 'h', 'l', 'm']);
    /// ```
    pub fn keys_in<Q>(&self, low: Option<&Q>, high: Option<&Q>) -> Result<VecDeque<&K>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let low = require(low, "keys_in")?;
        let high = require(high, "keys_in")?;

        let mut queue = VecDeque::new();
        self.raw.collect_keys(self.raw.root(), low, high, &mut queue);
        Ok(queue)
    }
}
