//! An ordered symbol table for Rust, backed by a left-leaning red-black tree.
//!
//! This crate provides [`LlrbMap`], an ordered map with O(log n) insertion,
//! deletion and lookup, plus order-statistic queries built on subtree sizes:
//!
//! - [`select`](LlrbMap::select) - Get the key at a given sorted position
//! - [`rank`](LlrbMap::rank) - Count the keys strictly less than a key
//! - [`floor`](LlrbMap::floor) / [`ceiling`](LlrbMap::ceiling) - Nearest keys at or below / above a key
//! - [`keys_in`](LlrbMap::keys_in) / [`size_in`](LlrbMap::size_in) - Range enumeration and counting
//!
//! Key arguments are passed as `Option`s. A missing key is rejected with
//! [`Error::MissingKey`] by every query, and logged and ignored by
//! [`put`](LlrbMap::put).
//!
//! # Example
//!
//! ```
//! use llrb_table::LlrbMap;
//!
//! let mut st = LlrbMap::new();
//! for (i, key) in ["S", "E", "A", "R", "C", "H", "X", "M", "P", "L"].into_iter().enumerate() {
//!     st.put(Some(key), i);
//! }
//!
//! assert_eq!(st.len(), 10);
//! assert_eq!(st.get(Some(&"H")), Ok(Some(&5)));
//! assert_eq!(st.min(), Ok(&"A"));
//! assert_eq!(st.select(0), Ok(&"A"));
//! assert_eq!(st.rank(Some(&"X")), Ok(9));
//! assert_eq!(st.floor(Some(&"J")), Ok(&"H"));
//! assert_eq!(st.ceiling(Some(&"J")), Ok(&"L"));
//! assert_eq!(st.size_in(Some(&"C"), Some(&"P")), Ok(6));
//! ```
//!
//! # Implementation
//!
//! Nodes live in an arena and link to each other through compact handles, so the
//! tree is a strict ownership tree: every rotation and fixup step takes a subtree
//! handle and returns the handle of the new subtree root. Structural invariants
//! (symmetric order, black balance, left-leaning red links, subtree sizes) can be
//! verified on demand with [`LlrbMap::check`] and friends.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod llrb_map;

pub use error::{Error, Result};
pub use llrb_map::LlrbMap;
