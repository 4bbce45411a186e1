/// Errors reported by [`LlrbMap`](crate::LlrbMap) operations.
///
/// None of these are raised after a partial mutation: an operation that fails
/// leaves the map exactly as it found it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A key argument was `None`.
    #[error("called `{operation}()` with a missing key")]
    MissingKey { operation: &'static str },

    /// The operation needs at least one entry, but the map is empty.
    #[error("called `{operation}()` on an empty symbol table")]
    Underflow { operation: &'static str },

    /// `select()` was given a rank outside `0..len`.
    #[error("rank {rank} is out of range for a symbol table of {len} entries")]
    RankOutOfRange { rank: usize, len: usize },

    /// No key satisfies the bound: `floor()` below the minimum or `ceiling()`
    /// above the maximum.
    #[error("no key satisfies `{operation}()`")]
    NoSuchKey { operation: &'static str },
}

/// Result type for fallible [`LlrbMap`](crate::LlrbMap) operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_operation() {
        assert_eq!(
            Error::MissingKey { operation: "floor" }.to_string(),
            "called `floor()` with a missing key"
        );
        assert_eq!(
            Error::Underflow { operation: "delete_min" }.to_string(),
            "called `delete_min()` on an empty symbol table"
        );
        assert_eq!(
            Error::RankOutOfRange { rank: 7, len: 3 }.to_string(),
            "rank 7 is out of range for a symbol table of 3 entries"
        );
        assert_eq!(Error::NoSuchKey { operation: "ceiling" }.to_string(), "no key satisfies `ceiling()`");
    }
}
