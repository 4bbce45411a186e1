use core::num::NonZero;

// Narrow handles under test keep the capacity-limit tests cheap.
#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Stable address of a tree node inside its [`Arena`](super::arena::Arena).
///
/// Stored off-by-one in a `NonZero` so that an absent link, `Option<Handle>`,
/// costs nothing over a present one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Largest slot index a handle can address.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_slot(slot: usize) -> Self {
        assert!(slot <= Self::MAX, "`Handle::from_slot()` - `slot` > `Handle::MAX`!");
        match NonZero::new((slot + 1) as RawHandle) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
