use core::num::NonZero;

// Small handles under test make capacity limits reachable.
#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// A stable index into an [`Arena`](super::arena::Arena).
///
/// Stored off by one so that `Option<Handle>`, the representation of every
/// nullable tree link, costs nothing over the handle itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// The number of distinct handles, which bounds the number of live nodes.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index < Self::MAX, "`Handle::from_index()` - `index` >= `Handle::MAX`!");
        // `index + 1` is non-zero and, given the assertion, fits in `RawHandle`.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
