use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr;

use super::IndexedSeq;
use crate::allocator::NodeAllocator;
use crate::error::AllocError;

/// A random-access position in an [`IndexedSeq`].
///
/// A cursor is a borrowed sequence plus an index in `0..=len`, where `len` is the
/// past-the-end position. Moving a cursor is O(1); dereferencing it with
/// [`get`](Cursor::get) is O(log n).
///
/// Cursors compare by index. Comparing cursors into different sequences is a
/// logic error, caught in debug builds.
///
/// # Examples
///
/// ```
/// use rank_tree::IndexedSeq;
///
/// let seq = IndexedSeq::from([1, 2, 3, 4]);
/// let mut cursor = seq.cursor(0);
/// cursor += 3;
/// assert_eq!(cursor.get(), Some(&4));
/// cursor -= 1;
/// assert_eq!(cursor.index(), 2);
/// assert_eq!((cursor + 2).get(), None);
/// ```
pub struct Cursor<'a, T, A> {
    seq: &'a IndexedSeq<T, A>,
    index: usize,
}

/// A random-access position in an [`IndexedSeq`] that can edit the sequence.
///
/// # Examples
///
/// ```
/// use rank_tree::IndexedSeq;
///
/// let mut seq = IndexedSeq::from(['a', 'c']);
/// let mut cursor = seq.cursor_mut(1);
/// cursor.insert('b');
/// assert_eq!(cursor.get(), Some(&'b'));
/// cursor.advance(1);
/// assert_eq!(cursor.remove(), Some('c'));
/// assert_eq!(seq, ['a', 'b']);
/// ```
pub struct CursorMut<'a, T, A> {
    seq: &'a mut IndexedSeq<T, A>,
    index: usize,
}

fn moved(index: usize, by: isize, len: usize) -> usize {
    let moved = index
        .checked_add_signed(by)
        .expect("cursor moved before the start of the sequence");
    assert!(moved <= len, "cursor moved past the end of the sequence");
    moved
}

fn distance(from: usize, to: usize) -> isize {
    let (magnitude, negative) = if to >= from {
        (to - from, false)
    } else {
        (from - to, true)
    };
    let magnitude = isize::try_from(magnitude).expect("cursor distance fits in isize");
    if negative { -magnitude } else { magnitude }
}

impl<'a, T, A> Cursor<'a, T, A> {
    pub(super) fn new(seq: &'a IndexedSeq<T, A>, index: usize) -> Self {
        assert!(index <= seq.len(), "cursor index {index} is past the end of the sequence");
        Self { seq, index }
    }

    /// Returns the index the cursor points at.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the element under the cursor, or `None` at the end position.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.seq.get(self.index)
    }

    /// Moves the cursor by `by` elements.
    ///
    /// # Panics
    ///
    /// Panics if the cursor would leave `0..=len`.
    pub fn advance(&mut self, by: isize) {
        self.index = moved(self.index, by, self.seq.len());
    }

    /// Returns the signed number of steps from `self` to `other`.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> isize {
        debug_assert!(ptr::eq(self.seq, other.seq), "cursors belong to different sequences");
        distance(self.index, other.index)
    }
}

impl<T, A> Clone for Cursor<'_, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A> Copy for Cursor<'_, T, A> {}

impl<T, A> fmt::Debug for Cursor<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("index", &self.index).finish_non_exhaustive()
    }
}

impl<T, A> Add<isize> for Cursor<'_, T, A> {
    type Output = Self;

    fn add(mut self, by: isize) -> Self {
        self.advance(by);
        self
    }
}

impl<T, A> Sub<isize> for Cursor<'_, T, A> {
    type Output = Self;

    fn sub(mut self, by: isize) -> Self {
        self.advance(-by);
        self
    }
}

impl<T, A> AddAssign<isize> for Cursor<'_, T, A> {
    fn add_assign(&mut self, by: isize) {
        self.advance(by);
    }
}

impl<T, A> SubAssign<isize> for Cursor<'_, T, A> {
    fn sub_assign(&mut self, by: isize) {
        self.advance(-by);
    }
}

impl<T, A> PartialEq for Cursor<'_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        debug_assert!(ptr::eq(self.seq, other.seq), "cursors belong to different sequences");
        self.index == other.index
    }
}

impl<T, A> Eq for Cursor<'_, T, A> {}

impl<T, A> PartialOrd for Cursor<'_, T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, A> Ord for Cursor<'_, T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert!(ptr::eq(self.seq, other.seq), "cursors belong to different sequences");
        self.index.cmp(&other.index)
    }
}

impl<'a, T, A> CursorMut<'a, T, A> {
    pub(super) fn new(seq: &'a mut IndexedSeq<T, A>, index: usize) -> Self {
        assert!(index <= seq.len(), "cursor index {index} is past the end of the sequence");
        Self { seq, index }
    }

    /// Returns the index the cursor points at.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the element under the cursor, or `None` at the end position.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.seq.get(self.index)
    }

    /// Returns the element under the cursor mutably, or `None` at the end position.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.seq.get_mut(self.index)
    }

    /// Moves the cursor by `by` elements.
    ///
    /// # Panics
    ///
    /// Panics if the cursor would leave `0..=len`.
    pub fn advance(&mut self, by: isize) {
        self.index = moved(self.index, by, self.seq.len());
    }

    /// Removes the element under the cursor and returns it. The cursor keeps its
    /// index, so it now points at the element that followed. Returns `None` at
    /// the end position.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self) -> Option<T> {
        self.seq.remove(self.index)
    }

    /// Returns a read-only cursor at the same index, borrowing this one.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, T, A> {
        Cursor {
            seq: &*self.seq,
            index: self.index,
        }
    }
}

impl<T, A: NodeAllocator> CursorMut<'_, T, A> {
    /// Inserts `value` before the element under the cursor. The cursor then
    /// points at the new element.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if the allocation strategy refuses a node. The
    /// sequence is unchanged in that case.
    pub fn try_insert(&mut self, value: T) -> Result<(), AllocError> {
        self.seq.try_insert(self.index, value)
    }

    /// Inserts `value` before the element under the cursor. The cursor then
    /// points at the new element.
    ///
    /// # Panics
    ///
    /// Panics if the allocation strategy refuses a node.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) {
        self.seq.insert(self.index, value);
    }
}

impl<T, A> fmt::Debug for CursorMut<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut").field("index", &self.index).finish_non_exhaustive()
    }
}
