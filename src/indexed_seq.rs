use alloc::vec::Vec;
use core::cmp::Ordering;
use core::convert::Infallible;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{Bound, Index, IndexMut, RangeBounds};

use crate::allocator::{Global, NodeAllocator};
use crate::error::{AllocError, InsertError, OutOfRange, StructureError};
use crate::position::Position;
use crate::rank_tree::{self, RankTree};

mod cursor;

pub use cursor::{Cursor, CursorMut};

/// A double-ended sequence with O(log n) insertion and removal at any index.
///
/// Element `i` is stored in a [`RankTree`] at position `i`. Inserting or removing
/// in the middle shifts every later position in O(log n), so no element is moved
/// in memory. Indexing is O(log n); [`front`] and [`back`] are O(1).
///
/// Insertions are all-or-nothing: if the allocation strategy refuses a node, or a
/// value constructor fails, the sequence is left exactly as it was.
///
/// # Examples
///
/// ```
/// use rank_tree::IndexedSeq;
///
/// let mut seq = IndexedSeq::from([0, 1, 2, 3]);
/// seq.push_front(9);
/// assert_eq!(seq, [9, 0, 1, 2, 3]);
///
/// seq.insert(2, 99);
/// assert_eq!(seq, [9, 0, 99, 1, 2, 3]);
///
/// assert_eq!(seq.remove(0), Some(9));
/// assert_eq!(seq, [0, 99, 1, 2, 3]);
/// assert_eq!(seq[1], 99);
/// ```
///
/// [`front`]: IndexedSeq::front
/// [`back`]: IndexedSeq::back
pub struct IndexedSeq<T, A = Global> {
    tree: RankTree<usize, T, A>,
}

/// An iterator over the elements of an `IndexedSeq`.
///
/// This `struct` is created by the [`iter`] method on [`IndexedSeq`].
///
/// [`iter`]: IndexedSeq::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: rank_tree::Values<'a, usize, T>,
}

/// A mutable iterator over the elements of an `IndexedSeq`.
///
/// This `struct` is created by the [`iter_mut`] method on [`IndexedSeq`].
///
/// [`iter_mut`]: IndexedSeq::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, T> {
    inner: rank_tree::ValuesMut<'a, usize, T>,
}

/// An owning iterator over the elements of an `IndexedSeq`.
///
/// This `struct` is created by the [`into_iter`] method on [`IndexedSeq`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<T> {
    inner: rank_tree::IntoValues<usize, T>,
}

/// Reduces an insertion error from a plain value to its allocation cause.
/// Sequence insertions never collide, since the target index is vacated first.
fn allocation_cause(err: InsertError) -> AllocError {
    match err {
        InsertError::Alloc(err) => err,
        InsertError::Occupied => unreachable!("sequence insertion collided with an existing element"),
        InsertError::Value(never) => match never {},
    }
}

impl<T> IndexedSeq<T> {
    /// Makes a new, empty `IndexedSeq`.
    ///
    /// Does not allocate anything on its own.
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates an empty sequence with room for at least `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: RankTree::with_capacity(capacity),
        }
    }
}

impl<T: Clone> IndexedSeq<T> {
    /// Creates a sequence holding `n` clones of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::IndexedSeq;
    ///
    /// let seq = IndexedSeq::from_elem('x', 3);
    /// assert_eq!(seq, ['x', 'x', 'x']);
    /// ```
    #[must_use]
    pub fn from_elem(value: T, n: usize) -> Self {
        let mut seq = Self::with_capacity(n);
        seq.extend(core::iter::repeat_n(value, n));
        seq
    }
}

impl<T, A> IndexedSeq<T, A> {
    /// Makes a new, empty `IndexedSeq` whose node arena grows through `allocator`.
    #[must_use]
    pub const fn new_in(allocator: A) -> Self {
        Self {
            tree: RankTree::new_in(allocator),
        }
    }

    /// Creates an empty sequence with room for at least `capacity` elements,
    /// growing through `allocator` afterwards.
    #[must_use]
    pub fn with_capacity_in(capacity: usize, allocator: A) -> Self {
        Self {
            tree: RankTree::with_capacity_in(capacity, allocator),
        }
    }

    /// Returns the number of elements the sequence can hold without growing.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Returns the allocation strategy.
    #[must_use]
    pub const fn allocator(&self) -> &A {
        self.tree.allocator()
    }

    /// Returns the number of elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the sequence holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns a reference to the element at `index`, or `None` if out of range.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.tree.get(index)
    }

    /// Returns a mutable reference to the element at `index`, or `None` if out of range.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.tree.get_mut(index)
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{IndexedSeq, OutOfRange};
    ///
    /// let seq = IndexedSeq::from([10, 20]);
    /// assert_eq!(seq.at(1), Ok(&20));
    /// assert_eq!(seq.at(2), Err(OutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        let len = self.len();
        self.get(index).ok_or(OutOfRange { index, len })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        let len = self.len();
        self.get_mut(index).ok_or(OutOfRange { index, len })
    }

    /// Returns the first element.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        let raw = &self.tree.raw;
        raw.leftmost().map(|handle| raw.value(handle))
    }

    /// Returns the first element mutably.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let raw = &mut self.tree.raw;
        let handle = raw.leftmost()?;
        Some(raw.value_mut(handle))
    }

    /// Returns the last element.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        let raw = &self.tree.raw;
        raw.rightmost().map(|handle| raw.value(handle))
    }

    /// Returns the last element mutably.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let raw = &mut self.tree.raw;
        let handle = raw.rightmost()?;
        Some(raw.value_mut(handle))
    }

    /// Removes the first element and returns it, or `None` if the sequence is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_front(&mut self) -> Option<T> {
        let handle = self.tree.raw.leftmost()?;
        let value = self.tree.raw.remove_node(handle);
        self.tree.shift_from(1, -1);
        Some(value)
    }

    /// Removes the last element and returns it, or `None` if the sequence is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_back(&mut self) -> Option<T> {
        let handle = self.tree.raw.rightmost()?;
        Some(self.tree.raw.remove_node(handle))
    }

    /// Removes and returns the element at `index`, shifting every later element
    /// down by one. Returns `None` if `index` is out of range.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.tree.remove(index)?;
        self.tree.shift_from(index, -1);
        Some(value)
    }

    /// Removes the elements in `range`, shifting every later element down.
    ///
    /// # Panics
    ///
    /// Panics if the start of the range is greater than the end, or if the end is
    /// greater than the length.
    ///
    /// # Complexity
    ///
    /// O(k log n) for k removed elements; the shift itself is a single O(log n) walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::IndexedSeq;
    ///
    /// let mut seq: IndexedSeq<_> = (0..10).collect();
    /// seq.remove_range(2..8);
    /// assert_eq!(seq, [0, 1, 8, 9]);
    /// ```
    pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.checked_add(1).expect("range start overflows"),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.checked_add(1).expect("range end overflows"),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };
        assert!(start <= end, "range start {start} is greater than range end {end}");
        assert!(end <= len, "range end {end} is out of range for a sequence of length {len}");
        if start == end {
            return;
        }

        for index in start..end {
            self.tree.remove(index);
        }
        let removed = (end - start).to_delta();
        self.tree.shift_from(end, -removed);
    }

    /// Shortens the sequence to `len` elements, dropping the rest. Has no effect
    /// if the sequence is already shorter.
    pub fn truncate(&mut self, len: usize) {
        while self.len() > len {
            self.pop_back();
        }
    }

    /// Gets an iterator over the elements, front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.tree.values(),
        }
    }

    /// Gets a mutable iterator over the elements, front to back.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::IndexedSeq;
    ///
    /// let mut seq = IndexedSeq::from([1, 2, 3]);
    /// for value in seq.iter_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(seq, [10, 20, 30]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.tree.values_mut(),
        }
    }

    /// Returns a cursor at `index`. `index` may equal `len`, the end position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::IndexedSeq;
    ///
    /// let seq = IndexedSeq::from(['a', 'b', 'c']);
    /// let begin = seq.cursor(0);
    /// let end = seq.cursor(seq.len());
    /// assert_eq!(begin.distance_to(&end), 3);
    /// assert_eq!((begin + 2).get(), Some(&'c'));
    /// assert!(begin < end);
    /// ```
    pub fn cursor(&self, index: usize) -> Cursor<'_, T, A> {
        Cursor::new(self, index)
    }

    /// Returns a mutable cursor at `index`. `index` may equal `len`, the end position.
    pub fn cursor_mut(&mut self, index: usize) -> CursorMut<'_, T, A> {
        CursorMut::new(self, index)
    }

    /// Verifies the structural invariants of the underlying tree and that the
    /// element positions are exactly `0..len`.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_structure(&self) -> Result<(), StructureError> {
        self.tree.check_structure()?;
        match (self.tree.first(), self.tree.last()) {
            (None, None) => Ok(()),
            (Some((0, _)), Some((last, _))) if last + 1 == self.len() => Ok(()),
            _ => Err(StructureError::Gap),
        }
    }
}

impl<T, A: NodeAllocator> IndexedSeq<T, A> {
    /// Inserts the value produced by `make` at `index`, shifting every element
    /// at or after `index` up by one.
    ///
    /// `make` runs after the later elements are shifted and room for the node is
    /// reserved. If anything fails, the shift is undone before returning, so the
    /// sequence is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::Alloc`] if the allocation strategy refuses a node,
    /// or [`InsertError::Value`] with the error returned by `make`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{IndexedSeq, InsertError};
    ///
    /// let mut seq = IndexedSeq::from([1, 3]);
    /// seq.try_insert_with(1, || "2".parse::<i32>()).unwrap();
    /// assert_eq!(seq, [1, 2, 3]);
    ///
    /// let failed = seq.try_insert_with(0, || "zero".parse::<i32>());
    /// assert!(matches!(failed, Err(InsertError::Value(_))));
    /// assert_eq!(seq, [1, 2, 3]);
    /// ```
    pub fn try_insert_with<E>(&mut self, index: usize, make: impl FnOnce() -> Result<T, E>) -> Result<(), InsertError<E>> {
        let len = self.len();
        assert!(index <= len, "insertion index {index} is out of range for a sequence of length {len}");

        let shifted = index < len;
        if shifted {
            self.tree.shift_from(index, 1);
        }
        match self.tree.raw.try_insert_with(index, make) {
            Ok(_) => Ok(()),
            Err(err) => {
                if shifted {
                    tracing::debug!(index, len, "insertion failed, undoing shift");
                    self.tree.shift_from(index + 1, -1);
                }
                Err(err)
            }
        }
    }

    /// Inserts `value` at `index`, shifting every element at or after `index` up.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if the allocation strategy refuses a node. The
    /// sequence is unchanged in that case.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), AllocError> {
        self.try_insert_with(index, || Ok::<_, Infallible>(value)).map_err(allocation_cause)
    }

    /// Inserts `value` at `index`, shifting every element at or after `index` up.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the allocation strategy refuses a node.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert(index, value) {
            panic!("`IndexedSeq::insert()` - {err}");
        }
    }

    /// Appends `value` at the back.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if the allocation strategy refuses a node.
    pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
        self.try_insert(self.len(), value)
    }

    /// Appends `value` at the back.
    ///
    /// # Panics
    ///
    /// Panics if the allocation strategy refuses a node.
    ///
    /// # Complexity
    ///
    /// O(log n), with no shift.
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.try_push_back(value) {
            panic!("`IndexedSeq::push_back()` - {err}");
        }
    }

    /// Prepends `value` at the front.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if the allocation strategy refuses a node. The
    /// anticipatory shift is undone, so the sequence is unchanged.
    pub fn try_push_front(&mut self, value: T) -> Result<(), AllocError> {
        self.try_insert(0, value)
    }

    /// Prepends `value` at the front.
    ///
    /// # Panics
    ///
    /// Panics if the allocation strategy refuses a node.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.try_push_front(value) {
            panic!("`IndexedSeq::push_front()` - {err}");
        }
    }

    /// Inserts every element produced by `values` starting at `index`, in order.
    ///
    /// All or nothing: if any element fails, every element already inserted by
    /// this call is removed again and the sequence is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Errors
    ///
    /// Returns [`InsertError::Alloc`] or [`InsertError::Value`] for the first
    /// element that could not be inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::IndexedSeq;
    ///
    /// let mut seq = IndexedSeq::from([1, 5]);
    /// let ok = seq.try_insert_iter(1, ["2", "3", "4"].map(str::parse::<i32>));
    /// assert!(ok.is_ok());
    /// assert_eq!(seq, [1, 2, 3, 4, 5]);
    ///
    /// let bad = seq.try_insert_iter(0, ["7", "x"].map(str::parse::<i32>));
    /// assert!(bad.is_err());
    /// assert_eq!(seq, [1, 2, 3, 4, 5]);
    /// ```
    pub fn try_insert_iter<E, I>(&mut self, index: usize, values: I) -> Result<(), InsertError<E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let len = self.len();
        assert!(index <= len, "insertion index {index} is out of range for a sequence of length {len}");

        let mut inserted = 0;
        for value in values {
            if let Err(err) = self.try_insert_with(index + inserted, || value) {
                if inserted > 0 {
                    tracing::debug!(index, inserted, "range insertion failed, rolling back");
                    self.remove_range(index..index + inserted);
                }
                return Err(err);
            }
            inserted += 1;
        }
        Ok(())
    }

    /// Inserts every element of `values` starting at `index`, in order.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the allocation strategy refuses a node; the
    /// elements inserted before the refusal are removed first.
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, index: usize, values: I) {
        if let Err(err) = self.try_insert_iter(index, values.into_iter().map(Ok::<_, Infallible>)) {
            panic!("`IndexedSeq::insert_iter()` - {}", allocation_cause(err));
        }
    }

    /// Exchanges the contents of two sequences.
    ///
    /// O(1) when the allocation strategies are compatible; otherwise every element
    /// is moved into storage granted by the receiving side's strategy.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if either strategy refuses the incoming elements.
    /// Neither sequence is changed in that case.
    pub fn try_swap(&mut self, other: &mut Self) -> Result<(), AllocError> {
        self.tree.try_swap(&mut other.tree)
    }

    /// Exchanges the contents of two sequences.
    ///
    /// # Panics
    ///
    /// Panics where [`try_swap`](Self::try_swap) would return an error.
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }
}

impl<T: Clone, A: NodeAllocator> IndexedSeq<T, A> {
    /// Inserts `n` clones of `value` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the allocation strategy refuses a node.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::IndexedSeq;
    ///
    /// let mut seq = IndexedSeq::from([0, 0]);
    /// seq.insert_n(1, 3, 7);
    /// assert_eq!(seq, [0, 7, 7, 7, 0]);
    /// ```
    pub fn insert_n(&mut self, index: usize, n: usize, value: T) {
        self.insert_iter(index, core::iter::repeat_n(value, n));
    }
}

impl<T, A: NodeAllocator + Clone> IndexedSeq<T, A> {
    /// Replaces the contents with the elements of `values`.
    ///
    /// The new contents are built aside under a clone of the allocation strategy
    /// and swapped in only once complete.
    ///
    /// # Errors
    ///
    /// Returns an [`AllocError`] if the strategy refuses a node. The sequence is
    /// unchanged in that case.
    pub fn try_assign<I: IntoIterator<Item = T>>(&mut self, values: I) -> Result<(), AllocError> {
        let mut fresh = Self::new_in(self.allocator().clone());
        for value in values {
            fresh.try_push_back(value)?;
        }
        *self = fresh;
        Ok(())
    }

    /// Replaces the contents with the elements of `values`.
    ///
    /// # Panics
    ///
    /// Panics if the allocation strategy refuses a node; the old contents are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::IndexedSeq;
    ///
    /// let mut seq = IndexedSeq::from([1, 2, 3]);
    /// seq.assign("ab".chars().map(u32::from));
    /// assert_eq!(seq, [97, 98]);
    /// ```
    pub fn assign<I: IntoIterator<Item = T>>(&mut self, values: I) {
        if let Err(err) = self.try_assign(values) {
            panic!("`IndexedSeq::assign()` - {err}");
        }
    }
}

impl<T: Clone, A: NodeAllocator + Clone> IndexedSeq<T, A> {
    /// Replaces the contents with `n` clones of `value`.
    ///
    /// # Panics
    ///
    /// Panics if the allocation strategy refuses a node; the old contents are kept.
    pub fn assign_n(&mut self, n: usize, value: T) {
        self.assign(core::iter::repeat_n(value, n));
    }
}

impl<T: Clone, A: NodeAllocator + Clone> Clone for IndexedSeq<T, A> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: Hash, A> Hash for IndexedSeq<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: PartialEq, A> PartialEq for IndexedSeq<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A> Eq for IndexedSeq<T, A> {}

impl<T: PartialEq, A, const N: usize> PartialEq<[T; N]> for IndexedSeq<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.len() == N && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, A> PartialEq<[T]> for IndexedSeq<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialEq, A> PartialEq<Vec<T>> for IndexedSeq<T, A> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == **other
    }
}

impl<T: PartialOrd, A> PartialOrd for IndexedSeq<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, A> Ord for IndexedSeq<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: fmt::Debug, A> fmt::Debug for IndexedSeq<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: Default> Default for IndexedSeq<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: NodeAllocator + Default> FromIterator<T> for IndexedSeq<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::default();
        seq.extend(iter);
        seq
    }
}

impl<T, A: NodeAllocator> Extend<T> for IndexedSeq<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a, A: NodeAllocator> Extend<&'a T> for IndexedSeq<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for IndexedSeq<T> {
    fn from(values: [T; N]) -> Self {
        let mut seq = Self::with_capacity(N);
        seq.extend(values);
        seq
    }
}

impl<T> From<Vec<T>> for IndexedSeq<T> {
    fn from(values: Vec<T>) -> Self {
        let mut seq = Self::with_capacity(values.len());
        seq.extend(values);
        seq
    }
}

impl<T, A> Index<usize> for IndexedSeq<T, A> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len`.
    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(value) => value,
            Err(err) => panic!("`IndexedSeq::index()` - {err}"),
        }
    }
}

impl<T, A> IndexMut<usize> for IndexedSeq<T, A> {
    /// # Panics
    ///
    /// Panics if `index >= len`.
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.at_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("`IndexedSeq::index_mut()` - {err}"),
        }
    }
}

impl<'a, T, A> IntoIterator for &'a IndexedSeq<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A> IntoIterator for &'a mut IndexedSeq<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A> IntoIterator for IndexedSeq<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.tree.into_values(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.inner).finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}
