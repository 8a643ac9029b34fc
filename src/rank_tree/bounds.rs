use core::fmt;
use core::iter::FusedIterator;
use core::ops::{Bound, RangeBounds};

use super::RankTree;
use crate::position::Position;
use crate::raw::{Arena, Handle, Node, Walk};

/// An iterator over a sub-range of entries in a `RankTree`.
///
/// This `struct` is created by the [`range`] method on [`RankTree`].
///
/// [`range`]: RankTree::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, P: Position, V> {
    nodes: &'a Arena<Node<P::Delta>>,
    values: &'a Arena<V>,
    walk: Walk<P::Delta>,
}

impl<P: Position, V, A> RankTree<P, V, A> {
    fn found(&self, found: Option<(Handle, P::Delta)>) -> Option<(P, &V)> {
        found.map(|(handle, position)| (P::from_delta(position), self.raw.value(handle)))
    }

    /// Returns the entry with the lowest position at or after `position`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let tree = RankTree::from([(10u32, 'a'), (20, 'b')]);
    /// assert_eq!(tree.first_at_or_after(10), Some((10, &'a')));
    /// assert_eq!(tree.first_at_or_after(11), Some((20, &'b')));
    /// assert_eq!(tree.first_at_or_after(21), None);
    /// ```
    #[must_use]
    pub fn first_at_or_after(&self, position: P) -> Option<(P, &V)> {
        let bound = position.to_delta();
        self.found(self.raw.lowest_where(|at| at >= bound))
    }

    /// Returns the entry with the lowest position strictly after `position`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first_after(&self, position: P) -> Option<(P, &V)> {
        let bound = position.to_delta();
        self.found(self.raw.lowest_where(|at| at > bound))
    }

    /// Returns the entry with the highest position at or before `position`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let tree = RankTree::from([(10u32, 'a'), (20, 'b')]);
    /// assert_eq!(tree.last_at_or_before(19), Some((10, &'a')));
    /// assert_eq!(tree.last_before(10), None);
    /// ```
    #[must_use]
    pub fn last_at_or_before(&self, position: P) -> Option<(P, &V)> {
        let bound = position.to_delta();
        self.found(self.raw.highest_where(|at| at <= bound))
    }

    /// Returns the entry with the highest position strictly before `position`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last_before(&self, position: P) -> Option<(P, &V)> {
        let bound = position.to_delta();
        self.found(self.raw.highest_where(|at| at < bound))
    }

    /// Constructs a double-ended iterator over the entries whose positions lie
    /// within `range`.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`, or if `start == end` and both bounds are
    /// `Excluded`.
    ///
    /// # Complexity
    ///
    /// O(log n) to construct, then O(1) amortized per item.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::RankTree;
    ///
    /// let tree: RankTree<i32, char> = [(3, 'a'), (5, 'b'), (8, 'c')].into_iter().collect();
    /// let inner: Vec<_> = tree.range(4..=8).collect();
    /// assert_eq!(inner, [(5, &'b'), (8, &'c')]);
    /// assert_eq!(tree.range(..3).next(), None);
    /// ```
    pub fn range<R: RangeBounds<P>>(&self, range: R) -> Range<'_, P, V> {
        let (start, end) = (range.start_bound(), range.end_bound());
        if let (Bound::Included(s) | Bound::Excluded(s), Bound::Included(e) | Bound::Excluded(e)) = (start, end) {
            let valid = if matches!((start, end), (Bound::Excluded(_), Bound::Excluded(_))) {
                s < e
            } else {
                s <= e
            };
            assert!(valid, "range start is greater than range end in RankTree");
        }

        let front = match start {
            Bound::Unbounded => self.raw.lowest_where(|_| true),
            Bound::Included(s) => {
                let s = s.to_delta();
                self.raw.lowest_where(|at| at >= s)
            }
            Bound::Excluded(s) => {
                let s = s.to_delta();
                self.raw.lowest_where(|at| at > s)
            }
        };
        let back = match end {
            Bound::Unbounded => self.raw.highest_where(|_| true),
            Bound::Included(e) => {
                let e = e.to_delta();
                self.raw.highest_where(|at| at <= e)
            }
            Bound::Excluded(e) => {
                let e = e.to_delta();
                self.raw.highest_where(|at| at < e)
            }
        };

        let walk = match (front, back) {
            (Some(front), Some(back)) if front.1 <= back.1 => Walk::between(front, back),
            _ => Walk::EMPTY,
        };
        Range {
            nodes: self.raw.nodes(),
            values: self.raw.values(),
            walk,
        }
    }
}

impl<'a, P: Position, V> Iterator for Range<'a, P, V> {
    type Item = (P, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (handle, position) = self.walk.next_front(self.nodes)?;
        Some((P::from_delta(position), self.values.get(self.nodes.get(handle).value)))
    }
}

impl<P: Position, V> DoubleEndedIterator for Range<'_, P, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (handle, position) = self.walk.next_back(self.nodes)?;
        Some((P::from_delta(position), self.values.get(self.nodes.get(handle).value)))
    }
}

impl<P: Position, V> FusedIterator for Range<'_, P, V> {}

impl<P: Position, V> Clone for Range<'_, P, V> {
    fn clone(&self) -> Self {
        Range { ..*self }
    }
}

impl<P: Position, V: fmt::Debug> fmt::Debug for Range<'_, P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
