use core::fmt::Debug;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A logical position that can key a [`RankTree`].
///
/// The tree never stores positions directly. Every node stores the signed
/// [`Delta`](Position::Delta) between its own position and its parent's, which is
/// what lets a whole subtree move by adjusting a single node.
///
/// `to_delta` and `from_delta` convert between a position and its offset from the
/// position type's zero. They must be inverse to each other and order-preserving.
///
/// `Delta` must hold the difference of any two positions, including the type's
/// extremes. Every primitive integer type implements the trait with a signed delta
/// of twice its width; 64-bit and pointer-sized positions use `i128`.
///
/// # Examples
///
/// ```
/// use rank_tree::Position;
///
/// assert_eq!(7usize.to_delta(), 7i128);
/// assert_eq!(u32::from_delta(5i64), 5u32);
/// assert_eq!(u64::MAX.to_delta() - 0u64.to_delta(), i128::from(u64::MAX));
/// ```
///
/// [`RankTree`]: crate::RankTree
pub trait Position: Copy + Ord + Debug {
    /// The signed difference between two positions.
    type Delta: Copy
        + Ord
        + Default
        + Debug
        + Add<Output = Self::Delta>
        + Sub<Output = Self::Delta>
        + Neg<Output = Self::Delta>
        + AddAssign
        + SubAssign;

    /// Returns the offset of `self` from the position type's zero.
    fn to_delta(self) -> Self::Delta;

    /// Returns the position at offset `delta` from the position type's zero.
    ///
    /// # Panics
    ///
    /// Panics if `delta` does not name a valid position.
    fn from_delta(delta: Self::Delta) -> Self;
}

macro_rules! impl_position {
    ($($position:ty => $delta:ty),* $(,)?) => {
        $(
            impl Position for $position {
                type Delta = $delta;

                #[inline]
                fn to_delta(self) -> $delta {
                    <$delta>::try_from(self).expect("position does not fit in its delta type")
                }

                #[inline]
                fn from_delta(delta: $delta) -> $position {
                    <$position>::try_from(delta).expect("delta does not name a valid position")
                }
            }
        )*
    };
}

impl_position! {
    u8 => i16,
    u16 => i32,
    u32 => i64,
    u64 => i128,
    usize => i128,
    i8 => i16,
    i16 => i32,
    i32 => i64,
    i64 => i128,
    isize => i128,
}
