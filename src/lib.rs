//! Relative-key red/black trees and the sequences built on them.
//!
//! This crate provides two collections:
//!
//! - [`RankTree`] - an ordered map from integer positions to values. Every node
//!   stores its position relative to its parent, so every entry at or after a
//!   boundary can be [shifted](RankTree::shift_from) in O(log n), however many
//!   entries move.
//! - [`IndexedSeq`] - a double-ended sequence over a `RankTree<usize, T>`, with
//!   O(log n) insertion and removal at any index and O(1) access to both ends.
//!
//! # Example
//!
//! ```
//! use rank_tree::{IndexedSeq, RankTree};
//!
//! let mut lines = RankTree::new();
//! lines.insert(10u32, "ten");
//! lines.insert(20, "twenty");
//!
//! // Renumber everything from 15 onwards in one O(log n) step.
//! lines.shift_from(15, 100);
//! assert_eq!(lines.get(120), Some(&"twenty"));
//!
//! let mut seq: IndexedSeq<_> = (0..5).collect();
//! seq.insert(2, 99);
//! assert_eq!(seq, [0, 1, 99, 2, 3, 4]);
//! assert_eq!(seq.remove(0), Some(0));
//! assert_eq!(seq[1], 99);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Transactional insertion** - A refused allocation or a failed value constructor
//!   leaves the container untouched
//! - **Injectable allocation** - Node storage grows through a [`NodeAllocator`], such
//!   as [`Bounded`] to cap the number of nodes
//! - **Self-checking** - `check_structure` verifies every red/black and ordering invariant
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to each other by 32-bit handles. Values are
//! kept in a separate arena, so node rotations and swaps never move a value.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: Unsafe code is confined to the mutable iterators, which hand out disjoint value slots.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod allocator;
mod error;
mod position;
mod raw;

pub mod indexed_seq;
pub mod rank_tree;

pub use allocator::{Bounded, Global, NodeAllocator};
pub use error::{AllocError, InsertError, OutOfRange, StructureError};
pub use indexed_seq::{Cursor, CursorMut, IndexedSeq};
pub use position::Position;
pub use rank_tree::RankTree;
