use core::convert::Infallible;

/// The error returned by bounds-checked accessors such as [`IndexedSeq::at`].
///
/// [`IndexedSeq::at`]: crate::IndexedSeq::at
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("index {index} is out of range for a sequence of length {len}")]
pub struct OutOfRange {
    /// The requested index.
    pub index: usize,
    /// The length of the sequence at the time of the request.
    pub len: usize,
}

/// The error returned when a [`NodeAllocator`] refuses to make room for another node.
///
/// [`NodeAllocator`]: crate::NodeAllocator
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AllocError {
    /// The allocation strategy caps the number of nodes and the cap is reached.
    #[error("node arena is limited to {limit} nodes")]
    LimitExceeded {
        /// The configured node limit.
        limit: usize,
    },
    /// The global allocator could not provide memory.
    #[error("node arena could not reserve memory")]
    OutOfMemory,
    /// Every node handle is in use.
    #[error("node arena is at maximum capacity ({max})")]
    HandlesExhausted {
        /// The maximum number of live nodes.
        max: usize,
    },
}

/// The error returned by the fallible insertion methods.
///
/// `E` is the error type of the value constructor passed to methods such as
/// [`RankTree::try_insert_with`]. Plain value insertions use the default,
/// [`Infallible`].
///
/// Whatever the variant, the container is left exactly as it was before the call.
///
/// [`RankTree::try_insert_with`]: crate::RankTree::try_insert_with
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InsertError<E = Infallible> {
    /// The position already holds an element.
    #[error("position is already occupied")]
    Occupied,
    /// The allocation strategy refused to make room for the new node.
    #[error(transparent)]
    Alloc(#[from] AllocError),
    /// The value constructor failed.
    #[error("value construction failed")]
    Value(E),
}

/// A violated structural invariant, as reported by [`RankTree::check_structure`].
///
/// [`RankTree::check_structure`]: crate::RankTree::check_structure
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum StructureError {
    /// The stored length disagrees with the number of reachable nodes.
    #[error("stored length is {stored} but {counted} nodes are reachable")]
    CountMismatch {
        /// The length the tree reports.
        stored: usize,
        /// The number of nodes reachable from the root.
        counted: usize,
    },
    /// The root node is red.
    #[error("root node is red")]
    RedRoot,
    /// The root node has a parent link.
    #[error("root node has a parent")]
    RootHasParent,
    /// A child does not point back at its parent.
    #[error("node at depth {depth} has a broken parent link")]
    ParentLink {
        /// Depth of the offending node, counting the root as zero.
        depth: usize,
    },
    /// A red node has a red child.
    #[error("red node at depth {depth} has a red child")]
    RedRed {
        /// Depth of the red child, counting the root as zero.
        depth: usize,
    },
    /// Two root-to-nil paths cross a different number of black nodes.
    #[error("black height differs between paths ({left} vs {right})")]
    BlackHeight {
        /// Black height of the first path seen.
        left: usize,
        /// Black height of the offending path.
        right: usize,
    },
    /// The deepest nil child is more than twice as deep as the shallowest.
    #[error("maximum depth {max} exceeds twice the minimum depth {min}")]
    DepthRatio {
        /// Shallowest nil depth.
        min: usize,
        /// Deepest nil depth.
        max: usize,
    },
    /// In-order traversal does not produce strictly increasing positions.
    #[error("positions are not strictly increasing at index {index}")]
    Unordered {
        /// In-order index of the first out-of-order node.
        index: usize,
    },
    /// The cached first or last node is wrong.
    #[error("extremal cache does not match the tree")]
    ExtremalCache,
    /// A sequence's positions are not exactly `0..len`.
    #[error("sequence positions are not contiguous from zero")]
    Gap,
}
