use alloc::vec::Vec;

use super::handle::Handle;
use super::node::{Color, Side};
use super::raw_rank_tree::RawRankTree;
use crate::error::StructureError;
use crate::position::Position;

impl<P: Position, V, A> RawRankTree<P, V, A> {
    /// Verifies every structural invariant, returning the first violation found.
    ///
    /// Walks the tree with an explicit stack, so a corrupted (even cyclic) shape
    /// is reported rather than overflowing or looping forever.
    pub(crate) fn check_structure(&self) -> Result<(), StructureError> {
        let Some(root) = self.root() else {
            if self.len != 0 {
                return Err(StructureError::CountMismatch {
                    stored: self.len,
                    counted: 0,
                });
            }
            if self.leftmost.is_some() || self.rightmost.is_some() {
                return Err(StructureError::ExtremalCache);
            }
            return Ok(());
        };

        if self.node(root).parent.is_some() {
            return Err(StructureError::RootHasParent);
        }
        if self.node(root).color == Color::Red {
            return Err(StructureError::RedRoot);
        }

        let mut counted = 0;
        let mut black_height = None;
        let mut min_depth = usize::MAX;
        let mut max_depth = 0;
        // (node, depth, black nodes on the path including this one)
        let mut stack: Vec<(Handle, usize, usize)> = alloc::vec![(root, 0, 1)];

        while let Some((handle, depth, blacks)) = stack.pop() {
            counted += 1;
            if counted > self.len {
                return Err(StructureError::CountMismatch {
                    stored: self.len,
                    counted,
                });
            }

            let node = self.node(handle);
            for child in [node.left, node.right] {
                let Some(child) = child else {
                    // Nil children are black and sit one level below their parent.
                    min_depth = min_depth.min(depth + 1);
                    max_depth = max_depth.max(depth + 1);
                    match black_height {
                        None => black_height = Some(blacks),
                        Some(expected) if expected != blacks => {
                            return Err(StructureError::BlackHeight {
                                left: expected,
                                right: blacks,
                            });
                        }
                        Some(_) => {}
                    }
                    continue;
                };

                let child_node = self.node(child);
                if child_node.parent != Some(handle) {
                    return Err(StructureError::ParentLink { depth: depth + 1 });
                }
                if node.is_red() && child_node.is_red() {
                    return Err(StructureError::RedRed { depth: depth + 1 });
                }
                let blacks = blacks + usize::from(!child_node.is_red());
                stack.push((child, depth + 1, blacks));
            }
        }

        if counted != self.len {
            return Err(StructureError::CountMismatch {
                stored: self.len,
                counted,
            });
        }
        // Every live arena slot must be reachable.
        if self.nodes.len() != self.len || self.values.len() != self.len {
            return Err(StructureError::CountMismatch {
                stored: self.len,
                counted: self.nodes.len().max(self.values.len()),
            });
        }
        if max_depth > 2 * min_depth {
            return Err(StructureError::DepthRatio {
                min: min_depth,
                max: max_depth,
            });
        }

        self.check_order(root)
    }

    /// Checks the extremal caches and that in-order positions strictly increase.
    fn check_order(&self, root: Handle) -> Result<(), StructureError> {
        let mut lowest = root;
        while let Some(left) = self.node(lowest).left {
            lowest = left;
        }
        let mut highest = root;
        while let Some(right) = self.node(highest).right {
            highest = right;
        }
        if self.leftmost != Some(lowest) || self.rightmost != Some(highest) {
            return Err(StructureError::ExtremalCache);
        }

        let mut position = self.position_of(lowest);
        let mut previous = position;
        let mut current = self.step(lowest, &mut position, Side::Right);
        let mut index = 1;
        while let Some(handle) = current {
            if position <= previous {
                return Err(StructureError::Unordered { index });
            }
            previous = position;
            current = self.step(handle, &mut position, Side::Right);
            index += 1;
        }
        Ok(())
    }
}
