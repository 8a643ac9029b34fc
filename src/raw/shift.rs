use super::raw_rank_tree::RawRankTree;
use crate::position::Position;

impl<P: Position, V, A> RawRankTree<P, V, A> {
    /// Adds `by` to the position of every node at or after `boundary`.
    ///
    /// Walks a single root-to-leaf path. Whenever the path crosses from nodes
    /// before the boundary into nodes at or after it, the crossing node takes
    /// the shift for its whole subtree; crossing back cancels it for the
    /// subtree that lies before the boundary.
    ///
    /// The caller guarantees no position moves past a node that is not shifted.
    pub(crate) fn shift_from(&mut self, boundary: P, by: P::Delta) {
        let mut remaining = boundary.to_delta();
        let mut current = self.root;
        loop {
            // Unshifted region: skip right past nodes before the boundary.
            loop {
                let Some(handle) = current else { return };
                let node = self.node_mut(handle);
                let before = node.delta < remaining;
                remaining -= node.delta;
                if before {
                    current = node.right;
                } else {
                    node.delta += by;
                    current = node.left;
                    break;
                }
            }
            // Shifted region: skip left past nodes at or after the boundary.
            loop {
                let Some(handle) = current else { return };
                let node = self.node_mut(handle);
                let before = node.delta < remaining;
                remaining -= node.delta;
                if before {
                    node.delta -= by;
                    current = node.right;
                    break;
                }
                current = node.left;
            }
        }
    }

    /// Adds `by` to the position of every node strictly before `boundary`.
    ///
    /// The mirror image of [`shift_from`](Self::shift_from).
    pub(crate) fn shift_before(&mut self, boundary: P, by: P::Delta) {
        let mut remaining = boundary.to_delta();
        let mut current = self.root;
        loop {
            // Unshifted region: skip left past nodes at or after the boundary.
            loop {
                let Some(handle) = current else { return };
                let node = self.node_mut(handle);
                let before = node.delta < remaining;
                remaining -= node.delta;
                if before {
                    node.delta += by;
                    current = node.right;
                    break;
                }
                current = node.left;
            }
            // Shifted region: skip right past nodes before the boundary.
            loop {
                let Some(handle) = current else { return };
                let node = self.node_mut(handle);
                let before = node.delta < remaining;
                remaining -= node.delta;
                if before {
                    current = node.right;
                } else {
                    node.delta -= by;
                    current = node.left;
                    break;
                }
            }
        }
    }
}
