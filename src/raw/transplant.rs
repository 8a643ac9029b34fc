use core::mem;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use super::raw_rank_tree::RawRankTree;
use crate::allocator::NodeAllocator;
use crate::error::AllocError;
use crate::position::Position;

/// Rebuilds the tree below `root` in `target_nodes`, shape, colors and deltas
/// included, producing each value with `value`. Returns the new root.
///
/// The target arenas must already have room for every node.
fn copy_structure<D: Copy, W>(
    nodes: &Arena<Node<D>>,
    root: Handle,
    target_nodes: &mut Arena<Node<D>>,
    target_values: &mut Arena<W>,
    mut value: impl FnMut(Handle) -> W,
) -> Handle {
    // Pending source nodes with the copied parent and side to link them under.
    // Depth-first, so the stack stays near the tree height.
    let mut stack: SmallVec<[(Handle, Option<(Handle, Side)>); 64]> = SmallVec::new();
    stack.push((root, None));
    let mut new_root = None;

    while let Some((old, link)) = stack.pop() {
        let node = nodes.get(old);
        let new_value = target_values.alloc(value(node.value));
        let parent = link.map(|(parent, _)| parent);
        let new = target_nodes.alloc(Node::new(parent, node.color, node.delta, new_value));
        match link {
            Some((parent, side)) => target_nodes.get_mut(parent).set_child(side, Some(new)),
            None => new_root = Some(new),
        }
        if let Some(right) = node.right {
            stack.push((right, Some((new, Side::Right))));
        }
        if let Some(left) = node.left {
            stack.push((left, Some((new, Side::Left))));
        }
    }
    new_root.expect("root is copied first")
}

impl<P: Position, V, A> RawRankTree<P, V, A> {
    /// Moves every node into fresh arenas with room reserved by the caller,
    /// leaving `self` empty. Returns the root in the new arenas.
    fn transplant_into(&mut self, nodes: &mut Arena<Node<P::Delta>>, values: &mut Arena<V>) -> Option<Handle> {
        let root = self.root?;
        let source_values = &mut self.values;
        let new_root = copy_structure(&self.nodes, root, nodes, values, |value| source_values.take(value));
        self.clear();
        Some(new_root)
    }

    /// Adopts arenas built by [`transplant_into`](Self::transplant_into).
    fn install(&mut self, nodes: Arena<Node<P::Delta>>, values: Arena<V>, root: Option<Handle>, len: usize) {
        self.nodes = nodes;
        self.values = values;
        self.root = root;
        self.len = len;
        self.refresh_extremes();
    }

    fn refresh_extremes(&mut self) {
        let descend = |mut current: Handle, side: Side| {
            while let Some(next) = self.node(current).child(side) {
                current = next;
            }
            current
        };
        let leftmost = self.root.map(|root| descend(root, Side::Left));
        let rightmost = self.root.map(|root| descend(root, Side::Right));
        self.leftmost = leftmost;
        self.rightmost = rightmost;
    }
}

impl<P: Position, V, A: NodeAllocator> RawRankTree<P, V, A> {
    /// Exchanges contents with `other`.
    ///
    /// Compatible allocators swap arenas in O(1). Otherwise every node is moved
    /// into storage reserved from the receiving side's allocator; both
    /// reservations are made before anything moves, so a refusal changes nothing.
    pub(crate) fn try_swap(&mut self, other: &mut Self) -> Result<(), AllocError> {
        if self.allocator.is_compatible(&other.allocator) {
            mem::swap(&mut self.nodes, &mut other.nodes);
            mem::swap(&mut self.values, &mut other.values);
            mem::swap(&mut self.root, &mut other.root);
            mem::swap(&mut self.leftmost, &mut other.leftmost);
            mem::swap(&mut self.rightmost, &mut other.rightmost);
            mem::swap(&mut self.len, &mut other.len);
            return Ok(());
        }

        tracing::debug!(
            left = self.len,
            right = other.len,
            "allocators are incompatible, swapping by transplant"
        );
        let mut to_other = (Arena::new(), Arena::new());
        to_other.0.try_reserve_exact(&other.allocator, self.len)?;
        to_other.1.try_reserve_exact(&other.allocator, self.len)?;
        let mut to_self = (Arena::new(), Arena::new());
        to_self.0.try_reserve_exact(&self.allocator, other.len)?;
        to_self.1.try_reserve_exact(&self.allocator, other.len)?;

        let (self_len, other_len) = (self.len, other.len);
        let root_for_other = self.transplant_into(&mut to_other.0, &mut to_other.1);
        let root_for_self = other.transplant_into(&mut to_self.0, &mut to_self.1);
        self.install(to_self.0, to_self.1, root_for_self, other_len);
        other.install(to_other.0, to_other.1, root_for_other, self_len);
        Ok(())
    }
}

impl<P: Position, V: Clone, A: NodeAllocator + Clone> RawRankTree<P, V, A> {
    /// Clones into a tree with the same allocator, reserving every node first.
    pub(crate) fn try_clone(&self) -> Result<Self, AllocError> {
        let mut copy = Self::new_in(self.allocator.clone());
        let Some(root) = self.root else {
            return Ok(copy);
        };
        copy.try_reserve_exact(self.len)?;
        let values = &self.values;
        let mut nodes = mem::replace(&mut copy.nodes, Arena::new());
        let mut new_values = mem::replace(&mut copy.values, Arena::new());
        let new_root = copy_structure(&self.nodes, root, &mut nodes, &mut new_values, |value| {
            values.get(value).clone()
        });
        copy.install(nodes, new_values, Some(new_root), self.len);
        Ok(copy)
    }
}

impl<P: Position, V: Clone, A: NodeAllocator + Clone> Clone for RawRankTree<P, V, A> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("`RankTree::clone()` could not reserve nodes: {err}"),
        }
    }
}
