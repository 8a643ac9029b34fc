use core::mem;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{self, Color, Node, Side, Walk};
use crate::allocator::NodeAllocator;
use crate::error::{AllocError, InsertError};
use crate::position::Position;

type Delta<P> = <P as Position>::Delta;

/// The red/black tree backing `RankTree`.
///
/// Positions are never stored. Each node keeps the difference between its
/// position and its parent's, so a node's absolute position is the sum of the
/// deltas on its root path. Rotations and removals rewrite deltas locally to
/// keep every absolute position unchanged.
pub(crate) struct RawRankTree<P: Position, V, A> {
    /// Arena storing tree nodes.
    pub(super) nodes: Arena<Node<Delta<P>>>,
    /// Arena storing values, kept apart so iterators can borrow them independently of links.
    pub(super) values: Arena<V>,
    /// Decides whether the arenas may grow.
    pub(super) allocator: A,
    pub(super) root: Option<Handle>,
    /// Lowest-positioned node, for O(1) access to the front.
    pub(super) leftmost: Option<Handle>,
    /// Highest-positioned node, for O(1) access to the back.
    pub(super) rightmost: Option<Handle>,
    pub(super) len: usize,
}

/// Where a missing position would be linked into the tree.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Slot<D> {
    /// The node that would become the parent, or `None` for an empty tree.
    pub(crate) parent: Option<Handle>,
    /// The new node's delta relative to `parent`.
    pub(crate) delta: D,
}

/// Result of searching for a position.
pub(crate) enum Search<D> {
    /// The position holds the given node.
    Found(Handle),
    /// The position is free; linking a node at the slot would place it there.
    Vacant(Slot<D>),
}

impl<P: Position, V, A> RawRankTree<P, V, A> {
    /// Creates a new, empty tree.
    pub(crate) const fn new_in(allocator: A) -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            allocator,
            root: None,
            leftmost: None,
            rightmost: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity_in(capacity: usize, allocator: A) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            ..Self::new_in(allocator)
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().min(self.values.capacity())
    }

    pub(crate) const fn allocator(&self) -> &A {
        &self.allocator
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) const fn leftmost(&self) -> Option<Handle> {
        self.leftmost
    }

    pub(crate) const fn rightmost(&self) -> Option<Handle> {
        self.rightmost
    }

    /// Clears all elements. No recursion is involved, whatever the tree's shape.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.leftmost = None;
        self.rightmost = None;
        self.len = 0;
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<Delta<P>> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(super) fn node_mut(&mut self, handle: Handle) -> &mut Node<Delta<P>> {
        self.nodes.get_mut(handle)
    }

    /// Returns the node arena alone, for walks that must not borrow the values.
    pub(crate) const fn nodes(&self) -> &Arena<Node<Delta<P>>> {
        &self.nodes
    }

    pub(crate) const fn values(&self) -> &Arena<V> {
        &self.values
    }

    /// Splits the tree into its node arena and its value arena.
    pub(crate) fn split_mut(&mut self) -> (&Arena<Node<Delta<P>>>, &mut Arena<V>) {
        (&self.nodes, &mut self.values)
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(self.nodes.get(handle).value)
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        let value = self.nodes.get(handle).value;
        self.values.get_mut(value)
    }

    /// Returns the absolute position of `handle` as a delta from zero.
    pub(crate) fn position_of(&self, handle: Handle) -> Delta<P> {
        let mut current = self.node(handle);
        let mut position = current.delta;
        while let Some(parent) = current.parent {
            current = self.node(parent);
            position += current.delta;
        }
        position
    }

    /// Returns the in-order neighbour of `handle` on `side`, updating `position`.
    #[inline]
    pub(crate) fn step(&self, handle: Handle, position: &mut Delta<P>, side: Side) -> Option<Handle> {
        node::step(&self.nodes, handle, position, side)
    }

    /// Descends from `from` always taking `side`, returning the last node reached
    /// and the sum of the deltas below `from`.
    fn extreme_below(&self, from: Handle, side: Side) -> (Handle, Delta<P>) {
        let mut current = from;
        let mut offset = Delta::<P>::default();
        while let Some(next) = self.node(current).child(side) {
            offset += self.node(next).delta;
            current = next;
        }
        (current, offset)
    }

    pub(crate) fn search(&self, position: P) -> Search<Delta<P>> {
        let mut remaining = position.to_delta();
        let Some(mut current) = self.root else {
            return Search::Vacant(Slot {
                parent: None,
                delta: remaining,
            });
        };

        loop {
            let node = self.node(current);
            let next = match remaining.cmp(&node.delta) {
                core::cmp::Ordering::Equal => return Search::Found(current),
                core::cmp::Ordering::Less => node.left,
                core::cmp::Ordering::Greater => node.right,
            };
            remaining -= node.delta;
            match next {
                Some(next) => current = next,
                None => {
                    return Search::Vacant(Slot {
                        parent: Some(current),
                        delta: remaining,
                    });
                }
            }
        }
    }

    pub(crate) fn find(&self, position: P) -> Option<Handle> {
        match self.search(position) {
            Search::Found(handle) => Some(handle),
            Search::Vacant(_) => None,
        }
    }

    /// Returns the lowest node whose position satisfies `accept`, which must be
    /// false for a prefix of the in-order sequence and true for the rest.
    pub(crate) fn lowest_where(&self, accept: impl Fn(Delta<P>) -> bool) -> Option<(Handle, Delta<P>)> {
        let mut best = None;
        let mut position = Delta::<P>::default();
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            position += node.delta;
            if accept(position) {
                best = Some((handle, position));
                current = node.left;
            } else {
                current = node.right;
            }
        }
        best
    }

    /// Returns the highest node whose position satisfies `accept`, which must be
    /// true for a prefix of the in-order sequence and false for the rest.
    pub(crate) fn highest_where(&self, accept: impl Fn(Delta<P>) -> bool) -> Option<(Handle, Delta<P>)> {
        let mut best = None;
        let mut position = Delta::<P>::default();
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            position += node.delta;
            if accept(position) {
                best = Some((handle, position));
                current = node.right;
            } else {
                current = node.left;
            }
        }
        best
    }

    /// Moves one node by `by` without touching its subtree.
    ///
    /// The caller guarantees the node stays strictly between its in-order neighbours.
    pub(crate) fn move_node(&mut self, handle: Handle, by: Delta<P>) {
        let node = self.node_mut(handle);
        node.delta += by;
        let (left, right) = (node.left, node.right);
        for child in [left, right].into_iter().flatten() {
            self.node_mut(child).delta -= by;
        }
    }

    /// An in-order walk over the whole tree.
    pub(crate) fn walk(&self) -> Walk<Delta<P>> {
        let end = |handle: Option<Handle>| handle.map(|handle| (handle, self.position_of(handle)));
        match (end(self.leftmost), end(self.rightmost)) {
            (Some(front), Some(back)) => Walk::between(front, back),
            _ => Walk::EMPTY,
        }
    }

    /// Gives up the tree, keeping its node links and values for an owning walk.
    pub(crate) fn into_arenas(self) -> (Arena<Node<Delta<P>>>, Arena<V>) {
        (self.nodes, self.values)
    }

    fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|handle| self.node(handle).is_red())
    }

    fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).color = color;
    }

    /// Which child of its parent `handle` is. `handle` must not be the root.
    fn side_of(&self, handle: Handle) -> Side {
        let parent = self.node(handle).parent.expect("`side_of()` - root has no side");
        if self.node(parent).left == Some(handle) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points `parent`'s link to `old` (or the root) at `new`, and `new` back at `parent`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Handle) {
        match parent {
            Some(parent) => {
                let node = self.node_mut(parent);
                if node.left == Some(old) {
                    node.left = Some(new);
                } else {
                    node.right = Some(new);
                }
            }
            None => self.root = Some(new),
        }
        self.node_mut(new).parent = parent;
    }

    /// Rotates `base` towards `side`, lifting its child on the opposite side.
    /// Returns the lifted node. Absolute positions are unchanged.
    fn rotate(&mut self, base: Handle, side: Side) -> Handle {
        let lifted_side = side.opposite();
        let pivot = self.node(base).child(lifted_side).expect("`rotate()` - nothing to lift");
        let parent = self.node(base).parent;
        self.replace_child(parent, base, pivot);

        let pivot_delta = self.node(pivot).delta;
        let base_delta = self.node(base).delta;
        self.node_mut(pivot).delta += base_delta;
        self.node_mut(base).delta = -pivot_delta;

        let inner = self.node(pivot).child(side);
        self.node_mut(base).set_child(lifted_side, inner);
        if let Some(inner) = inner {
            let node = self.node_mut(inner);
            node.delta += pivot_delta;
            node.parent = Some(base);
        }

        self.node_mut(pivot).set_child(side, Some(base));
        self.node_mut(base).parent = Some(pivot);
        pivot
    }

    /// Links a new node at `slot`. Both arenas must have been reserved.
    pub(crate) fn link(&mut self, slot: Slot<Delta<P>>, value: V) -> Handle {
        let value = self.values.alloc(value);
        let Some(parent) = slot.parent else {
            let root = self.nodes.alloc(Node::new(None, Color::Black, slot.delta, value));
            self.root = Some(root);
            self.leftmost = Some(root);
            self.rightmost = Some(root);
            self.len = 1;
            return root;
        };

        let child = self.nodes.alloc(Node::new(Some(parent), Color::Red, slot.delta, value));
        if Delta::<P>::default() < slot.delta {
            self.node_mut(parent).right = Some(child);
            if self.rightmost == Some(parent) {
                self.rightmost = Some(child);
            }
        } else {
            self.node_mut(parent).left = Some(child);
            if self.leftmost == Some(parent) {
                self.leftmost = Some(child);
            }
        }
        if self.node(parent).is_red() {
            self.insert_rebalance(child, parent);
        }
        self.len += 1;
        child
    }

    fn insert_rebalance(&mut self, mut red: Handle, mut parent: Handle) {
        loop {
            let grand = self.node(parent).parent.expect("red node has a parent");
            let parent_side = self.side_of(parent);
            let uncle = self.node(grand).child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&uncle| self.node(uncle).is_red()) {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                if let Some(great) = self.node(grand).parent {
                    self.set_color(grand, Color::Red);
                    if self.node(great).is_red() {
                        red = grand;
                        parent = great;
                        continue;
                    }
                }
                return;
            }

            self.set_color(grand, Color::Red);
            if self.side_of(red) == parent_side {
                self.set_color(parent, Color::Black);
            } else {
                self.set_color(red, Color::Black);
                self.rotate(parent, parent_side);
            }
            self.rotate(grand, parent_side.opposite());
            return;
        }
    }

    /// Unlinks `target` and returns its value.
    pub(crate) fn remove_node(&mut self, target: Handle) -> V {
        if self.len == 1 {
            self.root = None;
            self.leftmost = None;
            self.rightmost = None;
        } else {
            let Node { parent, left, right, .. } = *self.node(target);
            if self.leftmost == Some(target) {
                self.leftmost = right.or(parent);
            } else if self.rightmost == Some(target) {
                self.rightmost = left.or(parent);
            }

            self.swap_to_leaf(target);
            if !self.node(target).is_red() {
                self.erase_rebalance(target);
            }
            let parent = self.node(target).parent.expect("non-root leaf has a parent");
            let side = self.side_of(target);
            self.node_mut(parent).set_child(side, None);
        }

        self.len -= 1;
        let node = self.nodes.take(target);
        self.values.take(node.value)
    }

    /// Relinks the tree so that `target` becomes a leaf, keeping every other
    /// node's absolute position and the red/black invariants except at `target`.
    fn swap_to_leaf(&mut self, target: Handle) {
        let node = self.node(target);
        match (node.left, node.right) {
            (Some(_), Some(right)) => self.swap_with_successor(target, right),
            (Some(child), None) | (None, Some(child)) => {
                // A node with one child is black and its child is a red leaf.
                let side = if node.left.is_some() { Side::Left } else { Side::Right };
                let lifted = self.node(target).delta;
                self.lift_only_child(target, child, side);
                self.set_color(child, Color::Black);
                self.set_color(target, Color::Red);
                self.node_mut(child).delta += lifted;
            }
            (None, None) => {}
        }
    }

    /// Puts `child`, the only child of `target` on `side`, in `target`'s place
    /// and hangs `target` below it. Deltas are left to the caller.
    fn lift_only_child(&mut self, target: Handle, child: Handle, side: Side) {
        let parent = self.node(target).parent;
        self.replace_child(parent, target, child);
        self.node_mut(child).set_child(side, Some(target));
        let node = self.node_mut(target);
        node.parent = Some(child);
        node.set_child(side, None);
    }

    /// Exchanges `target` (which has two children) with its in-order successor.
    fn swap_with_successor(&mut self, target: Handle, right: Handle) {
        let (successor, below_right) = self.extreme_below(right, Side::Left);
        let offset = self.node(right).delta + below_right;
        let near = self.node(successor).delta;
        let target_delta = self.node(target).delta;
        let adjacent = successor == right;

        if adjacent {
            self.swap_with_right_child(target, successor);
            self.node_mut(successor).delta = target_delta + offset;
            self.node_mut(target).delta = -offset;
        } else {
            self.swap_with_far_successor(target, successor);
            self.node_mut(successor).delta = target_delta + offset;
            let moved_right = self.node(successor).right.expect("successor inherits a right child");
            self.node_mut(moved_right).delta -= offset;
            self.node_mut(target).delta = near - offset;
        }
        let moved_left = self.node(successor).left.expect("successor inherits a left child");
        self.node_mut(moved_left).delta -= offset;

        if let Some(bottom) = self.node(target).right {
            // The successor was black with a single red child.
            let color = self.node(target).color;
            self.set_color(successor, color);
            self.lift_only_child(target, bottom, Side::Right);
            self.set_color(bottom, Color::Black);
            self.set_color(target, Color::Red);
            if !adjacent {
                self.node_mut(bottom).delta += near;
            }
        } else {
            let target_color = self.node(target).color;
            let successor_color = mem::replace(&mut self.node_mut(successor).color, target_color);
            self.set_color(target, successor_color);
        }
    }

    fn swap_with_right_child(&mut self, target: Handle, child: Handle) {
        let parent = self.node(target).parent;
        let left = self.node(target).left;
        let child_right = self.node(child).right;

        self.replace_child(parent, target, child);
        if let Some(left) = left {
            self.node_mut(left).parent = Some(child);
        }
        if let Some(child_right) = child_right {
            self.node_mut(child_right).parent = Some(target);
        }

        let node = self.node_mut(child);
        node.right = Some(target);
        node.left = left;
        let node = self.node_mut(target);
        node.parent = Some(child);
        node.right = child_right;
        node.left = None;
    }

    fn swap_with_far_successor(&mut self, target: Handle, successor: Handle) {
        let parent = self.node(target).parent;
        let left = self.node(target).left;
        let right = self.node(target).right;
        let successor_parent = self.node(successor).parent.expect("far successor has a parent");
        let successor_right = self.node(successor).right;

        self.replace_child(parent, target, successor);
        for child in [left, right].into_iter().flatten() {
            self.node_mut(child).parent = Some(successor);
        }
        self.node_mut(successor_parent).left = Some(target);
        if let Some(successor_right) = successor_right {
            self.node_mut(successor_right).parent = Some(target);
        }

        let node = self.node_mut(successor);
        node.left = left;
        node.right = right;
        let node = self.node_mut(target);
        node.parent = Some(successor_parent);
        node.left = None;
        node.right = successor_right;
    }

    /// Restores black heights before the black leaf `leaf` is unlinked.
    fn erase_rebalance(&mut self, leaf: Handle) {
        let mut current = leaf;
        let mut parent = self.node(leaf).parent.expect("non-root leaf has a parent");
        loop {
            let side = self.side_of(current);
            let sibling = self.node(parent).child(side.opposite()).expect("black node has a sibling");

            if self.node(sibling).is_red() {
                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                self.rotate(parent, side);
                continue;
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(side.opposite());
            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                if self.node(parent).is_red() {
                    self.set_color(parent, Color::Black);
                    return;
                }
                match self.node(parent).parent {
                    Some(grand) => {
                        current = parent;
                        parent = grand;
                        continue;
                    }
                    None => return,
                }
            }

            let mut sibling = sibling;
            if !self.is_red(far) {
                let near = near.expect("red near nephew");
                self.set_color(sibling, Color::Red);
                self.set_color(near, Color::Black);
                sibling = self.rotate(sibling, side.opposite());
            }
            let parent_color = self.node(parent).color;
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            let far = self.node(sibling).child(side.opposite()).expect("red far nephew");
            self.set_color(far, Color::Black);
            self.rotate(parent, side);
            return;
        }
    }
}

impl<P: Position, V, A: NodeAllocator> RawRankTree<P, V, A> {
    /// Ensures one more node can be linked without asking the allocator again.
    pub(crate) fn try_reserve(&mut self) -> Result<(), AllocError> {
        self.nodes.try_reserve(&self.allocator)?;
        self.values.try_reserve(&self.allocator)
    }

    /// Ensures `additional` more nodes can be linked without asking the allocator again.
    pub(crate) fn try_reserve_exact(&mut self, additional: usize) -> Result<(), AllocError> {
        self.nodes.try_reserve_exact(&self.allocator, additional)?;
        self.values.try_reserve_exact(&self.allocator, additional)
    }

    /// Like [`try_reserve`](Self::try_reserve), but a refusal is a panic.
    pub(crate) fn reserve(&mut self) {
        if let Err(err) = self.try_reserve() {
            panic!("`RankTree` could not make room for a node: {err}");
        }
    }

    /// Inserts at a free position. The value is only constructed once the
    /// position is known to be free and room for it is reserved, and nothing
    /// changes if any step fails.
    pub(crate) fn try_insert_with<E>(
        &mut self,
        position: P,
        value: impl FnOnce() -> Result<V, E>,
    ) -> Result<Handle, InsertError<E>> {
        let Search::Vacant(slot) = self.search(position) else {
            return Err(InsertError::Occupied);
        };
        self.try_reserve()?;
        let value = value().map_err(InsertError::Value)?;
        Ok(self.link(slot, value))
    }

    /// Inserts or overwrites, returning the previous value.
    pub(crate) fn insert(&mut self, position: P, value: V) -> Option<V> {
        match self.search(position) {
            Search::Found(handle) => Some(mem::replace(self.value_mut(handle), value)),
            Search::Vacant(slot) => {
                self.reserve();
                self.link(slot, value);
                None
            }
        }
    }
}
