use core::ops::{AddAssign, SubAssign};

use super::arena::Arena;
use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child of a node. Every rebalancing step has a mirror image; writing
/// them against a `Side` lets one body serve both.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A red/black tree node.
///
/// `delta` is the node's position minus its parent's position; for the root it
/// is the absolute position. The payload lives in a separate arena under `value`.
#[derive(Clone, Debug)]
pub(crate) struct Node<D> {
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) color: Color,
    pub(crate) delta: D,
    pub(crate) value: Handle,
}

impl<D> Node<D> {
    pub(crate) const fn new(parent: Option<Handle>, color: Color, delta: D, value: Handle) -> Self {
        Self {
            parent,
            left: None,
            right: None,
            color,
            delta,
            value,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Returns the in-order neighbour of `from` on `side`, keeping `position`
/// (the running absolute delta of the current node) in step.
///
/// Only the node arena is touched, so iterators that hand out mutable
/// references into the value arena can walk the tree with it.
pub(crate) fn step<D>(nodes: &Arena<Node<D>>, from: Handle, position: &mut D, side: Side) -> Option<Handle>
where
    D: Copy + AddAssign + SubAssign,
{
    let node = nodes.get(from);
    if let Some(mut current) = node.child(side) {
        *position += nodes.get(current).delta;
        while let Some(next) = nodes.get(current).child(side.opposite()) {
            *position += nodes.get(next).delta;
            current = next;
        }
        return Some(current);
    }

    let mut current = from;
    loop {
        let node = nodes.get(current);
        *position -= node.delta;
        let parent = node.parent?;
        if nodes.get(parent).child(side) != Some(current) {
            return Some(parent);
        }
        current = parent;
    }
}

/// The unvisited stretch of an in-order walk: both ends with their absolute
/// positions. Ends meet rather than cross, so no count is needed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Walk<D> {
    front: Option<(Handle, D)>,
    back: Option<(Handle, D)>,
}

impl<D> Walk<D>
where
    D: Copy + AddAssign + SubAssign,
{
    pub(crate) const EMPTY: Self = Self { front: None, back: None };

    /// A walk over the inclusive stretch from `front` to `back`, which must not be
    /// after `back` in order.
    pub(crate) const fn between(front: (Handle, D), back: (Handle, D)) -> Self {
        Self {
            front: Some(front),
            back: Some(back),
        }
    }

    pub(crate) fn next_front(&mut self, nodes: &Arena<Node<D>>) -> Option<(Handle, D)> {
        let current = self.front?;
        self.advance(nodes, current, Side::Right);
        Some(current)
    }

    pub(crate) fn next_back(&mut self, nodes: &Arena<Node<D>>) -> Option<(Handle, D)> {
        let current = self.back?;
        self.advance(nodes, current, Side::Left);
        Some(current)
    }

    fn advance(&mut self, nodes: &Arena<Node<D>>, (handle, mut position): (Handle, D), side: Side) {
        if self.front.map(|(h, _)| h) == self.back.map(|(h, _)| h) {
            *self = Self::EMPTY;
            return;
        }
        let next = step(nodes, handle, &mut position, side).map(|h| (h, position));
        match side {
            Side::Right => self.front = next,
            Side::Left => self.back = next,
        }
    }
}
