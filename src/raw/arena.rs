use alloc::vec::Vec;

use super::handle::Handle;
use crate::allocator::NodeAllocator;
use crate::error::AllocError;

/// Slot storage addressed by [`Handle`], with a free list for recycling.
///
/// The arena never grows on its own initiative: callers reserve through a
/// [`NodeAllocator`] first, then [`alloc`](Arena::alloc) fills the reserved room.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Ensures the next [`alloc`](Arena::alloc) will not need to grow the slot vector.
    pub(crate) fn try_reserve<A: NodeAllocator>(&mut self, allocator: &A) -> Result<(), AllocError> {
        if !self.free.is_empty() || self.slots.len() < self.slots.capacity() {
            return Ok(());
        }
        if self.slots.len() >= Handle::MAX {
            return Err(AllocError::HandlesExhausted { max: Handle::MAX });
        }
        allocator.grow(&mut self.slots, 1)
    }

    /// Ensures `additional` fresh slots can be allocated without growing.
    pub(crate) fn try_reserve_exact<A: NodeAllocator>(
        &mut self,
        allocator: &A,
        additional: usize,
    ) -> Result<(), AllocError> {
        if self.slots.len().saturating_add(additional) > Handle::MAX {
            return Err(AllocError::HandlesExhausted { max: Handle::MAX });
        }
        if self.slots.capacity() - self.slots.len() >= additional {
            return Ok(());
        }
        allocator.grow(&mut self.slots, additional)
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()] = Some(element);
            h
        } else {
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns a raw pointer to the first slot, for iterators that hand out
    /// disjoint mutable references.
    pub(crate) fn slots_mut_ptr(&mut self) -> *mut Option<T> {
        self.slots.as_mut_ptr()
    }

    /// Returns the element in slot `handle` below `base`.
    ///
    /// # Safety
    /// - `base` must come from [`slots_mut_ptr`](Arena::slots_mut_ptr) on an arena that
    ///   has not been structurally modified since.
    /// - No other reference to the element at `handle` may be live for `'a`.
    #[inline]
    pub(crate) unsafe fn get_mut_raw<'a>(base: *mut Option<T>, handle: Handle) -> &'a mut T {
        // SAFETY: The caller guarantees `base` is valid and that the slot is not aliased.
        unsafe { (*base.add(handle.to_index())).as_mut().expect("`Arena::get_mut_raw()` - `handle` is invalid!") }
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
