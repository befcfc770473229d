//! Element storage with stable handles and an explicit container order.

use std::{
    fmt,
    mem,
    ops::{Index, IndexMut},
};

use stable_vec::StableVec;

use crate::handle::{hsize, Handle, Opt};


/// A doubly linked list living inside of a `StableVec`.
///
/// The handle of an element is its slot index in the `StableVec` plus the
/// generation of that slot. Slots of removed elements go onto a free list
/// and are handed out again by later pushes, with the generation bumped, so
/// storage stays bounded under repeated insert/erase. A handle to a removed
/// element never matches the generation stored in its slot again, not even
/// across `clear`. The linked list on top of the slots defines the
/// *container order*, which is the insertion order unless elements are
/// explicitly moved with `move_to_back`.
#[derive(Clone)]
pub(crate) struct InPlaceList<H: Handle, T> {
    nodes: StableVec<Node<H, T>>,
    /// Handles for the empty slots below `next_push_index`, already carrying
    /// the generation they are handed out with. Used as a stack.
    free: Vec<H>,
    head: Opt<H>,
    tail: Opt<H>,
    /// Generation of slots that are used for the first time.
    epoch: hsize,
    /// The largest generation any handle of this list has had so far.
    top: hsize,
}

#[derive(Clone)]
struct Node<H: Handle, T> {
    value: T,
    gen: hsize,
    prev: Opt<H>,
    next: Opt<H>,
}

impl<H: Handle, T> InPlaceList<H, T> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            nodes: StableVec::with_capacity(cap),
            free: Vec::new(),
            head: Opt::none(),
            tail: Opt::none(),
            epoch: 0,
            top: 0,
        }
    }

    /// Number of live elements.
    pub(crate) fn len(&self) -> usize {
        self.nodes.num_elements()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Makes sure that `additional` more elements can be pushed without
    /// reallocation. Counted from the next push index, free slots are not
    /// taken into account.
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// The first slot index that has never been used since the last `clear`.
    pub(crate) fn next_push_index(&self) -> usize {
        self.nodes.next_push_index()
    }

    /// Number of empty slots the next pushes will reuse.
    pub(crate) fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// The handle the next `push_back` will return.
    ///
    /// # Panics
    ///
    /// Panics if no slot is free and the handle index space is exhausted.
    pub(crate) fn next_handle(&self) -> H {
        match self.free.last() {
            Some(&h) => h,
            None => H::from_usize_gen(self.nodes.next_push_index(), self.epoch),
        }
    }

    /// Bytes used by live elements.
    pub(crate) fn bytes(&self) -> usize {
        self.len() * mem::size_of::<Node<H, T>>()
    }

    /// Bytes allocated, including free slots.
    pub(crate) fn bytes_reserved(&self) -> usize {
        self.capacity() * mem::size_of::<Node<H, T>>()
            + self.free.capacity() * mem::size_of::<H>()
    }

    /// The node of `h`, if `h` refers to a live element of the current
    /// generation.
    fn node(&self, h: H) -> Option<&Node<H, T>> {
        self.nodes.get(h.to_usize()).filter(|n| n.gen == h.generation())
    }

    fn node_mut(&mut self, h: H) -> Option<&mut Node<H, T>> {
        self.nodes.get_mut(h.to_usize()).filter(|n| n.gen == h.generation())
    }

    pub(crate) fn contains(&self, h: H) -> bool {
        self.node(h).is_some()
    }

    pub(crate) fn get(&self, h: H) -> Option<&T> {
        self.node(h).map(|n| &n.value)
    }

    pub(crate) fn get_mut(&mut self, h: H) -> Option<&mut T> {
        self.node_mut(h).map(|n| &mut n.value)
    }

    pub(crate) fn first(&self) -> Option<H> {
        self.head.into_option()
    }

    pub(crate) fn last(&self) -> Option<H> {
        self.tail.into_option()
    }

    /// The element after `h` in container order.
    pub(crate) fn next_of(&self, h: H) -> Option<H> {
        self.node(h).and_then(|n| n.next.into_option())
    }

    /// Appends `value` at the end of the container order. Reuses the most
    /// recently freed slot if there is one.
    ///
    /// # Panics
    ///
    /// Panics if no slot is free and the handle index space is exhausted.
    pub(crate) fn push_back(&mut self, value: T) -> H {
        let h = self.next_handle();
        let node = Node {
            value,
            gen: h.generation(),
            prev: self.tail,
            next: Opt::none(),
        };

        if self.free.last() == Some(&h) {
            self.free.pop();
            let old = self.nodes.insert(h.to_usize(), node);
            debug_assert!(old.is_none());
        } else {
            let idx = self.nodes.push(node);
            debug_assert_eq!(idx, h.to_usize());
        }

        self.attach_after_tail(h);
        h
    }

    /// Removes the element from the list. Returns `None` if `h` does not
    /// refer to a live element.
    pub(crate) fn remove(&mut self, h: H) -> Option<T> {
        if !self.contains(h) {
            return None;
        }

        self.unlink(h);
        let node = self.nodes.remove(h.to_usize())?;

        let gen = node.gen.wrapping_add(1);
        self.top = self.top.max(gen);
        self.free.push(H::with_generation(h.idx(), gen));
        Some(node.value)
    }

    pub(crate) fn pop_front(&mut self) -> Option<(H, T)> {
        let h = self.first()?;
        self.remove(h).map(|v| (h, v))
    }

    pub(crate) fn pop_back(&mut self) -> Option<(H, T)> {
        let h = self.last()?;
        self.remove(h).map(|v| (h, v))
    }

    /// Moves the element `h` to the end of the container order without
    /// changing its handle.
    pub(crate) fn move_to_back(&mut self, h: H) {
        if !self.contains(h) || self.tail == Opt::some(h) {
            return;
        }

        self.unlink(h);
        self.nodes[h.to_usize()].prev = self.tail;
        self.nodes[h.to_usize()].next = Opt::none();
        self.attach_after_tail(h);
    }

    /// Removes all elements. Slot indices start at 0 again afterwards, with a
    /// generation no handle of this list has had before.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = Opt::none();
        self.tail = Opt::none();
        self.epoch = self.top.wrapping_add(1);
        self.top = self.epoch;
    }

    /// Iterates over all handles in container order.
    pub(crate) fn handles(&self) -> Handles<'_, H, T> {
        Handles {
            list: self,
            current: self.head,
            remaining: self.len(),
        }
    }

    /// Iterates over the handles starting at `start` (inclusive) up to the
    /// end of the container order.
    pub(crate) fn handles_from(&self, start: Option<H>) -> Handles<'_, H, T> {
        let current = match start {
            Some(h) if self.contains(h) => Opt::some(h),
            _ => Opt::none(),
        };
        Handles {
            list: self,
            current,
            remaining: self.len(),
        }
    }

    fn attach_after_tail(&mut self, h: H) {
        match self.tail.into_option() {
            Some(tail) => self.nodes[tail.to_usize()].next = Opt::some(h),
            None => self.head = Opt::some(h),
        }
        self.tail = Opt::some(h);
    }

    /// Takes `h` out of the order links. The slot itself stays untouched.
    fn unlink(&mut self, h: H) {
        let (prev, next) = {
            let node = &self.nodes[h.to_usize()];
            (node.prev, node.next)
        };

        match prev.into_option() {
            Some(p) => self.nodes[p.to_usize()].next = next,
            None => self.head = next,
        }
        match next.into_option() {
            Some(n) => self.nodes[n.to_usize()].prev = prev,
            None => self.tail = prev,
        }
    }
}

impl<H: Handle, T> Index<H> for InPlaceList<H, T> {
    type Output = T;

    fn index(&self, h: H) -> &Self::Output {
        match self.node(h) {
            Some(node) => &node.value,
            None => panic!("no element for handle {:?} (erased or never created)", h),
        }
    }
}

impl<H: Handle, T> IndexMut<H> for InPlaceList<H, T> {
    fn index_mut(&mut self, h: H) -> &mut Self::Output {
        match self.node_mut(h) {
            Some(node) => &mut node.value,
            None => panic!("no element for handle {:?} (erased or never created)", h),
        }
    }
}

impl<H: Handle, T: fmt::Debug> fmt::Debug for InPlaceList<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.handles().map(|h| (h, &self[h])))
            .finish()
    }
}

/// Iterator over the handles of an `InPlaceList` in container order.
#[derive(Debug)]
pub(crate) struct Handles<'a, H: Handle, T> {
    list: &'a InPlaceList<H, T>,
    current: Opt<H>,
    remaining: usize,
}

impl<'a, H: Handle, T> Clone for Handles<'a, H, T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            current: self.current,
            remaining: self.remaining,
        }
    }
}

impl<H: Handle, T> Handles<'_, H, T> {
    /// Ends the iteration early.
    pub(crate) fn exhaust(&mut self) {
        self.current = Opt::none();
        self.remaining = 0;
    }
}

impl<H: Handle, T> Iterator for Handles<'_, H, T> {
    type Item = H;

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.current.into_option()?;
        self.current = self.list.nodes[h.to_usize()].next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(h)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current.is_none() {
            (0, Some(0))
        } else {
            (1, Some(self.remaining))
        }
    }
}
