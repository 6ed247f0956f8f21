//! Index-linked node arena backing the recency list.
//!
//! Nodes live in a dense `Vec<Option<Node>>` and point at each other by slot
//! index instead of by reference, so relinking a node never invalidates the
//! indices held by the key map. Vacated slots go on a free list and are
//! handed out again by the next insert.

/// A single entry in the recency list.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Neighbour towards the head (more recently used).
    prev: Option<usize>,
    /// Neighbour towards the tail (less recently used).
    next: Option<usize>,
}

/// Doubly linked list stored in a slot vector.
///
/// The head is the most recently used entry, the tail the least.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn tail(&self) -> Option<usize> {
        self.tail
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&Node<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// Borrow a node that is known to be linked.
    ///
    /// Indices handed to this come from the key map or from list links,
    /// both of which only ever name occupied slots.
    #[allow(clippy::expect_used)]
    pub(crate) fn node(&self, idx: usize) -> &Node<K, V> {
        self.get(idx).expect("linked slot must be occupied")
    }

    /// Mutable counterpart of [`Arena::node`].
    #[allow(clippy::expect_used)]
    pub(crate) fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.get_mut(idx).expect("linked slot must be occupied")
    }

    /// Borrow a vacated slot named by the free list.
    ///
    /// The free list only holds indices below `slots.len()`; `clear` empties
    /// both together.
    #[allow(clippy::expect_used)]
    fn free_slot(&mut self, idx: usize) -> &mut Option<Node<K, V>> {
        self.slots.get_mut(idx).expect("free list names a slot in range")
    }

    /// Store a node in a free slot, or grow the slot vector.
    fn alloc(&mut self, node: Node<K, V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                *self.free_slot(idx) = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Detach a node from its neighbours, leaving it allocated.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    /// Attach a detached node at the head.
    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(h) => self.node_mut(h).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    /// Insert a new entry at the head. Returns its slot index.
    pub(crate) fn push_front(&mut self, key: K, value: V) -> usize {
        let idx = self.alloc(Node {
            key,
            value,
            prev: None,
            next: None,
        });
        self.link_front(idx);
        self.len += 1;
        idx
    }

    /// Move an existing entry to the head.
    pub(crate) fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    /// Unlink and free a slot, returning its entry.
    pub(crate) fn remove(&mut self, idx: usize) -> Option<(K, V)> {
        self.get(idx)?;
        self.unlink(idx);
        let node = self.slots.get_mut(idx).and_then(Option::take)?;
        self.free.push(idx);
        self.len -= 1;
        Some((node.key, node.value))
    }

    pub(crate) fn pop_front(&mut self) -> Option<(K, V)> {
        let idx = self.head?;
        self.remove(idx)
    }

    pub(crate) fn pop_back(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        self.remove(idx)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    pub(crate) fn iter(&self) -> Links<'_, K, V> {
        Links {
            arena: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Walk the list in both directions and return the slot order head to tail.
    ///
    /// Fails with a description of the first broken link. Walks are bounded by
    /// the slot count, so a cycle is reported rather than looped on.
    pub(crate) fn verify_links(&self) -> std::result::Result<Vec<usize>, &'static str> {
        let limit = self.slots.len();
        let mut order = Vec::with_capacity(self.len);

        let mut prev = None;
        let mut cur = self.head;
        while let Some(idx) = cur {
            if order.len() >= limit {
                return Err("forward walk does not terminate");
            }
            let node = self.get(idx).ok_or("forward link points at a free slot")?;
            if node.prev != prev {
                return Err("prev link does not mirror next link");
            }
            order.push(idx);
            prev = Some(idx);
            cur = node.next;
        }
        if self.tail != prev {
            return Err("tail is not the last node of the forward walk");
        }
        if order.len() != self.len {
            return Err("forward walk length differs from len");
        }

        let mut backward = 0;
        let mut cur = self.tail;
        while let Some(idx) = cur {
            if backward >= limit {
                return Err("backward walk does not terminate");
            }
            backward += 1;
            cur = self.get(idx).ok_or("backward link points at a free slot")?.prev;
        }
        if backward != self.len {
            return Err("backward walk length differs from len");
        }

        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        if live != self.len {
            return Err("occupied slot count differs from len");
        }
        if self.free.iter().any(|&idx| self.get(idx).is_some()) {
            return Err("free list names an occupied slot");
        }

        Ok(order)
    }
}

/// Borrowing walk over linked nodes, usable from both ends.
pub(crate) struct Links<'a, K, V> {
    arena: &'a Arena<K, V>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<K, V> Clone for Links<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Links<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.arena.get(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Links<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.arena.get(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(node)
    }
}

impl<K, V> ExactSizeIterator for Links<'_, K, V> {}
