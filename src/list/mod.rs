use std::mem;

mod entry;
pub(crate) use entry::Entry;
use entry::Slot;

/// Position of an entry inside the [`List`] arena.
///
/// Only the list hands these out, and the cache never holds one past the
/// removal of its entry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Handle(usize);

/// Recency order of live entries, most recently used at the head.
///
/// Entries live in a slot arena and link to each other by slot index, so
/// promotion and removal only rewrite indices. Vacated slots are chained
/// into a free list and reused before the arena grows.
#[derive(Debug)]
pub(crate) struct List<K, V> {
    slots: Vec<Slot<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Option<usize>,
    len: usize,
}

impl<K, V> Default for List<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> List<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn get(&self, handle: Handle) -> Option<&Entry<K, V>> {
        self.slots.get(handle.0).and_then(Slot::entry)
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(handle.0).and_then(Slot::entry_mut)
    }

    /// Links a new entry in as the most recently used one.
    pub(crate) fn insert_at_head(&mut self, key: K, value: V) -> Handle {
        let idx = self.alloc(Entry::new(key, value, self.head));
        match self.head {
            Some(old) => self.set_prev(old, Some(idx)),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;

        Handle(idx)
    }

    /// Moves the entry to the head without walking the list.
    pub(crate) fn promote_to_head(&mut self, handle: Handle) {
        let Handle(idx) = handle;
        if self.head == Some(idx) {
            return;
        }

        let linked = self.unlink(idx);
        debug_assert!(linked, "promoted vacant slot {idx}");
        if linked {
            self.link_at_head(idx);
        }
    }

    /// Pops the least recently used entry.
    pub(crate) fn remove_tail(&mut self) -> Option<(K, V)> {
        let idx = self.tail?;
        self.remove(Handle(idx))
    }

    pub(crate) fn remove(&mut self, handle: Handle) -> Option<(K, V)> {
        let Handle(idx) = handle;
        if !self.unlink(idx) {
            debug_assert!(false, "removed vacant slot {idx}");
            return None;
        }

        let entry = self.release(idx)?;
        self.len -= 1;

        Some((entry.key, entry.value))
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.tail = None;
        self.free = None;
        self.len = 0;
    }

    /// Walks from most to least recently used.
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn alloc(&mut self, entry: Entry<K, V>) -> usize {
        match self.free {
            Some(idx) => {
                if let Slot::Vacant(next_free) = self.slots[idx] {
                    self.free = next_free;
                }
                self.slots[idx] = Slot::Occupied(entry);
                idx
            }
            None => {
                self.slots.push(Slot::Occupied(entry));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Option<Entry<K, V>> {
        match mem::replace(&mut self.slots[idx], Slot::Vacant(self.free)) {
            Slot::Occupied(entry) => {
                self.free = Some(idx);
                Some(entry)
            }
            vacant @ Slot::Vacant(_) => {
                self.slots[idx] = vacant;
                None
            }
        }
    }

    // Detaches the entry from its neighbours, leaving it unlinked but occupied.
    fn unlink(&mut self, idx: usize) -> bool {
        let Some(entry) = self.slots.get_mut(idx).and_then(Slot::entry_mut) else {
            return false;
        };
        let (prev, next) = (entry.prev.take(), entry.next.take());

        match prev {
            Some(prev) => self.set_next(prev, next),
            None => self.head = next,
        }
        match next {
            Some(next) => self.set_prev(next, prev),
            None => self.tail = prev,
        }

        true
    }

    fn link_at_head(&mut self, idx: usize) {
        let old = self.head;
        if let Some(entry) = self.slots[idx].entry_mut() {
            entry.prev = None;
            entry.next = old;
        }
        match old {
            Some(old) => self.set_prev(old, Some(idx)),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn set_prev(&mut self, idx: usize, prev: Option<usize>) {
        if let Some(entry) = self.slots[idx].entry_mut() {
            entry.prev = prev;
        }
    }

    fn set_next(&mut self, idx: usize, next: Option<usize>) {
        if let Some(entry) = self.slots[idx].entry_mut() {
            entry.next = next;
        }
    }
}

pub(crate) struct Iter<'a, K, V> {
    list: &'a List<K, V>,
    cursor: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.slots.get(self.cursor?).and_then(Slot::entry)?;
        self.cursor = entry.next;
        Some((&entry.key, &entry.value))
    }
}

#[cfg(test)]
impl<K, V> List<K, V>
where
    K: Clone,
{
    /// Walks the links both ways and panics on any inconsistency.
    pub(crate) fn assert_consistent(&self) -> Vec<K> {
        assert_eq!(self.head.is_none(), self.tail.is_none());
        assert_eq!(self.head.is_none(), self.len == 0);

        let mut forward = vec![];
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let entry = self.slots[idx].entry().expect("linked slot is occupied");
            assert_eq!(entry.prev, prev, "broken back link at slot {idx}");
            forward.push(idx);
            prev = Some(idx);
            cursor = entry.next;
        }
        assert_eq!(prev, self.tail);
        assert_eq!(forward.len(), self.len);

        let occupied = self.slots.iter().filter(|s| s.entry().is_some()).count();
        assert_eq!(occupied, self.len, "occupied slot outside the chain");

        forward
            .into_iter()
            .map(|idx| self.slots[idx].entry().expect("occupied").key.clone())
            .collect()
    }
}
