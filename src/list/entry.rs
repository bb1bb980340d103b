/// A live key/value pair and its neighbours in the recency order.
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(super) prev: Option<usize>,
    pub(super) next: Option<usize>,
}

impl<K, V> Entry<K, V> {
    pub(super) fn new(key: K, value: V, next: Option<usize>) -> Self {
        Self {
            key,
            value,
            prev: None,
            next,
        }
    }
}

#[derive(Debug)]
pub(super) enum Slot<K, V> {
    Occupied(Entry<K, V>),
    // Links to the next free slot, forming the free list.
    Vacant(Option<usize>),
}

impl<K, V> Slot<K, V> {
    pub(super) fn entry(&self) -> Option<&Entry<K, V>> {
        match self {
            Self::Occupied(entry) => Some(entry),
            Self::Vacant(_) => None,
        }
    }

    pub(super) fn entry_mut(&mut self) -> Option<&mut Entry<K, V>> {
        match self {
            Self::Occupied(entry) => Some(entry),
            Self::Vacant(_) => None,
        }
    }
}
