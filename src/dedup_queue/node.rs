/// One pending element, owned by the queue's slab and linked by slot
#[derive(Debug)]
pub(super) struct Node<T> {
    pub value: T,
    /// Cached so the lookup table can rehash without touching the element
    pub hash: u64,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl<T> Node<T> {
    /// A detached node to be linked after `prev` (the current tail)
    pub fn new_tail(value: T, hash: u64, prev: Option<usize>) -> Self {
        Node {
            value,
            hash,
            prev,
            next: None,
        }
    }
}
