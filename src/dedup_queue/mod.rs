/// Duplicate handling policy used by `push`, `Extend` and `FromIterator`
pub mod policy;

mod node;

use std::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash, RandomState},
    iter,
};

use hashbrown::HashTable;
use log::{debug, trace};
use slab::Slab;
use thiserror::Error;

use crate::dedup_queue::{node::Node, policy::DedupPolicy};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupQueueError {
    #[error("Cannot enqueue an absent element")]
    InvalidArgument,

    #[error("Queue is empty")]
    EmptyCollection,
}

/// A FIFO queue that holds at most one element of each equality class.
///
/// Nodes live in a slab and are chained head to tail by slot. The lookup table
/// maps an element's hash to its slot, so membership checks, displacement and
/// removal from the middle are all O(1).
///
/// It is a logic error to change an element's `Hash` or `Eq` while it is
/// queued.
pub struct DedupQueue<T, S = RandomState> {
    head: Option<usize>,
    tail: Option<usize>,
    nodes: Slab<Node<T>>,
    table: HashTable<usize>,
    hasher: S,
    policy: DedupPolicy,
}

impl<T> DedupQueue<T, RandomState> {
    /// New empty queue that moves re-queued elements to the tail
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// New empty queue whose `push` follows `policy`
    pub fn with_policy(policy: DedupPolicy) -> Self {
        let mut queue = Self::new();
        queue.policy = policy;
        queue
    }
}

impl<T> Default for DedupQueue<T, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> DedupQueue<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        DedupQueue {
            head: None,
            tail: None,
            nodes: Slab::with_capacity(capacity),
            table: HashTable::with_capacity(capacity),
            hasher,
            policy: DedupPolicy::default(),
        }
    }

    /// Number of pending elements
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    /// Change the policy applied by later pushes. Already queued elements are not touched
    pub fn set_policy(&mut self, policy: DedupPolicy) {
        self.policy = policy;
    }

    /// Head element, or `None` if the queue is empty
    pub fn peek(&self) -> Option<&T> {
        self.head.map(|slot| &self.nodes[slot].value)
    }

    /// Head element, failing with `EmptyCollection` if the queue is empty
    pub fn peek_strict(&self) -> Result<&T, DedupQueueError> {
        self.peek().ok_or(DedupQueueError::EmptyCollection)
    }

    /// Remove and return the head element, or `None` if the queue is empty
    pub fn try_dequeue(&mut self) -> Option<T> {
        let slot = self.head?;
        Some(self.remove_slot(slot))
    }

    /// Remove and return the head element, failing with `EmptyCollection` if the queue is empty
    pub fn dequeue(&mut self) -> Result<T, DedupQueueError> {
        self.try_dequeue().ok_or(DedupQueueError::EmptyCollection)
    }

    /// Drop every pending element
    pub fn clear(&mut self) {
        debug!("Clearing {} pending elements", self.nodes.len());
        self.table.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Elements from head to tail
    fn walk(&self) -> impl Iterator<Item = &T> {
        iter::successors(self.head, |&slot| self.nodes[slot].next)
            .map(|slot| &self.nodes[slot].value)
    }

    /// Append a node for `value` after the current tail and register it in the lookup table
    fn link_last(&mut self, value: T, hash: u64) {
        let prev = self.tail;
        let slot = self.nodes.insert(Node::new_tail(value, hash, prev));

        match prev {
            Some(tail) => self.nodes[tail].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);

        self.table
            .insert_unique(hash, slot, |&s| self.nodes[s].hash);

        trace!("Linked slot {slot} at tail, {} pending", self.nodes.len());
    }

    /// Splice a node out of the chain and free its slot. The lookup entry must already be gone
    fn unlink(&mut self, slot: usize) -> T {
        let node = self.nodes.remove(slot);

        match node.prev {
            Some(prev) => self.nodes[prev].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes[next].prev = node.prev,
            None => self.tail = node.prev,
        }

        trace!("Unlinked slot {slot}, {} pending", self.nodes.len());
        node.value
    }

    /// Drop the lookup entry for `slot` (matched by slot, not by element) and unlink it
    fn remove_slot(&mut self, slot: usize) -> T {
        let hash = self.nodes[slot].hash;
        match self.table.find_entry(hash, |&s| s == slot) {
            Ok(entry) => {
                entry.remove();
            }
            Err(_) => {
                #[cfg(debug_assertions)]
                unreachable!("Slot {slot} is linked but missing from the lookup table");
            }
        }
        self.unlink(slot)
    }
}

impl<T, S> DedupQueue<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Append `value` unless an equal element is already pending.
    ///
    /// Returns `false`, leaving the pending element (and its payload) in place,
    /// when a duplicate exists.
    pub fn enqueue_keep_existing(&mut self, value: T) -> bool {
        let hash = self.hasher.hash_one(&value);
        if self.find_slot(hash, &value).is_some() {
            trace!("Rejected duplicate, {} pending", self.nodes.len());
            return false;
        }
        self.link_last(value, hash);
        true
    }

    /// Append `value` at the tail, first removing any equal element already pending.
    ///
    /// Always returns `true`: the element is pending at the tail afterwards.
    pub fn enqueue(&mut self, value: T) -> bool {
        self.requeue(value);
        true
    }

    /// Like `enqueue`, but hands back the displaced element if there was one
    pub fn requeue(&mut self, value: T) -> Option<T> {
        let hash = self.hasher.hash_one(&value);
        let old_slot = self
            .table
            .find_entry(hash, |&s| self.nodes[s].value == value)
            .ok()
            .map(|entry| entry.remove().0);
        let displaced = old_slot.map(|slot| self.unlink(slot));

        if displaced.is_some() {
            trace!("Displaced pending element to the tail");
        }
        self.link_last(value, hash);
        displaced
    }

    /// `enqueue` for a possibly absent element
    pub fn try_enqueue(&mut self, value: Option<T>) -> Result<bool, DedupQueueError> {
        let value = value.ok_or(DedupQueueError::InvalidArgument)?;
        Ok(self.enqueue(value))
    }

    /// `enqueue_keep_existing` for a possibly absent element
    pub fn try_enqueue_keep_existing(&mut self, value: Option<T>) -> Result<bool, DedupQueueError> {
        let value = value.ok_or(DedupQueueError::InvalidArgument)?;
        Ok(self.enqueue_keep_existing(value))
    }

    /// Enqueue according to the configured `DedupPolicy`
    pub fn push(&mut self, value: T) -> bool {
        match self.policy {
            DedupPolicy::MoveToTail => self.enqueue(value),
            DedupPolicy::KeepExisting => self.enqueue_keep_existing(value),
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(key);
        self.find_slot(hash, key).is_some()
    }

    /// Remove the pending element equal to `key`, wherever it sits in the queue
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(key);
        let slot = self
            .table
            .find_entry(hash, |&s| Borrow::<Q>::borrow(&self.nodes[s].value) == key)
            .ok()?
            .remove()
            .0;
        Some(self.unlink(slot))
    }

    fn find_slot<Q>(&self, hash: u64, key: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.table
            .find(hash, |&s| Borrow::<Q>::borrow(&self.nodes[s].value) == key)
            .copied()
    }

    /// Walk the chain both ways and cross-check it against the lookup table
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert_eq!(self.nodes.len(), self.table.len(), "Chain and lookup table sizes differ");
        assert_eq!(self.head.is_none(), self.nodes.is_empty(), "Head must be set iff the queue is non-empty");
        assert_eq!(self.tail.is_none(), self.nodes.is_empty(), "Tail must be set iff the queue is non-empty");

        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = &self.nodes[slot];
            assert_eq!(node.prev, prev, "Back link of slot {slot} is wrong");
            assert_eq!(node.hash, self.hasher.hash_one(&node.value), "Cached hash of slot {slot} is stale");
            assert_eq!(
                self.find_slot(node.hash, &node.value),
                Some(slot),
                "Lookup does not resolve slot {slot} to itself (duplicate or missing entry)"
            );

            count += 1;
            assert!(count <= self.nodes.len(), "Chain is longer than the node count (cycle?)");
            prev = Some(slot);
            cursor = node.next;
        }

        assert_eq!(prev, self.tail, "Chain does not end at the tail");
        assert_eq!(count, self.nodes.len(), "Chain length differs from the node count");
    }
}

impl<T, S> Extend<T> for DedupQueue<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: Hash + Eq> FromIterator<T> for DedupQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = DedupQueue::new();
        queue.extend(iter);
        queue
    }
}

impl<T: fmt::Debug, S> fmt::Debug for DedupQueue<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Pending<'a, T, S>(&'a DedupQueue<T, S>);

        impl<T: fmt::Debug, S> fmt::Debug for Pending<'_, T, S> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list().entries(self.0.walk()).finish()
            }
        }

        f.debug_struct("DedupQueue")
            .field("policy", &self.policy)
            .field("pending", &Pending(self))
            .finish()
    }
}
