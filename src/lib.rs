//! An ordered queue that never holds two equal elements.
//!
//! Re-queuing an element that is already pending either leaves the pending one
//! where it is (`enqueue_keep_existing`) or moves it to the back of the line
//! (`enqueue`).
//!
//! ```rust
//! use dedup_queue::DedupQueue;
//!
//! let mut queue = DedupQueue::new();
//! queue.enqueue("a");
//! queue.enqueue("b");
//!
//! assert!(!queue.enqueue_keep_existing("a"));
//! assert_eq!(queue.peek(), Some(&"a"));
//!
//! queue.enqueue("a");
//! assert_eq!(queue.dequeue()?, "b");
//! assert_eq!(queue.dequeue()?, "a");
//! assert!(queue.try_dequeue().is_none());
//! # Ok::<(), dedup_queue::DedupQueueError>(())
//! ```

pub mod dedup_queue;
mod tests;

pub use dedup_queue::{DedupQueue, DedupQueueError, policy::DedupPolicy};
