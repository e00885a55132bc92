/// What a queue does when it is handed an element equal to one already pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Drop the old occurrence and append the new one at the tail
    #[default]
    MoveToTail,

    /// Leave the old occurrence where it is and reject the new one
    KeepExisting,
}
