use dedup_queue::{DedupPolicy, DedupQueue};
use flexi_logger::Logger;
use log::info;

/// A node waiting to be re-checked; two requests for the same node are the same work
#[derive(Debug, Hash, PartialEq, Eq)]
struct Recheck {
    node: &'static str,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    // A dirty node should be re-checked after everything that became dirty before it
    let mut pending = DedupQueue::new();
    for node in ["db", "cache", "api", "db", "web", "cache"] {
        pending.enqueue(Recheck { node });
        info!("Marked {node} dirty, pending: {pending:?}");
    }

    while let Some(recheck) = pending.try_dequeue() {
        info!("Re-checking {}", recheck.node);
    }

    // Dispatch order is fixed at first request
    let mut dispatch = DedupQueue::with_policy(DedupPolicy::KeepExisting);
    dispatch.extend(["open", "resize", "open", "close"]);
    info!("Dispatch order: {dispatch:?}");

    let first = dispatch.dequeue()?;
    info!("Dispatched {first}, next up: {:?}", dispatch.peek());
    Ok(())
}
