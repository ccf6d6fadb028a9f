//! # Pool Task Trait
//!
//! The unit of work the worker pool executes. Tasks own all the data they
//! need (handles and snapshots cloned up front), run once on a worker
//! thread, and hand back a plain outcome value that the chunk manager
//! applies on its own thread.

/// A unit of work for the worker pool.
///
/// # Implementation Guidelines
/// - Must be `Send`; the task is moved onto a worker thread
/// - Should own its data: shared handles, not borrowed references
/// - Coarse-grained work (a whole chunk) amortizes scheduling overhead
pub trait PoolTask<O>: Send {
    /// Performs the work on a worker thread, consuming the task.
    fn run(self: Box<Self>) -> O;

    /// The outcome reported if `run` panics, letting the pool turn a dead
    /// task into a failure the manager can log and retry instead of a lost
    /// chunk.
    fn on_panic(&self) -> O;
}
