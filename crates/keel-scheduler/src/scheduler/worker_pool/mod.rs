mod core;

use crate::id::WorkerId;

/// The non-actor workers known to the scheduler, partitioned by state.
///
/// A worker is in at most one of the three vectors. Workers that have been
/// started but have not yet signaled availability are tracked by the worker
/// manager, not here. Actor workers never appear here; they live inside
/// their actor's bookkeeping.
pub(crate) struct WorkerPool {
    /// Workers waiting to be assigned a task.
    available_workers: Vec<WorkerId>,
    /// Workers currently executing a task, holding its resource reservation.
    executing_workers: Vec<WorkerId>,
    /// Workers executing a task but blocked on objects that are not yet
    /// available locally. These have temporarily returned their reservation.
    blocked_workers: Vec<WorkerId>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self {
            available_workers: vec![],
            executing_workers: vec![],
            blocked_workers: vec![],
        }
    }
}
