use std::collections::VecDeque;

use crate::id::WorkerId;
use crate::scheduler::task_queue::TaskEntry;

/// Per-actor scheduling state for an actor owned by this node.
#[derive(Debug)]
pub(crate) struct LocalActorInfo {
    /// The counter of the next task to execute on this actor. Tasks run in
    /// strict submission order, so the head of the queue is dispatched only
    /// when its counter equals this value.
    pub task_counter: u64,
    /// Queued tasks, sorted by actor counter ascending.
    pub task_queue: VecDeque<TaskEntry>,
    /// The worker running the actor. Absent until the actor worker connects.
    pub worker: Option<WorkerId>,
    pub worker_available: bool,
}

impl LocalActorInfo {
    pub fn new(worker: Option<WorkerId>) -> Self {
        Self {
            task_counter: 0,
            task_queue: VecDeque::new(),
            worker,
            worker_available: false,
        }
    }
}
