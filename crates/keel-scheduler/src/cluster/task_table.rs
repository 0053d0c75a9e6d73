use crate::id::NodeId;
use crate::task::TaskSpec;

/// The task status recorded in the cluster-wide task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// The task is waiting to be scheduled by the global scheduler.
    Waiting,
    /// The task has been scheduled onto a specific node but is not yet
    /// queued there.
    Scheduled,
    /// The task is queued at a local scheduler.
    Queued,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Waiting => write!(f, "WAITING"),
            TaskStatus::Scheduled => write!(f, "SCHEDULED"),
            TaskStatus::Queued => write!(f, "QUEUED"),
        }
    }
}

/// A client for the cluster-wide task table.
///
/// Writes are fire-and-forget; completion and failure are not reported back
/// to the scheduling core.
pub trait TaskTableClient: Send + 'static {
    /// Record a task seen for the first time in the system.
    fn add_task(&mut self, spec: &TaskSpec, status: TaskStatus, owner: Option<NodeId>);

    /// Update the row of a task that has already been recorded
    /// (e.g. by the global scheduler).
    fn update_task(&mut self, spec: &TaskSpec, status: TaskStatus, owner: Option<NodeId>);
}
