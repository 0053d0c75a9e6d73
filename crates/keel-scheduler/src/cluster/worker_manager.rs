use crate::id::{ActorId, WorkerId};
use crate::resource::ResourceVector;
use crate::task::TaskSpec;

/// Manages worker processes and the node's resource ledger.
///
/// The static and dynamic resource vectors live here; the scheduling core
/// only reads them. Debits happen in [WorkerManager::assign_task], and the
/// credit/debit for blocked and unblocked workers happens in the manager
/// before the corresponding events reach the core.
pub trait WorkerManager: Send + 'static {
    /// Hand a task to a worker for execution and debit the dynamic
    /// resources by the task's requirements. Non-blocking.
    fn assign_task(&mut self, spec: &TaskSpec, worker_id: WorkerId);

    /// Request a new worker process. Pass the actor id for actor workers.
    /// Completion arrives later as a worker connection event.
    fn start_worker(&mut self, actor_id: Option<ActorId>);

    /// The number of worker processes that have been started but have not
    /// yet registered with the scheduler.
    fn pending_worker_count(&self) -> usize;

    /// The node's total resource capacity.
    fn static_resources(&self) -> ResourceVector;

    /// The resources currently available for assignment.
    fn dynamic_resources(&self) -> ResourceVector;
}
