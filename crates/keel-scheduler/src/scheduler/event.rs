use tokio::sync::{mpsc, oneshot};

use crate::error::SchedulerError;
use crate::id::{ActorId, DriverId, NodeId, ObjectId, WorkerId};
use crate::resource::ResourceVector;
use crate::task::TaskSpec;

pub enum SchedulerEvent {
    /// A task was submitted by a local driver or worker.
    TaskSubmitted { spec: TaskSpec },
    /// An actor task was submitted by a local driver or worker.
    ActorTaskSubmitted { spec: TaskSpec },
    /// A task was assigned to this node by the global scheduler.
    TaskScheduled { spec: TaskSpec },
    /// An actor task was assigned to this node by the global scheduler
    /// or forwarded by another local scheduler.
    ActorTaskScheduled { spec: TaskSpec },
    /// An actor was created somewhere in the cluster.
    /// This arrives once per actor and establishes its location.
    ActorCreated { actor_id: ActorId, node_id: NodeId },
    WorkerAvailable { worker_id: WorkerId },
    WorkerRemoved { worker_id: WorkerId },
    /// A worker blocked on objects that are not yet available locally
    /// and returned its resource reservation.
    WorkerBlocked { worker_id: WorkerId },
    /// A blocked worker reacquired its reservation and resumed execution.
    WorkerUnblocked { worker_id: WorkerId },
    /// The worker running an actor connected to this scheduler.
    ActorWorkerConnected { actor_id: ActorId, worker_id: WorkerId },
    /// The worker running an actor finished a task (or is ready for its
    /// first one).
    ActorWorkerAvailable { actor_id: ActorId, worker_id: WorkerId },
    ActorWorkerDisconnected { actor_id: ActorId },
    /// An object became available in the local object store.
    ObjectAvailable { object_id: ObjectId },
    /// An object was evicted from the local object store.
    ObjectRemoved { object_id: ObjectId },
    /// A driver exited; its queued tasks are purged.
    DriverRemoved { driver_id: DriverId },
    FetchTimerTick,
    GetSchedulerInfo {
        result: oneshot::Sender<SchedulerInfo>,
    },
    Shutdown,
}

/// A point-in-time snapshot of the scheduler state for introspection.
#[derive(Debug, Clone)]
pub struct SchedulerInfo {
    pub total_workers: usize,
    /// The combined length of the waiting and dispatch queues.
    pub task_queue_length: usize,
    pub waiting_task_count: usize,
    pub dispatch_task_count: usize,
    pub available_workers: usize,
    pub static_resources: ResourceVector,
    pub dynamic_resources: ResourceVector,
}

impl From<mpsc::error::SendError<SchedulerEvent>> for SchedulerError {
    fn from(error: mpsc::error::SendError<SchedulerEvent>) -> Self {
        SchedulerError::InternalError(format!("failed to send scheduler event: {error}"))
    }
}
