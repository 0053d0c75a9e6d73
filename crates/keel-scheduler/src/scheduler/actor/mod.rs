mod core;
mod handler;

use std::collections::HashMap;
use std::time::Duration;

use log::warn;

use crate::cluster::{ObjectStoreClient, ReconstructionClient, TaskTableClient, WorkerManager};
use crate::id::{ActorId, NodeId};
use crate::scheduler::dependency::DependencyTracker;
use crate::scheduler::local_actors::ActorDirectory;
use crate::scheduler::task_queue::TaskQueue;
use crate::scheduler::worker_pool::WorkerPool;
use crate::scheduler::SchedulerInfo;

/// The per-node scheduling core.
///
/// All state is owned by this actor and mutated by event handlers that run
/// to completion one at a time. Collaborator calls are synchronous and
/// non-blocking, so there are no suspension points inside any handler.
pub struct SchedulerActor {
    node_id: NodeId,
    fetch_timeout: Duration,
    global_scheduler_enabled: bool,
    object_store: Box<dyn ObjectStoreClient>,
    reconstruction: Box<dyn ReconstructionClient>,
    task_table: Option<Box<dyn TaskTableClient>>,
    worker_manager: Box<dyn WorkerManager>,
    task_queue: TaskQueue,
    dependencies: DependencyTracker,
    worker_pool: WorkerPool,
    actors: ActorDirectory,
    /// Which node owns each known actor. Populated by actor creation
    /// notifications; read-only everywhere else.
    actor_mapping: HashMap<ActorId, NodeId>,
}

impl SchedulerActor {
    pub fn scheduler_info(&self) -> SchedulerInfo {
        SchedulerInfo {
            total_workers: self.worker_pool.total() + self.actors.connected_worker_count(),
            task_queue_length: self.task_queue.waiting_len() + self.task_queue.dispatch_len(),
            waiting_task_count: self.task_queue.waiting_len(),
            dispatch_task_count: self.task_queue.dispatch_len(),
            available_workers: self.worker_pool.available_count(),
            static_resources: self.worker_manager.static_resources(),
            dynamic_resources: self.worker_manager.dynamic_resources(),
        }
    }

    /// Validate the structural invariants of the scheduler state.
    /// Runs after every handled event in debug builds.
    pub(crate) fn sanity_check(&self) {
        // The object tables are disjoint.
        for object_id in self.dependencies.local_object_ids() {
            assert!(
                !self.dependencies.is_remote(object_id),
                "object {object_id} is both local and remote"
            );
        }

        // A worker occupies exactly one state.
        for worker_id in self.worker_pool.worker_ids() {
            assert_eq!(
                self.worker_pool.occupancy(*worker_id),
                1,
                "worker {worker_id} occupies more than one state"
            );
        }

        // Every dispatch-queue task has all dependencies locally available.
        for (_, entry) in self.task_queue.dispatch_iter() {
            assert!(
                self.dependencies.can_run(entry.spec()),
                "task {} is in the dispatch queue with missing dependencies",
                entry.spec().task_id()
            );
        }

        // Every waiting task is registered as a dependent of at least one
        // remote object.
        for (entry_id, entry) in self.task_queue.waiting_iter() {
            let registered = entry.spec().object_dependencies().any(|object_id| {
                self.dependencies
                    .remote_entry(object_id)
                    .is_some_and(|object| object.dependent_tasks.contains(entry_id))
            });
            assert!(
                registered,
                "waiting task {} has no registered fetch",
                entry.spec().task_id()
            );
        }

        // Per-actor queues are sorted by counter and never fall behind the
        // actor's task counter. Duplicate counters indicate a resubmission;
        // they are tolerated but worth flagging.
        for actor_id in self.actors.actor_ids() {
            let info = self.actors.get(*actor_id).expect("listed actor exists");
            let counters: Vec<u64> = info
                .task_queue
                .iter()
                .map(|entry| {
                    entry
                        .spec()
                        .actor_counter()
                        .expect("actor queue holds actor tasks")
                })
                .collect();
            for pair in counters.windows(2) {
                assert!(
                    pair[0] <= pair[1],
                    "actor {actor_id} queue is out of order"
                );
                if pair[0] == pair[1] {
                    warn!("actor {actor_id} has a resubmitted task with counter {}", pair[0]);
                }
            }
            for counter in counters {
                assert!(
                    counter >= info.task_counter,
                    "actor {actor_id} queue holds an already-executed counter {counter}"
                );
            }
        }

        // The introspection counts agree with the underlying containers.
        let info = self.scheduler_info();
        assert_eq!(
            info.task_queue_length,
            self.task_queue.waiting_len() + self.task_queue.dispatch_len()
        );
        assert_eq!(info.available_workers, self.worker_pool.available_count());
    }
}
