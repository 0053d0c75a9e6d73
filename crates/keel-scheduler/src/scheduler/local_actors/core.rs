use log::{debug, warn};

use crate::id::{ActorId, WorkerId};
use crate::scheduler::local_actors::{ActorDirectory, LocalActorInfo};
use crate::scheduler::task_queue::TaskEntry;
use crate::task::TaskSpec;

impl ActorDirectory {
    /// Create the bookkeeping for an actor this node owns. This happens
    /// either when the first task for the actor arrives (no worker yet) or
    /// when the actor worker connects.
    pub fn create_actor(&mut self, actor_id: ActorId, worker: Option<WorkerId>) {
        debug!("creating actor {actor_id}");
        let previous = self
            .local_actor_infos
            .insert(actor_id, LocalActorInfo::new(worker));
        assert!(previous.is_none(), "actor {actor_id} already exists");
    }

    /// Destroy the bookkeeping for an actor, dropping any queued tasks.
    pub fn remove_actor(&mut self, actor_id: ActorId) {
        let entry = self
            .local_actor_infos
            .remove(&actor_id)
            .unwrap_or_else(|| panic!("actor {actor_id} does not exist"));
        if !entry.task_queue.is_empty() {
            warn!(
                "removing actor {actor_id} with {} remaining tasks",
                entry.task_queue.len()
            );
        }
    }

    pub fn contains(&self, actor_id: ActorId) -> bool {
        self.local_actor_infos.contains_key(&actor_id)
    }

    pub fn get(&self, actor_id: ActorId) -> Option<&LocalActorInfo> {
        self.local_actor_infos.get(&actor_id)
    }

    /// Fill in the worker field once the actor worker has connected.
    pub fn set_worker(&mut self, actor_id: ActorId, worker_id: WorkerId) {
        let entry = self
            .local_actor_infos
            .get_mut(&actor_id)
            .unwrap_or_else(|| panic!("actor {actor_id} does not exist"));
        entry.worker = Some(worker_id);
    }

    /// Queue a task for an actor, creating the actor bookkeeping lazily if
    /// the worker has not connected yet. The queue stays sorted by actor
    /// counter; a duplicate counter indicates a resubmission and is inserted
    /// rather than deduplicated.
    pub fn add_task(&mut self, spec: TaskSpec) {
        let actor_id = spec
            .actor_id()
            .expect("cannot queue a non-actor task for an actor");
        let counter = spec
            .actor_counter()
            .expect("actor task must carry a counter");

        if !self.contains(actor_id) {
            // The worker field is filled in when the actor worker connects.
            self.create_actor(actor_id, None);
        }
        let entry = self
            .local_actor_infos
            .get_mut(&actor_id)
            .expect("actor was just created");

        // In-order execution means a task can never arrive with a counter
        // below the number of tasks already executed.
        assert!(
            counter >= entry.task_counter,
            "actor {actor_id} received counter {counter} below {}",
            entry.task_counter
        );

        let index = entry
            .task_queue
            .iter()
            .position(|queued| {
                counter
                    <= queued
                        .spec()
                        .actor_counter()
                        .expect("actor queue holds actor tasks")
            })
            .unwrap_or(entry.task_queue.len());
        entry.task_queue.insert(index, TaskEntry::new(spec));
    }

    /// Take the next task to run on the actor, if the head of the queue is
    /// the next expected counter and the actor worker is idle. Advances the
    /// task counter and marks the worker busy.
    pub fn next_dispatchable(&mut self, actor_id: ActorId) -> Option<(TaskSpec, WorkerId)> {
        let entry = self
            .local_actor_infos
            .get_mut(&actor_id)
            .unwrap_or_else(|| panic!("actor {actor_id} does not exist"));

        let head_counter = entry
            .task_queue
            .front()?
            .spec()
            .actor_counter()
            .expect("actor queue holds actor tasks");
        if head_counter != entry.task_counter {
            // A gap means the predecessor task has not arrived yet; we never
            // skip ahead. A counter below the expected one is a protocol bug.
            assert!(
                head_counter > entry.task_counter,
                "actor {actor_id} queue head counter {head_counter} below {}",
                entry.task_counter
            );
            return None;
        }
        if !entry.worker_available {
            return None;
        }
        let worker_id = entry
            .worker
            .expect("actor worker must be connected to be available");
        entry.task_counter += 1;
        entry.worker_available = false;
        let task = entry.task_queue.pop_front().expect("queue head exists");
        Some((task.into_spec(), worker_id))
    }

    /// Mark the actor worker as idle after it finishes a task (or right
    /// after it connects).
    pub fn mark_worker_available(&mut self, actor_id: ActorId, worker_id: WorkerId) {
        let entry = self
            .local_actor_infos
            .get_mut(&actor_id)
            .unwrap_or_else(|| panic!("actor {actor_id} does not exist"));
        assert_eq!(
            entry.worker,
            Some(worker_id),
            "worker {worker_id} is not the worker for actor {actor_id}"
        );
        assert!(
            !entry.worker_available,
            "actor {actor_id} worker was already available"
        );
        entry.worker_available = true;
    }

    /// Stash a task for an actor whose location is not yet known.
    pub fn cache_task(&mut self, spec: TaskSpec) {
        self.cached_submitted_tasks.push(spec);
    }

    /// Take the currently cached tasks for resubmission. Tasks cached while
    /// the returned snapshot is being replayed are appended to the live list
    /// and survive for the next notification.
    pub fn take_cached(&mut self) -> Vec<TaskSpec> {
        let snapshot_len = self.cached_submitted_tasks.len();
        self.cached_submitted_tasks.drain(..snapshot_len).collect()
    }

    pub fn cached_len(&self) -> usize {
        self.cached_submitted_tasks.len()
    }

    pub fn actor_ids(&self) -> impl Iterator<Item = &ActorId> {
        self.local_actor_infos.keys()
    }

    /// The number of actor workers that have connected.
    pub fn connected_worker_count(&self) -> usize {
        self.local_actor_infos
            .values()
            .filter(|entry| entry.worker.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{DriverId, TaskId};
    use crate::resource::ResourceVector;
    use crate::task::TaskKind;

    fn actor_task(actor: u64, counter: u64) -> TaskSpec {
        TaskSpec::new(
            DriverId::from(1),
            TaskId::from(counter + 100),
            TaskKind::Actor {
                actor_id: ActorId::from(actor),
                counter,
            },
            vec![],
            ResourceVector::default(),
        )
    }

    fn queue_counters(directory: &ActorDirectory, actor: u64) -> Vec<u64> {
        directory
            .get(ActorId::from(actor))
            .unwrap()
            .task_queue
            .iter()
            .map(|entry| entry.spec().actor_counter().unwrap())
            .collect()
    }

    #[test]
    fn test_add_task_keeps_queue_sorted() {
        let mut directory = ActorDirectory::new();
        directory.add_task(actor_task(1, 2));
        directory.add_task(actor_task(1, 0));
        directory.add_task(actor_task(1, 1));
        assert_eq!(queue_counters(&directory, 1), vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_counter_is_not_deduplicated() {
        let mut directory = ActorDirectory::new();
        directory.add_task(actor_task(1, 0));
        directory.add_task(actor_task(1, 0));
        assert_eq!(queue_counters(&directory, 1), vec![0, 0]);
    }

    #[test]
    #[should_panic(expected = "below")]
    fn test_add_task_rejects_stale_counter() {
        let mut directory = ActorDirectory::new();
        directory.create_actor(ActorId::from(1), Some(WorkerId::from(1)));
        directory.add_task(actor_task(1, 0));
        directory.mark_worker_available(ActorId::from(1), WorkerId::from(1));
        directory.next_dispatchable(ActorId::from(1)).unwrap();
        directory.add_task(actor_task(1, 0));
    }

    #[test]
    fn test_dispatch_requires_counter_match_and_worker() {
        let mut directory = ActorDirectory::new();
        let actor = ActorId::from(1);
        let worker = WorkerId::from(7);

        // Counter 1 arrives first; the head is not the next expected task.
        directory.add_task(actor_task(1, 1));
        directory.set_worker(actor, worker);
        directory.mark_worker_available(actor, worker);
        assert!(directory.next_dispatchable(actor).is_none());

        // Once counter 0 arrives, both dispatch in order.
        directory.add_task(actor_task(1, 0));
        let (task, assigned) = directory.next_dispatchable(actor).unwrap();
        assert_eq!(task.actor_counter(), Some(0));
        assert_eq!(assigned, worker);

        // The worker is busy until it reports available again.
        assert!(directory.next_dispatchable(actor).is_none());
        directory.mark_worker_available(actor, worker);
        let (task, _) = directory.next_dispatchable(actor).unwrap();
        assert_eq!(task.actor_counter(), Some(1));
        assert_eq!(directory.get(actor).unwrap().task_counter, 2);
    }

    #[test]
    fn test_dispatch_without_connected_worker() {
        let mut directory = ActorDirectory::new();
        directory.add_task(actor_task(1, 0));
        assert!(directory.next_dispatchable(ActorId::from(1)).is_none());
    }

    #[test]
    #[should_panic(expected = "already exists")]
    fn test_create_actor_twice() {
        let mut directory = ActorDirectory::new();
        directory.create_actor(ActorId::from(1), None);
        directory.create_actor(ActorId::from(1), None);
    }

    #[test]
    fn test_take_cached_leaves_new_entries() {
        let mut directory = ActorDirectory::new();
        directory.cache_task(actor_task(1, 0));
        directory.cache_task(actor_task(2, 0));
        let snapshot = directory.take_cached();
        assert_eq!(snapshot.len(), 2);
        // Tasks cached during the replay land on the live list.
        directory.cache_task(actor_task(3, 0));
        assert_eq!(directory.cached_len(), 1);
    }
}
