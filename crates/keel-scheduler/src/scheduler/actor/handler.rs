use log::{debug, info, warn};

use crate::cluster::TaskStatus;
use crate::error::SchedulerResult;
use crate::id::{ActorId, DriverId, NodeId, ObjectId, WorkerId};
use crate::scheduler::SchedulerActor;
use crate::task::TaskSpec;

impl SchedulerActor {
    /// A task was submitted by a local driver or worker.
    ///
    /// If the task can start right away, keep it here; otherwise let the
    /// global scheduler place it.
    pub fn handle_task_submitted(&mut self, spec: TaskSpec) -> SchedulerResult<()> {
        if self.resource_constraints_satisfied(&spec)
            && self.worker_pool.has_available()
            && self.dependencies.can_run(&spec)
        {
            self.queue_dispatch_task(spec, false)?;
        } else {
            self.give_task_to_global_scheduler(spec)?;
        }
        // We may have queued a task, so try to dispatch.
        self.dispatch_tasks();
        Ok(())
    }

    /// An actor task was submitted by a local driver or worker.
    pub fn handle_actor_task_submitted(&mut self, spec: TaskSpec) -> SchedulerResult<()> {
        let actor_id = spec.actor_id().expect("actor task must carry an actor id");
        match self.actor_mapping.get(&actor_id).copied() {
            None => {
                // The location of the actor is not known yet. Stash the task;
                // it is resubmitted when an actor creation notification
                // arrives.
                debug!(
                    "caching task {} for actor {actor_id} with unknown location",
                    spec.task_id()
                );
                self.actors.cache_task(spec);
            }
            Some(node_id) if node_id == self.node_id => {
                self.add_task_to_actor_queue(spec, false);
                self.dispatch_actor_task(actor_id);
            }
            Some(node_id) => {
                // Another node owns the actor; hand the task to it directly.
                self.give_task_to_local_scheduler(spec, node_id);
            }
        }
        Ok(())
    }

    /// An actor creation notification arrived, establishing the actor's
    /// location. Resubmit the tasks cached so far; resubmission may cache
    /// tasks again (for actors that are still unknown), and those stay on
    /// the live list for a later notification.
    pub fn handle_actor_creation_notification(
        &mut self,
        actor_id: ActorId,
        node_id: NodeId,
    ) -> SchedulerResult<()> {
        info!("actor {actor_id} was created on node {node_id}");
        self.actor_mapping.insert(actor_id, node_id);
        if node_id == self.node_id && self.actors.contains(actor_id) {
            // Tasks may have been queued for the actor before its location
            // was known; they are dispatchable now.
            self.dispatch_actor_task(actor_id);
        }
        for spec in self.actors.take_cached() {
            self.handle_actor_task_submitted(spec)?;
        }
        Ok(())
    }

    /// A task was assigned to this node by the global scheduler.
    pub fn handle_task_scheduled(&mut self, spec: TaskSpec) -> SchedulerResult<()> {
        debug_assert!(
            self.task_table.is_some() && self.global_scheduler_enabled,
            "received a globally scheduled task without a global scheduler"
        );
        self.queue_task_locally(spec, true)?;
        self.dispatch_tasks();
        Ok(())
    }

    /// An actor task was assigned to this node by the global scheduler or
    /// forwarded by another local scheduler.
    pub fn handle_actor_task_scheduled(&mut self, spec: TaskSpec) -> SchedulerResult<()> {
        let actor_id = spec.actor_id().expect("actor task must carry an actor id");
        match self.actor_mapping.get(&actor_id) {
            Some(node_id) => debug_assert_eq!(
                *node_id, self.node_id,
                "received a task for actor {actor_id} owned by node {node_id}"
            ),
            None => {
                // The task can outrun the actor creation notification.
                info!(
                    "received a task for actor {actor_id} before its creation \
                     notification; this should be rare"
                );
            }
        }
        self.add_task_to_actor_queue(spec, true);
        self.dispatch_actor_task(actor_id);
        Ok(())
    }

    pub fn handle_worker_available(&mut self, worker_id: WorkerId) {
        self.worker_pool.make_available(worker_id);
        self.worker_pool.log_summary("worker available");
        // A worker is free, so try to dispatch.
        self.dispatch_tasks();
    }

    pub fn handle_worker_removed(&mut self, worker_id: WorkerId) {
        self.worker_pool.remove(worker_id);
        self.worker_pool.log_summary("worker removed");
    }

    /// The worker returned its resource reservation while it waits for
    /// objects, so tasks that did not fit before may fit now.
    pub fn handle_worker_blocked(&mut self, worker_id: WorkerId) {
        self.worker_pool.mark_blocked(worker_id);
        self.dispatch_tasks();
    }

    /// The worker reacquired its reservation and resumed executing.
    pub fn handle_worker_unblocked(&mut self, worker_id: WorkerId) {
        self.worker_pool.mark_unblocked(worker_id);
    }

    pub fn handle_actor_worker_connected(&mut self, actor_id: ActorId, worker_id: WorkerId) {
        if self.actors.contains(actor_id) {
            // The bookkeeping was created when the first task for the actor
            // arrived; only the worker field was missing.
            self.actors.set_worker(actor_id, worker_id);
        } else {
            self.actors.create_actor(actor_id, Some(worker_id));
        }
        self.dispatch_actor_task(actor_id);
    }

    pub fn handle_actor_worker_available(&mut self, actor_id: ActorId, worker_id: WorkerId) {
        self.actors.mark_worker_available(actor_id, worker_id);
        self.dispatch_actor_task(actor_id);
    }

    pub fn handle_actor_worker_disconnected(&mut self, actor_id: ActorId) {
        self.actors.remove_actor(actor_id);
    }

    /// An object became available in the local object store. Waiting tasks
    /// whose dependencies are now complete move to the dispatch queue.
    pub fn handle_object_available(&mut self, object_id: ObjectId) {
        let dependent_tasks = self.dependencies.on_object_available(object_id);
        if dependent_tasks.is_empty() {
            return;
        }
        for entry_id in dependent_tasks {
            let Some(entry) = self.task_queue.waiting_entry(&entry_id) else {
                // A task that referenced the object through more than one
                // argument has already been promoted.
                continue;
            };
            if self.dependencies.can_run(entry.spec()) {
                debug!(
                    "moving task {} to the dispatch queue",
                    entry.spec().task_id()
                );
                self.task_queue.promote_to_dispatch(entry_id);
            }
        }
        self.dispatch_tasks();
    }

    /// An object was evicted from the local object store. Dispatch-queue
    /// tasks that depended on it fall back to the waiting queue and the
    /// object is fetched again.
    pub fn handle_object_removed(&mut self, object_id: ObjectId) {
        self.dependencies.on_object_removed(object_id);

        // Dispatch entries carry no back-references (the common case is that
        // local objects stay local), so the dependents are recomputed here.
        let mut index = 0;
        while index < self.task_queue.dispatch_len() {
            let (_, entry) = self
                .task_queue
                .dispatch_get_index(index)
                .expect("index is in bounds");
            if entry.spec().depends_on(object_id) {
                debug!(
                    "moving task {} back to the waiting queue",
                    entry.spec().task_id()
                );
                self.task_queue.demote_to_waiting(index);
            } else {
                index += 1;
            }
        }

        // Register a fetch for every waiting task that references the
        // object, including the tasks just moved from the dispatch queue.
        let mut cursors = vec![];
        for (entry_id, entry) in self.task_queue.waiting_iter() {
            for dependency in entry.spec().object_dependencies() {
                if dependency == object_id {
                    cursors.push(*entry_id);
                }
            }
        }
        for cursor in cursors {
            if self.dependencies.record_missing(cursor, object_id)
                && self.object_store.is_connected()
            {
                self.object_store.fetch(&[object_id]);
            }
        }
    }

    /// A driver exited. Purge its queued tasks; tasks already handed to a
    /// worker are unaffected.
    pub fn handle_driver_removed(&mut self, driver_id: DriverId) {
        info!("removing queued tasks for driver {driver_id}");
        // The cursors must be purged before the queue entries they point to
        // are destroyed.
        let task_queue = &self.task_queue;
        self.dependencies.retain_dependents(|entry_id| {
            task_queue
                .waiting_entry(entry_id)
                .is_some_and(|entry| entry.spec().driver_id() != driver_id)
        });
        self.task_queue.remove_driver_tasks(driver_id);
        // Actor bookkeeping is left in place for now.
    }

    /// Retry the fetch for every object that is still remote, and ask for
    /// reconstruction in case the producing task was lost. Reconstruction is
    /// idempotent, so this is a cheap liveness poke.
    pub fn handle_fetch_timer_tick(&mut self) {
        if !self.object_store.is_connected() {
            info!("scheduler is not connected to an object store manager");
            return;
        }
        let object_ids = self.dependencies.remote_object_ids();
        if object_ids.is_empty() {
            return;
        }
        self.object_store.fetch(&object_ids);
        for object_id in object_ids {
            self.reconstruction.reconstruct(object_id);
        }
    }

    /// Assign as many dispatch-queue tasks as workers and resources allow.
    ///
    /// Tasks are visited in queue order but never reordered: a task that
    /// does not fit the currently available resources is skipped so that a
    /// smaller task behind it can run, and is retried on the next pass.
    fn dispatch_tasks(&mut self) {
        let mut index = 0;
        while index < self.task_queue.dispatch_len() {
            if !self.worker_pool.has_available() {
                // Make sure a worker will become available for a future
                // dispatch pass.
                if self.worker_manager.pending_worker_count() == 0 {
                    self.worker_manager.start_worker(None);
                }
                return;
            }
            let dynamic_resources = self.worker_manager.dynamic_resources();
            if !dynamic_resources.any_available() {
                return;
            }
            let (_, entry) = self
                .task_queue
                .dispatch_get_index(index)
                .expect("index is in bounds");
            if !entry
                .spec()
                .required_resources()
                .fits_within(&dynamic_resources)
            {
                index += 1;
                continue;
            }
            let (_, entry) = self
                .task_queue
                .dispatch_remove_index(index)
                .expect("index is in bounds");
            let worker_id = self
                .worker_pool
                .pop_available()
                .expect("an available worker was checked above");
            self.worker_manager.assign_task(entry.spec(), worker_id);
            self.worker_pool.mark_executing(worker_id);
            debug!(
                "assigned task {} to worker {worker_id}; dynamic resources now ({})",
                entry.spec().task_id(),
                self.worker_manager.dynamic_resources()
            );
            // Dropping the entry frees the spec.
        }
    }

    /// Dispatch the next task to an actor if possible: the queue head must
    /// carry the next expected counter (gaps mean the predecessor has not
    /// arrived; we never skip ahead) and the actor worker must be idle.
    fn dispatch_actor_task(&mut self, actor_id: ActorId) -> bool {
        match self.actor_mapping.get(&actor_id) {
            Some(node_id) => assert_eq!(
                *node_id, self.node_id,
                "dispatching for actor {actor_id} owned by node {node_id}"
            ),
            None => {
                // The creation notification has not arrived yet. The queued
                // tasks stay put until it does.
                debug!("actor {actor_id} has no known location yet; deferring dispatch");
                return false;
            }
        }
        let Some((spec, worker_id)) = self.actors.next_dispatchable(actor_id) else {
            return false;
        };
        self.worker_manager.assign_task(&spec, worker_id);
        true
    }

    fn add_task_to_actor_queue(&mut self, spec: TaskSpec, from_global: bool) {
        self.record_task_queued(&spec, from_global);
        self.actors.add_task(spec);
    }

    /// Route a task whose placement here has already been decided to the
    /// queue matching its dependency state.
    fn queue_task_locally(&mut self, spec: TaskSpec, from_global: bool) -> SchedulerResult<()> {
        if self.dependencies.can_run(&spec) {
            self.queue_dispatch_task(spec, from_global)
        } else {
            self.queue_waiting_task(spec, from_global)
        }
    }

    fn queue_waiting_task(&mut self, spec: TaskSpec, from_global: bool) -> SchedulerResult<()> {
        debug!("queueing task {} in the waiting queue", spec.task_id());
        self.record_task_queued(&spec, from_global);
        let entry_id = self.task_queue.push_waiting(spec)?;
        let entry = self
            .task_queue
            .waiting_entry(&entry_id)
            .expect("the entry was just queued");
        let newly_tracked = self
            .dependencies
            .register_task_dependencies(entry.spec(), entry_id);
        // Try each new fetch once right away; the fetch timer retries.
        if self.object_store.is_connected() {
            for object_id in newly_tracked {
                self.object_store.fetch(&[object_id]);
            }
        }
        Ok(())
    }

    fn queue_dispatch_task(&mut self, spec: TaskSpec, from_global: bool) -> SchedulerResult<()> {
        debug!("queueing task {} in the dispatch queue", spec.task_id());
        self.record_task_queued(&spec, from_global);
        self.task_queue.push_dispatch(spec)?;
        Ok(())
    }

    /// Record the queueing in the task table: an `add` for a task seen for
    /// the first time, an `update` when the global scheduler already wrote
    /// the row.
    fn record_task_queued(&mut self, spec: &TaskSpec, from_global: bool) {
        let Some(task_table) = self.task_table.as_mut() else {
            return;
        };
        if from_global {
            task_table.update_task(spec, TaskStatus::Queued, Some(self.node_id));
        } else {
            task_table.add_task(spec, TaskStatus::Queued, Some(self.node_id));
        }
    }

    /// Hand an actor task to the local scheduler responsible for the actor.
    fn give_task_to_local_scheduler(&mut self, spec: TaskSpec, node_id: NodeId) {
        if node_id == self.node_id {
            warn!(
                "scheduler is trying to hand task {} to itself",
                spec.task_id()
            );
        }
        let task_table = self
            .task_table
            .as_mut()
            .expect("a task table is required to hand off actor tasks");
        task_table.add_task(&spec, TaskStatus::Scheduled, Some(node_id));
    }

    /// Hand a task to the global scheduler, or queue it locally when the
    /// cluster runs without one.
    fn give_task_to_global_scheduler(&mut self, spec: TaskSpec) -> SchedulerResult<()> {
        if !self.global_scheduler_enabled || self.task_table.is_none() {
            return self.queue_task_locally(spec, false);
        }
        if let Some(task_table) = self.task_table.as_mut() {
            task_table.add_task(&spec, TaskStatus::Waiting, None);
        }
        Ok(())
    }

    /// Whether the task's requirements fit within both the node capacity and
    /// the currently available resources.
    fn resource_constraints_satisfied(&self, spec: &TaskSpec) -> bool {
        let required = spec.required_resources();
        required.fits_within(&self.worker_manager.static_resources())
            && required.fits_within(&self.worker_manager.dynamic_resources())
    }
}
