use std::collections::HashMap;

use keel_server::actor::{Actor, ActorAction, ActorContext};
use log::warn;

use crate::error::SchedulerError;
use crate::scheduler::dependency::DependencyTracker;
use crate::scheduler::local_actors::ActorDirectory;
use crate::scheduler::task_queue::TaskQueue;
use crate::scheduler::worker_pool::WorkerPool;
use crate::scheduler::{SchedulerActor, SchedulerEvent, SchedulerOptions, SchedulerServices};

impl Actor for SchedulerActor {
    type Message = SchedulerEvent;
    type Options = SchedulerOptions;
    type Error = SchedulerError;

    fn name() -> &'static str {
        "SchedulerActor"
    }

    fn new(options: SchedulerOptions) -> Self {
        let SchedulerOptions {
            node_id,
            fetch_timeout,
            global_scheduler_enabled,
            services,
        } = options;
        let SchedulerServices {
            object_store,
            reconstruction,
            task_table,
            worker_manager,
        } = services;
        Self {
            node_id,
            fetch_timeout,
            global_scheduler_enabled,
            object_store,
            reconstruction,
            task_table,
            worker_manager,
            task_queue: TaskQueue::new(),
            dependencies: DependencyTracker::new(),
            worker_pool: WorkerPool::new(),
            actors: ActorDirectory::new(),
            actor_mapping: HashMap::new(),
        }
    }

    fn start(&mut self, ctx: &mut ActorContext<Self>) -> Result<(), Self::Error> {
        ctx.send_with_delay(SchedulerEvent::FetchTimerTick, self.fetch_timeout);
        Ok(())
    }

    fn receive(
        &mut self,
        ctx: &mut ActorContext<Self>,
        message: SchedulerEvent,
    ) -> Result<ActorAction, Self::Error> {
        let action = match message {
            SchedulerEvent::TaskSubmitted { spec } => {
                self.handle_task_submitted(spec)?;
                ActorAction::Continue
            }
            SchedulerEvent::ActorTaskSubmitted { spec } => {
                self.handle_actor_task_submitted(spec)?;
                ActorAction::Continue
            }
            SchedulerEvent::TaskScheduled { spec } => {
                self.handle_task_scheduled(spec)?;
                ActorAction::Continue
            }
            SchedulerEvent::ActorTaskScheduled { spec } => {
                self.handle_actor_task_scheduled(spec)?;
                ActorAction::Continue
            }
            SchedulerEvent::ActorCreated { actor_id, node_id } => {
                self.handle_actor_creation_notification(actor_id, node_id)?;
                ActorAction::Continue
            }
            SchedulerEvent::WorkerAvailable { worker_id } => {
                self.handle_worker_available(worker_id);
                ActorAction::Continue
            }
            SchedulerEvent::WorkerRemoved { worker_id } => {
                self.handle_worker_removed(worker_id);
                ActorAction::Continue
            }
            SchedulerEvent::WorkerBlocked { worker_id } => {
                self.handle_worker_blocked(worker_id);
                ActorAction::Continue
            }
            SchedulerEvent::WorkerUnblocked { worker_id } => {
                self.handle_worker_unblocked(worker_id);
                ActorAction::Continue
            }
            SchedulerEvent::ActorWorkerConnected {
                actor_id,
                worker_id,
            } => {
                self.handle_actor_worker_connected(actor_id, worker_id);
                ActorAction::Continue
            }
            SchedulerEvent::ActorWorkerAvailable {
                actor_id,
                worker_id,
            } => {
                self.handle_actor_worker_available(actor_id, worker_id);
                ActorAction::Continue
            }
            SchedulerEvent::ActorWorkerDisconnected { actor_id } => {
                self.handle_actor_worker_disconnected(actor_id);
                ActorAction::Continue
            }
            SchedulerEvent::ObjectAvailable { object_id } => {
                self.handle_object_available(object_id);
                ActorAction::Continue
            }
            SchedulerEvent::ObjectRemoved { object_id } => {
                self.handle_object_removed(object_id);
                ActorAction::Continue
            }
            SchedulerEvent::DriverRemoved { driver_id } => {
                self.handle_driver_removed(driver_id);
                ActorAction::Continue
            }
            SchedulerEvent::FetchTimerTick => {
                self.handle_fetch_timer_tick();
                ctx.send_with_delay(SchedulerEvent::FetchTimerTick, self.fetch_timeout);
                ActorAction::Continue
            }
            SchedulerEvent::GetSchedulerInfo { result } => {
                if result.send(self.scheduler_info()).is_err() {
                    warn!("failed to send scheduler info");
                }
                ActorAction::Continue
            }
            SchedulerEvent::Shutdown => ActorAction::Stop,
        };
        #[cfg(debug_assertions)]
        self.sanity_check();
        Ok(action)
    }

    fn stop(self) -> Result<(), Self::Error> {
        Ok(())
    }
}
