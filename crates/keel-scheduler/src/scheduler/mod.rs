mod actor;
mod dependency;
mod event;
mod local_actors;
mod options;
mod task_queue;
mod worker_pool;

pub use actor::SchedulerActor;
pub use event::{SchedulerEvent, SchedulerInfo};
pub use options::{SchedulerOptions, SchedulerServices};
