use std::time::Duration;

use keel_common::config::AppConfig;

use crate::cluster::{ObjectStoreClient, ReconstructionClient, TaskTableClient, WorkerManager};
use crate::error::{SchedulerError, SchedulerResult};
use crate::id::NodeId;

pub struct SchedulerOptions {
    pub node_id: NodeId,
    /// The interval at which fetch requests for missing objects are retried.
    pub fetch_timeout: Duration,
    /// Whether a global scheduler exists in the cluster. When false, tasks
    /// that cannot start right away are still queued locally.
    pub global_scheduler_enabled: bool,
    pub services: SchedulerServices,
}

/// The collaborators the scheduling core drives.
pub struct SchedulerServices {
    pub object_store: Box<dyn ObjectStoreClient>,
    pub reconstruction: Box<dyn ReconstructionClient>,
    /// The cluster-wide task table. Absent when the node runs standalone.
    pub task_table: Option<Box<dyn TaskTableClient>>,
    pub worker_manager: Box<dyn WorkerManager>,
}

impl SchedulerOptions {
    pub fn try_new(config: &AppConfig, services: SchedulerServices) -> SchedulerResult<Self> {
        if config.scheduler.fetch_timeout_ms == 0 {
            return Err(SchedulerError::InvalidArgument(
                "fetch timeout must be positive".to_string(),
            ));
        }
        Ok(Self {
            node_id: NodeId::from(config.node.node_id),
            fetch_timeout: Duration::from_millis(config.scheduler.fetch_timeout_ms),
            global_scheduler_enabled: config.scheduler.global_scheduler_enabled,
            services,
        })
    }
}
