mod object_store;
mod task_table;
mod worker_manager;

pub use object_store::{ObjectStoreClient, ReconstructionClient};
pub use task_table::{TaskStatus, TaskTableClient};
pub use worker_manager::WorkerManager;
