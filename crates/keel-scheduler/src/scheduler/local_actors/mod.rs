mod core;
mod state;

use std::collections::HashMap;

pub(crate) use state::LocalActorInfo;

use crate::id::ActorId;
use crate::task::TaskSpec;

/// Bookkeeping for the actors that this node owns, plus the tasks submitted
/// for actors whose location is not yet known.
pub(crate) struct ActorDirectory {
    local_actor_infos: HashMap<ActorId, LocalActorInfo>,
    /// Tasks for actors with no known location. These are resubmitted
    /// whenever an actor creation notification arrives.
    cached_submitted_tasks: Vec<TaskSpec>,
}

impl ActorDirectory {
    pub fn new() -> Self {
        Self {
            local_actor_infos: HashMap::new(),
            cached_submitted_tasks: vec![],
        }
    }
}
