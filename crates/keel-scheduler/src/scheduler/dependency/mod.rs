mod core;
mod state;

use std::collections::HashMap;

pub(crate) use state::ObjectEntry;

use crate::id::ObjectId;

/// Tracks which objects are available in the local object store and which
/// are being actively fetched from remote nodes.
///
/// An object is in at most one of the two tables at any time. Remote entries
/// carry back-references (queue cursors) to the waiting tasks that depend on
/// them; local entries carry none.
pub(crate) struct DependencyTracker {
    local_objects: HashMap<ObjectId, ObjectEntry>,
    remote_objects: HashMap<ObjectId, ObjectEntry>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self {
            local_objects: HashMap::new(),
            remote_objects: HashMap::new(),
        }
    }
}
