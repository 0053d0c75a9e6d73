mod core;
mod state;

use indexmap::IndexMap;
pub(crate) use state::TaskEntry;

use crate::id::{EntryId, IdGenerator};

/// The waiting and dispatch queues for regular (non-actor) tasks.
///
/// Both queues are insertion-ordered maps keyed by [EntryId]. An entry keeps
/// its id while it moves between the queues, so the ids act as stable
/// cursors: back-references held by the dependency tracker stay valid across
/// insertions and across erasures of other entries.
pub(crate) struct TaskQueue {
    /// Tasks with at least one unresolved by-reference argument.
    waiting: IndexMap<EntryId, TaskEntry>,
    /// Tasks whose by-reference arguments are all available locally.
    dispatch: IndexMap<EntryId, TaskEntry>,
    entry_id_generator: IdGenerator<EntryId>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            waiting: IndexMap::new(),
            dispatch: IndexMap::new(),
            entry_id_generator: IdGenerator::new(),
        }
    }
}
