use crate::id::{EntryId, ObjectId};

/// An object known to the dependency tracker.
#[derive(Debug)]
pub(crate) struct ObjectEntry {
    pub object_id: ObjectId,
    /// Cursors for the waiting tasks that depend on this object.
    /// These reference entries in the waiting queue only; tasks in the
    /// dispatch queue carry no back-references and are recomputed on
    /// object removal.
    pub dependent_tasks: Vec<EntryId>,
}

impl ObjectEntry {
    pub fn new(object_id: ObjectId) -> Self {
        Self {
            object_id,
            dependent_tasks: vec![],
        }
    }
}
