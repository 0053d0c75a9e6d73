use crate::id::{EntryId, ObjectId};
use crate::scheduler::dependency::{DependencyTracker, ObjectEntry};
use crate::task::TaskSpec;

impl DependencyTracker {
    /// Whether every by-reference argument of the task is available locally.
    pub fn can_run(&self, spec: &TaskSpec) -> bool {
        spec.object_dependencies()
            .all(|object_id| self.local_objects.contains_key(&object_id))
    }

    /// Record that the waiting task at `cursor` depends on a missing object.
    /// Returns true if the object was not previously being fetched, in which
    /// case the caller should issue an immediate fetch for it.
    pub fn record_missing(&mut self, cursor: EntryId, object_id: ObjectId) -> bool {
        let newly_tracked = !self.remote_objects.contains_key(&object_id);
        self.remote_objects
            .entry(object_id)
            .or_insert_with(|| ObjectEntry::new(object_id))
            .dependent_tasks
            .push(cursor);
        newly_tracked
    }

    /// Record fetch requests for every by-reference argument of the task
    /// that is not available locally. Returns the object ids that were not
    /// previously being fetched, for which the caller should issue an
    /// immediate fetch. At least one dependency must be missing.
    pub fn register_task_dependencies(
        &mut self,
        spec: &TaskSpec,
        cursor: EntryId,
    ) -> Vec<ObjectId> {
        let mut newly_tracked = vec![];
        let mut missing = 0;
        for object_id in spec.object_dependencies() {
            if self.local_objects.contains_key(&object_id) {
                continue;
            }
            if self.record_missing(cursor, object_id) {
                newly_tracked.push(object_id);
            }
            missing += 1;
        }
        assert!(
            missing > 0,
            "task {} was queued as waiting with no missing dependencies",
            spec.task_id()
        );
        newly_tracked
    }

    /// Move an object into the local table and return the cursors of the
    /// waiting tasks that depend on it. The object must not already be local.
    pub fn on_object_available(&mut self, object_id: ObjectId) -> Vec<EntryId> {
        let mut entry = self
            .remote_objects
            .remove(&object_id)
            .unwrap_or_else(|| ObjectEntry::new(object_id));
        let dependent_tasks = std::mem::take(&mut entry.dependent_tasks);
        assert!(
            self.local_objects.insert(object_id, entry).is_none(),
            "object {object_id} became available but was already local"
        );
        dependent_tasks
    }

    /// Remove an object from the local table. The object must be present.
    pub fn on_object_removed(&mut self, object_id: ObjectId) {
        assert!(
            self.local_objects.remove(&object_id).is_some(),
            "object {object_id} was removed but was not local"
        );
    }

    /// The ids of all objects currently being fetched.
    pub fn remote_object_ids(&self) -> Vec<ObjectId> {
        self.remote_objects
            .values()
            .map(|entry| entry.object_id)
            .collect()
    }

    /// Drop the back-references that do not satisfy the predicate, and drop
    /// remote entries whose dependent list empties.
    /// This must run before the referenced queue entries are destroyed.
    pub fn retain_dependents(&mut self, mut keep: impl FnMut(&EntryId) -> bool) {
        self.remote_objects.retain(|_, entry| {
            entry.dependent_tasks.retain(|cursor| keep(cursor));
            !entry.dependent_tasks.is_empty()
        });
    }

    pub fn is_local(&self, object_id: ObjectId) -> bool {
        self.local_objects.contains_key(&object_id)
    }

    pub fn is_remote(&self, object_id: ObjectId) -> bool {
        self.remote_objects.contains_key(&object_id)
    }

    pub fn remote_entry(&self, object_id: ObjectId) -> Option<&ObjectEntry> {
        self.remote_objects.get(&object_id)
    }

    pub fn remote_object_count(&self) -> usize {
        self.remote_objects.len()
    }

    pub fn local_object_ids(&self) -> Vec<ObjectId> {
        self.local_objects.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{DriverId, TaskId};
    use crate::resource::ResourceVector;
    use crate::task::{TaskArg, TaskKind};

    fn spec(objects: &[u64]) -> TaskSpec {
        TaskSpec::new(
            DriverId::from(1),
            TaskId::from(1),
            TaskKind::Regular,
            objects
                .iter()
                .map(|x| TaskArg::ObjectRef(ObjectId::from(*x)))
                .collect(),
            ResourceVector::new(1.0, 0.0),
        )
    }

    #[test]
    fn test_can_run() {
        let mut tracker = DependencyTracker::new();
        let task = spec(&[1, 2]);
        assert!(!tracker.can_run(&task));
        tracker.on_object_available(ObjectId::from(1));
        assert!(!tracker.can_run(&task));
        tracker.on_object_available(ObjectId::from(2));
        assert!(tracker.can_run(&task));
    }

    #[test]
    fn test_register_task_dependencies() {
        let mut tracker = DependencyTracker::new();
        tracker.on_object_available(ObjectId::from(1));
        let cursor = EntryId::from(10);
        let newly = tracker.register_task_dependencies(&spec(&[1, 2, 3]), cursor);
        assert_eq!(newly, vec![ObjectId::from(2), ObjectId::from(3)]);
        // A second task on object 2 does not trigger another immediate fetch.
        let newly = tracker.register_task_dependencies(&spec(&[2]), EntryId::from(11));
        assert!(newly.is_empty());
        let entry = tracker.remote_entry(ObjectId::from(2)).unwrap();
        assert_eq!(
            entry.dependent_tasks,
            vec![EntryId::from(10), EntryId::from(11)]
        );
    }

    #[test]
    #[should_panic(expected = "no missing dependencies")]
    fn test_register_task_dependencies_requires_missing() {
        let mut tracker = DependencyTracker::new();
        tracker.on_object_available(ObjectId::from(1));
        tracker.register_task_dependencies(&spec(&[1]), EntryId::from(10));
    }

    #[test]
    fn test_object_available_moves_entry() {
        let mut tracker = DependencyTracker::new();
        tracker.record_missing(EntryId::from(10), ObjectId::from(5));
        let dependents = tracker.on_object_available(ObjectId::from(5));
        assert_eq!(dependents, vec![EntryId::from(10)]);
        assert!(tracker.is_local(ObjectId::from(5)));
        assert!(!tracker.is_remote(ObjectId::from(5)));
    }

    #[test]
    #[should_panic(expected = "already local")]
    fn test_object_available_twice() {
        let mut tracker = DependencyTracker::new();
        tracker.on_object_available(ObjectId::from(5));
        tracker.on_object_available(ObjectId::from(5));
    }

    #[test]
    #[should_panic(expected = "was not local")]
    fn test_object_removed_when_absent() {
        let mut tracker = DependencyTracker::new();
        tracker.on_object_removed(ObjectId::from(5));
    }

    #[test]
    fn test_retain_dependents_drops_empty_entries() {
        let mut tracker = DependencyTracker::new();
        tracker.record_missing(EntryId::from(10), ObjectId::from(1));
        tracker.record_missing(EntryId::from(11), ObjectId::from(1));
        tracker.record_missing(EntryId::from(11), ObjectId::from(2));
        tracker.retain_dependents(|cursor| *cursor != EntryId::from(11));
        assert!(tracker.is_remote(ObjectId::from(1)));
        assert!(!tracker.is_remote(ObjectId::from(2)));
        let entry = tracker.remote_entry(ObjectId::from(1)).unwrap();
        assert_eq!(entry.dependent_tasks, vec![EntryId::from(10)]);
    }
}
