use log::debug;

use crate::error::SchedulerResult;
use crate::id::{DriverId, EntryId};
use crate::scheduler::task_queue::{TaskEntry, TaskQueue};
use crate::task::TaskSpec;

impl TaskQueue {
    /// Append a task to the tail of the waiting queue.
    pub fn push_waiting(&mut self, spec: TaskSpec) -> SchedulerResult<EntryId> {
        let entry_id = self.entry_id_generator.next()?;
        self.waiting.insert(entry_id, TaskEntry::new(spec));
        Ok(entry_id)
    }

    /// Append a task to the tail of the dispatch queue.
    pub fn push_dispatch(&mut self, spec: TaskSpec) -> SchedulerResult<EntryId> {
        let entry_id = self.entry_id_generator.next()?;
        self.dispatch.insert(entry_id, TaskEntry::new(spec));
        Ok(entry_id)
    }

    pub fn waiting_entry(&self, entry_id: &EntryId) -> Option<&TaskEntry> {
        self.waiting.get(entry_id)
    }

    /// Move a waiting entry to the tail of the dispatch queue, keeping its id.
    /// Returns false if the entry is no longer in the waiting queue.
    pub fn promote_to_dispatch(&mut self, entry_id: EntryId) -> bool {
        match self.waiting.shift_remove(&entry_id) {
            Some(entry) => {
                self.dispatch.insert(entry_id, entry);
                true
            }
            None => false,
        }
    }

    /// Move the dispatch entry at `index` to the tail of the waiting queue,
    /// keeping its id.
    pub fn demote_to_waiting(&mut self, index: usize) -> Option<EntryId> {
        let (entry_id, entry) = self.dispatch.shift_remove_index(index)?;
        self.waiting.insert(entry_id, entry);
        Some(entry_id)
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn dispatch_len(&self) -> usize {
        self.dispatch.len()
    }

    pub fn dispatch_get_index(&self, index: usize) -> Option<(&EntryId, &TaskEntry)> {
        self.dispatch.get_index(index)
    }

    /// Remove and return the dispatch entry at `index`, preserving the order
    /// of the remaining entries.
    pub fn dispatch_remove_index(&mut self, index: usize) -> Option<(EntryId, TaskEntry)> {
        self.dispatch.shift_remove_index(index)
    }

    pub fn waiting_iter(&self) -> impl Iterator<Item = (&EntryId, &TaskEntry)> {
        self.waiting.iter()
    }

    pub fn dispatch_iter(&self) -> impl Iterator<Item = (&EntryId, &TaskEntry)> {
        self.dispatch.iter()
    }

    /// Remove every task belonging to the given driver from both queues.
    pub fn remove_driver_tasks(&mut self, driver_id: DriverId) {
        let waiting_before = self.waiting.len();
        let dispatch_before = self.dispatch.len();
        self.waiting
            .retain(|_, entry| entry.spec().driver_id() != driver_id);
        self.dispatch
            .retain(|_, entry| entry.spec().driver_id() != driver_id);
        let removed =
            waiting_before - self.waiting.len() + dispatch_before - self.dispatch.len();
        if removed > 0 {
            debug!("removed {removed} queued tasks for driver {driver_id}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ObjectId, TaskId};
    use crate::resource::ResourceVector;
    use crate::task::{TaskArg, TaskKind};

    fn spec(driver: u64, task: u64) -> TaskSpec {
        TaskSpec::new(
            DriverId::from(driver),
            TaskId::from(task),
            TaskKind::Regular,
            vec![TaskArg::ObjectRef(ObjectId::from(1))],
            ResourceVector::new(1.0, 0.0),
        )
    }

    #[test]
    fn test_entry_id_is_stable_across_queue_moves() {
        let mut queue = TaskQueue::new();
        let first = queue.push_waiting(spec(1, 1)).unwrap();
        let second = queue.push_waiting(spec(1, 2)).unwrap();

        // Erasing another entry must not invalidate the cursor.
        assert!(queue.promote_to_dispatch(first));
        assert!(queue.waiting_entry(&second).is_some());
        assert_eq!(queue.dispatch_len(), 1);

        // The entry keeps its id when it moves back to the waiting queue.
        assert_eq!(queue.demote_to_waiting(0), Some(first));
        assert_eq!(queue.waiting_len(), 2);
        let order: Vec<_> = queue.waiting_iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![second, first]);
    }

    #[test]
    fn test_promote_missing_entry() {
        let mut queue = TaskQueue::new();
        let entry_id = queue.push_waiting(spec(1, 1)).unwrap();
        assert!(queue.promote_to_dispatch(entry_id));
        assert!(!queue.promote_to_dispatch(entry_id));
    }

    #[test]
    fn test_dispatch_order_preserved_on_removal() {
        let mut queue = TaskQueue::new();
        for task in 1..=4 {
            queue.push_dispatch(spec(1, task)).unwrap();
        }
        let (_, entry) = queue.dispatch_remove_index(1).unwrap();
        assert_eq!(entry.spec().task_id(), TaskId::from(2));
        let remaining: Vec<_> = queue
            .dispatch_iter()
            .map(|(_, entry)| entry.spec().task_id())
            .collect();
        assert_eq!(
            remaining,
            vec![TaskId::from(1), TaskId::from(3), TaskId::from(4)]
        );
    }

    #[test]
    fn test_remove_driver_tasks() {
        let mut queue = TaskQueue::new();
        queue.push_waiting(spec(1, 1)).unwrap();
        queue.push_waiting(spec(2, 2)).unwrap();
        queue.push_dispatch(spec(1, 3)).unwrap();
        queue.remove_driver_tasks(DriverId::from(1));
        assert_eq!(queue.waiting_len(), 1);
        assert_eq!(queue.dispatch_len(), 0);
        let remaining: Vec<_> = queue
            .waiting_iter()
            .map(|(_, entry)| entry.spec().driver_id())
            .collect();
        assert_eq!(remaining, vec![DriverId::from(2)]);
    }
}
