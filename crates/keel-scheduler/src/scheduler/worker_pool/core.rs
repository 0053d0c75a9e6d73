use log::debug;

use crate::id::WorkerId;
use crate::scheduler::worker_pool::WorkerPool;

fn remove_from(workers: &mut Vec<WorkerId>, worker_id: WorkerId) -> bool {
    match workers.iter().position(|x| *x == worker_id) {
        Some(index) => {
            workers.swap_remove(index);
            true
        }
        None => false,
    }
}

impl WorkerPool {
    /// Move a worker into the available pool. The worker must not already be
    /// available or blocked; it is removed from the executing workers if
    /// present (it is not present on first sighting).
    pub fn make_available(&mut self, worker_id: WorkerId) {
        assert!(
            !self.available_workers.contains(&worker_id),
            "worker {worker_id} is already available"
        );
        assert!(
            !self.blocked_workers.contains(&worker_id),
            "worker {worker_id} is blocked and cannot become available"
        );
        remove_from(&mut self.executing_workers, worker_id);
        self.available_workers.push(worker_id);
    }

    /// Take the most recently available worker.
    pub fn pop_available(&mut self) -> Option<WorkerId> {
        self.available_workers.pop()
    }

    pub fn mark_executing(&mut self, worker_id: WorkerId) {
        self.executing_workers.push(worker_id);
    }

    /// Move a worker from executing to blocked.
    pub fn mark_blocked(&mut self, worker_id: WorkerId) {
        assert!(
            remove_from(&mut self.executing_workers, worker_id),
            "blocked worker {worker_id} was not executing"
        );
        assert!(
            !self.blocked_workers.contains(&worker_id),
            "worker {worker_id} is already blocked"
        );
        self.blocked_workers.push(worker_id);
    }

    /// Move a worker from blocked back to executing.
    pub fn mark_unblocked(&mut self, worker_id: WorkerId) {
        assert!(
            remove_from(&mut self.blocked_workers, worker_id),
            "unblocked worker {worker_id} was not blocked"
        );
        assert!(
            !self.executing_workers.contains(&worker_id),
            "worker {worker_id} is already executing"
        );
        self.executing_workers.push(worker_id);
    }

    /// Remove a worker from whichever state it occupies. Removing a worker
    /// that is not present is a no-op, so repeated removal is harmless.
    pub fn remove(&mut self, worker_id: WorkerId) {
        let mut removals = 0;
        removals += remove_from(&mut self.available_workers, worker_id) as usize;
        removals += remove_from(&mut self.executing_workers, worker_id) as usize;
        removals += remove_from(&mut self.blocked_workers, worker_id) as usize;
        assert!(
            removals <= 1,
            "worker {worker_id} was present in {removals} states"
        );
    }

    pub fn has_available(&self) -> bool {
        !self.available_workers.is_empty()
    }

    pub fn available_count(&self) -> usize {
        self.available_workers.len()
    }

    pub fn total(&self) -> usize {
        self.available_workers.len() + self.executing_workers.len() + self.blocked_workers.len()
    }

    /// The number of states a worker currently occupies.
    pub fn occupancy(&self, worker_id: WorkerId) -> usize {
        [
            &self.available_workers,
            &self.executing_workers,
            &self.blocked_workers,
        ]
        .iter()
        .filter(|workers| workers.contains(&worker_id))
        .count()
    }

    pub fn worker_ids(&self) -> impl Iterator<Item = &WorkerId> {
        self.available_workers
            .iter()
            .chain(self.executing_workers.iter())
            .chain(self.blocked_workers.iter())
    }

    pub fn log_summary(&self, message: &str) {
        debug!(
            "{message}: {} available, {} executing, {} blocked",
            self.available_workers.len(),
            self.executing_workers.len(),
            self.blocked_workers.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_reuse() {
        let mut pool = WorkerPool::new();
        pool.make_available(WorkerId::from(1));
        pool.make_available(WorkerId::from(2));
        assert_eq!(pool.pop_available(), Some(WorkerId::from(2)));
        assert_eq!(pool.pop_available(), Some(WorkerId::from(1)));
        assert_eq!(pool.pop_available(), None);
    }

    #[test]
    fn test_execution_round_trip() {
        let mut pool = WorkerPool::new();
        pool.make_available(WorkerId::from(1));
        let worker = pool.pop_available().unwrap();
        pool.mark_executing(worker);
        assert_eq!(pool.occupancy(worker), 1);

        // Finishing a task makes the worker available again.
        pool.make_available(worker);
        assert!(pool.has_available());
        assert_eq!(pool.occupancy(worker), 1);
    }

    #[test]
    fn test_blocked_transitions() {
        let mut pool = WorkerPool::new();
        pool.make_available(WorkerId::from(1));
        let worker = pool.pop_available().unwrap();
        pool.mark_executing(worker);
        pool.mark_blocked(worker);
        assert_eq!(pool.occupancy(worker), 1);
        pool.mark_unblocked(worker);
        assert_eq!(pool.occupancy(worker), 1);
        assert_eq!(pool.total(), 1);
    }

    #[test]
    #[should_panic(expected = "was not executing")]
    fn test_blocked_requires_executing() {
        let mut pool = WorkerPool::new();
        pool.make_available(WorkerId::from(1));
        pool.mark_blocked(WorkerId::from(1));
    }

    #[test]
    #[should_panic(expected = "already available")]
    fn test_available_twice() {
        let mut pool = WorkerPool::new();
        pool.make_available(WorkerId::from(1));
        pool.make_available(WorkerId::from(1));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut pool = WorkerPool::new();
        pool.make_available(WorkerId::from(1));
        pool.remove(WorkerId::from(1));
        assert_eq!(pool.total(), 0);
        pool.remove(WorkerId::from(1));
        assert_eq!(pool.total(), 0);
    }
}
