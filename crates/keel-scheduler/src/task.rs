use crate::id::{ActorId, DriverId, ObjectId, TaskId};
use crate::resource::ResourceVector;

/// An immutable task specification submitted by a driver or worker.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    driver_id: DriverId,
    task_id: TaskId,
    kind: TaskKind,
    args: Vec<TaskArg>,
    required_resources: ResourceVector,
}

/// Regular tasks are scheduled wherever their dependencies are local.
/// Actor tasks are bound to the node that owns the actor and must execute
/// in strict submission order per actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Regular,
    Actor {
        actor_id: ActorId,
        /// The per-actor sequence number assigned by the submitter.
        counter: u64,
    },
}

#[derive(Debug, Clone)]
pub enum TaskArg {
    /// An argument passed by reference to an object in the object store.
    ObjectRef(ObjectId),
    /// An argument passed by value.
    Inline(Vec<u8>),
}

impl TaskSpec {
    pub fn new(
        driver_id: DriverId,
        task_id: TaskId,
        kind: TaskKind,
        args: Vec<TaskArg>,
        required_resources: ResourceVector,
    ) -> Self {
        Self {
            driver_id,
            task_id,
            kind,
            args,
            required_resources,
        }
    }

    pub fn driver_id(&self) -> DriverId {
        self.driver_id
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn is_actor_task(&self) -> bool {
        matches!(self.kind, TaskKind::Actor { .. })
    }

    pub fn actor_id(&self) -> Option<ActorId> {
        match self.kind {
            TaskKind::Regular => None,
            TaskKind::Actor { actor_id, .. } => Some(actor_id),
        }
    }

    /// The per-actor sequence number. Meaningful only for actor tasks.
    pub fn actor_counter(&self) -> Option<u64> {
        match self.kind {
            TaskKind::Regular => None,
            TaskKind::Actor { counter, .. } => Some(counter),
        }
    }

    pub fn required_resources(&self) -> &ResourceVector {
        &self.required_resources
    }

    /// The object ids of all by-reference arguments, in argument order.
    /// An object that appears in multiple arguments is yielded once per
    /// occurrence.
    pub fn object_dependencies(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.args.iter().filter_map(|arg| match arg {
            TaskArg::ObjectRef(object_id) => Some(*object_id),
            TaskArg::Inline(_) => None,
        })
    }

    pub fn depends_on(&self, object_id: ObjectId) -> bool {
        self.object_dependencies().any(|x| x == object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(args: Vec<TaskArg>) -> TaskSpec {
        TaskSpec::new(
            DriverId::from(1),
            TaskId::from(1),
            TaskKind::Regular,
            args,
            ResourceVector::new(1.0, 0.0),
        )
    }

    #[test]
    fn test_object_dependencies() {
        let task = spec(vec![
            TaskArg::ObjectRef(ObjectId::from(7)),
            TaskArg::Inline(vec![1, 2, 3]),
            TaskArg::ObjectRef(ObjectId::from(9)),
            TaskArg::ObjectRef(ObjectId::from(7)),
        ]);
        let dependencies: Vec<_> = task.object_dependencies().collect();
        assert_eq!(
            dependencies,
            vec![ObjectId::from(7), ObjectId::from(9), ObjectId::from(7)]
        );
        assert!(task.depends_on(ObjectId::from(9)));
        assert!(!task.depends_on(ObjectId::from(8)));
    }

    #[test]
    fn test_actor_accessors() {
        let task = TaskSpec::new(
            DriverId::from(1),
            TaskId::from(2),
            TaskKind::Actor {
                actor_id: ActorId::from(5),
                counter: 3,
            },
            vec![],
            ResourceVector::default(),
        );
        assert!(task.is_actor_task());
        assert_eq!(task.actor_id(), Some(ActorId::from(5)));
        assert_eq!(task.actor_counter(), Some(3));

        let regular = spec(vec![]);
        assert!(!regular.is_actor_task());
        assert_eq!(regular.actor_id(), None);
        assert_eq!(regular.actor_counter(), None);
    }
}
