use crate::task::TaskSpec;

/// A queued task. The entry owns the spec; assigning the task to a worker
/// or purging the entry drops the spec with it.
#[derive(Debug)]
pub(crate) struct TaskEntry {
    spec: TaskSpec,
}

impl TaskEntry {
    pub fn new(spec: TaskSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &TaskSpec {
        &self.spec
    }

    pub fn into_spec(self) -> TaskSpec {
        self.spec
    }
}
