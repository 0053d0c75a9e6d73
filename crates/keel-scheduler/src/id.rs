use std::marker::PhantomData;

use crate::error::{SchedulerError, SchedulerResult};

pub trait IdValueType: Sized {
    fn first() -> Self;
    fn next(v: Self) -> SchedulerResult<Self>;
}

macro_rules! impl_integer_id_value_type {
    ($type:ty) => {
        impl IdValueType for $type {
            fn first() -> Self {
                1
            }

            fn next(v: Self) -> SchedulerResult<Self> {
                v.checked_add(1)
                    .ok_or(SchedulerError::InternalError("ID overflow".to_string()))
            }
        }
    };
}

impl_integer_id_value_type!(u64);

pub trait IdType: Sized {
    type Value: IdValueType + From<Self> + Into<Self>;
}

macro_rules! define_id_type {
    ($name:ident, $value_type:ty) => {
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name($value_type);

        impl IdType for $name {
            type Value = $value_type;
        }

        impl From<$value_type> for $name {
            fn from(id: $value_type) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $value_type {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id_type!(TaskId, u64);
define_id_type!(ObjectId, u64);
define_id_type!(ActorId, u64);
define_id_type!(DriverId, u64);
define_id_type!(WorkerId, u64);
define_id_type!(NodeId, u64);

/// A stable cursor for a task queue entry.
/// The id is minted once when the task is first queued and follows the entry
/// as it moves between the waiting and dispatch queues, so back-references
/// held by object entries stay valid across queue mutations.
define_id_type!(EntryId, u64);

#[derive(Debug)]
pub struct IdGenerator<T: IdType> {
    next_value: T::Value,
    phantom: PhantomData<T>,
}

impl<T: IdType> IdGenerator<T>
where
    T::Value: Copy,
{
    pub fn new() -> Self {
        Self {
            next_value: T::Value::first(),
            phantom: PhantomData,
        }
    }

    pub fn next(&mut self) -> SchedulerResult<T> {
        let value = self.next_value;
        self.next_value = T::Value::next(value)?;
        Ok(value.into())
    }
}

impl<T: IdType> Default for IdGenerator<T>
where
    T::Value: Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator() {
        let mut generator = IdGenerator::<EntryId>::new();
        let first = generator.next().unwrap();
        let second = generator.next().unwrap();
        assert_ne!(first, second);
        assert_eq!(u64::from(first), 1);
        assert_eq!(u64::from(second), 2);
    }
}
