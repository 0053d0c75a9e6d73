use thiserror::Error;

pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<keel_common::error::CommonError> for SchedulerError {
    fn from(error: keel_common::error::CommonError) -> Self {
        match error {
            keel_common::error::CommonError::InvalidArgument(x) => Self::InvalidArgument(x),
            keel_common::error::CommonError::InternalError(x) => Self::InternalError(x),
        }
    }
}
