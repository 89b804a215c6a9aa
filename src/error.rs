use thiserror::Error;
use tonic::Status;

/// Reasons a function call fails. Every variant ends the call; nothing is retried.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("call has no function request header")]
    MissingFunctionHeader,

    #[error("invalid function request header: {0}")]
    InvalidFunctionHeader(String),

    #[error("unknown function id {0}")]
    UnknownFunction(i32),

    #[error("{function}: row {row} has {found} values, expected at least {expected}")]
    MalformedRow {
        function: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Boxed; a `Status` is several times larger than every other variant.
    #[error("transport error: {0}")]
    Transport(Box<Status>),

    #[error("call cancelled by the host")]
    Cancelled,
}

impl From<Status> for DispatchError {
    fn from(status: Status) -> Self {
        DispatchError::Transport(Box::new(status))
    }
}

impl From<DispatchError> for Status {
    fn from(err: DispatchError) -> Self {
        let message = err.to_string();
        match err {
            DispatchError::MissingFunctionHeader
            | DispatchError::InvalidFunctionHeader(_)
            | DispatchError::MalformedRow { .. } => Status::invalid_argument(message),
            DispatchError::UnknownFunction(_) => Status::unimplemented(message),
            DispatchError::Transport(status) => *status,
            DispatchError::Cancelled => Status::cancelled(message),
        }
    }
}
