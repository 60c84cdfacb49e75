use std::io;
use std::path::PathBuf;

use deckdoc_params::ParamError;
use thiserror::Error;

/// Classification of every reportable failure. Handlers fail fast; nothing
/// is caught or retried below the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
    NotFound,
    Unsupported,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    InvalidArgument = 1,
    InvalidState = 2,
    NotFound = 3,
    Unsupported = 4,
    Io = 5,
}

#[derive(Debug, Error)]
pub enum OpError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    NotFound(String),

    #[error("unsupported format '{requested}' (supported formats: {supported})")]
    UnsupportedFormat { requested: String, supported: String },

    #[error("unknown operation '{operation}' for module '{module}' (supported operations: {supported})")]
    UnknownOperation {
        module: String,
        operation: String,
        supported: String,
    },

    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Param(_)
            | Self::InvalidArgument(_)
            | Self::UnknownOperation { .. } => ErrorKind::InvalidArgument,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UnsupportedFormat { .. } => ErrorKind::Unsupported,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.kind() {
            ErrorKind::InvalidArgument => ExitCode::InvalidArgument,
            ErrorKind::InvalidState => ExitCode::InvalidState,
            ErrorKind::NotFound => ExitCode::NotFound,
            ErrorKind::Unsupported => ExitCode::Unsupported,
            ErrorKind::Io => ExitCode::Io,
        }
    }
}

pub type OpResult<T> = Result<T, OpError>;

pub(crate) fn unknown_operation(module: &str, operation: &str, supported: &[&str]) -> OpError {
    OpError::UnknownOperation {
        module: module.to_string(),
        operation: operation.to_string(),
        supported: supported.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_operation_message_names_the_offender() {
        let err = unknown_operation("slides", "explode", &["add", "delete"]);
        let message = err.to_string();
        assert!(message.contains("operation"));
        assert!(message.contains("explode"));
        assert!(message.contains("slides"));
        assert!(message.contains("add, delete"));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn exit_codes_follow_kinds() {
        assert_eq!(
            OpError::NotFound("x".into()).exit_code(),
            ExitCode::NotFound
        );
        assert_eq!(
            OpError::InvalidState("x".into()).exit_code(),
            ExitCode::InvalidState
        );
        assert_eq!(
            OpError::UnsupportedFormat {
                requested: "pdf".into(),
                supported: "json".into()
            }
            .exit_code(),
            ExitCode::Unsupported
        );
    }
}
