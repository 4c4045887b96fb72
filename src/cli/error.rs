//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Input { .. } => crate::exitcode::NOINPUT,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_persistence_failure_then_ioerr() {
        let err: CliError = ApplicationError::OperationFailed {
            context: "append patient record: /nope/records.txt".into(),
            source: Box::new(std::io::Error::from(std::io::ErrorKind::PermissionDenied)),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::IOERR);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), crate::exitcode::USAGE);
        let closed: CliError = ApplicationError::Input {
            context: "patient age".into(),
            source: std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
        }
        .into();
        assert_eq!(closed.exit_code(), crate::exitcode::NOINPUT);
        let bad: CliError = ApplicationError::from(DomainError::InvalidAge("x".into())).into();
        assert_eq!(bad.exit_code(), crate::exitcode::DATAERR);
    }
}
