use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DaoError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Table '{0}' already exists")]
    TableExists(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

/// Coarse classification used to decide how a failure travels back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The entity definition itself is unusable. Always surfaced.
    Configuration,
    /// Interactive input could not be turned into a field value.
    Input,
    /// The session rejected or failed a statement.
    Execution,
}

impl DaoError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ConfigurationError(_) => ErrorClass::Configuration,
            Self::InputError(_) => ErrorClass::Input,
            Self::ExecutionError(_)
            | Self::ParseError(_)
            | Self::TableExists(_)
            | Self::TableNotFound(_)
            | Self::ColumnNotFound(_, _)
            | Self::TypeMismatch(_)
            | Self::ConstraintViolation(_)
            | Self::UnsupportedOperation(_)
            | Self::LockError(_) => ErrorClass::Execution,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.class() == ErrorClass::Configuration
    }

    pub fn is_execution(&self) -> bool {
        self.class() == ErrorClass::Execution
    }
}

pub type Result<T> = std::result::Result<T, DaoError>;

impl<T> From<std::sync::PoisonError<T>> for DaoError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
