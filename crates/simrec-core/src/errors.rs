use std::sync::Arc;
use thiserror::Error;

/// Result type alias using RecordError
pub type Result<T> = std::result::Result<T, RecordError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// programmatically and that tests can assert against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Lookup/Validation
    InvalidInput,
    NotFound,
    ConstraintViolation,

    // Declared surface without a backing implementation
    NotImplemented,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::NotImplemented => "ERR_NOT_IMPLEMENTED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Underlying failure carried by an [`ExError`], kept exactly as raised.
pub type ErrorCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus the record
/// label / group context of the failing operation. Backend failures keep
/// their original error value as `cause`, reachable through
/// [`std::error::Error::source`] and [`ExError::cause_as`].
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    label: Option<String>,
    group: Option<String>,
    message: String,
    cause: Option<ErrorCause>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            label: None,
            group: None,
            message: String::new(),
            cause: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add record label context
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add group label context
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the underlying error unchanged
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the record label context, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Get the group label context, if any
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Downcast the underlying cause to a concrete backend error type
    pub fn cause_as<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.cause.as_deref().and_then(|c| c.downcast_ref::<E>())
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(label) = &self.label {
            write!(f, " (label: {})", label)?;
        }
        if let Some(group) = &self.group {
            write!(f, " (group: {})", group)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while validating or reconstructing simulation records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// No stored record carries this label
    #[error("Record not found: {label}")]
    RecordNotFound { label: String },

    /// No stored group carries this label
    #[error("Group not found: {group}")]
    GroupNotFound { group: String },

    /// Tag-based deletion has no implementation
    #[error("Deleting records by tag is not implemented (tag: {tag})")]
    DeleteByTagNotImplemented { tag: String },

    /// Record label must be non-empty
    #[error("Record label cannot be empty")]
    EmptyLabel,

    /// Group label must be non-empty
    #[error("Group label cannot be empty (record: {label})")]
    EmptyGroup { label: String },

    /// Tag cannot be stored in the comma-joined tag column
    #[error("Invalid tag '{tag}' on record {label}: {reason}")]
    InvalidTag {
        label: String,
        tag: String,
        reason: String,
    },

    /// A stored row could not be turned back into a domain object
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow { table: String, reason: String },

    /// Canonical JSON encoding failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from RecordError to ExError
impl From<RecordError> for ExError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::RecordNotFound { label } => ExError::new(ExErrorKind::NotFound)
                .with_label(label)
                .with_message("Record not found"),

            RecordError::GroupNotFound { group } => ExError::new(ExErrorKind::NotFound)
                .with_group(group)
                .with_message("Group not found"),

            RecordError::DeleteByTagNotImplemented { tag } => {
                ExError::new(ExErrorKind::NotImplemented)
                    .with_op("delete_by_tag")
                    .with_message(format!("Deleting records by tag is not implemented (tag: {})", tag))
            }

            RecordError::EmptyLabel => ExError::new(ExErrorKind::InvalidInput)
                .with_message("Record label cannot be empty"),

            RecordError::EmptyGroup { label } => ExError::new(ExErrorKind::InvalidInput)
                .with_label(label)
                .with_message("Group label cannot be empty"),

            RecordError::InvalidTag { label, tag, reason } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_label(label)
                    .with_message(format!("Invalid tag '{}': {}", tag, reason))
            }

            RecordError::CorruptRow { table, reason } => ExError::new(ExErrorKind::Serialization)
                .with_op("hydrate")
                .with_message(format!("Corrupt row in {}: {}", table, reason)),

            RecordError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to RecordError
impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::Serialization {
            message: err.to_string(),
        }
    }
}
