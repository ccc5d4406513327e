use thiserror::Error;

/// Result type alias using ImportError
pub type Result<T> = std::result::Result<T, ImportError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// handling, log assertions and operator-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Import pipeline
    /// The CSV document could not be read as a table
    Parse,
    /// The batched duplicate lookup failed
    Lookup,
    /// A single insert/update failed during execution
    Apply,

    // Session
    InvalidTransition,
    RunInProgress,
    InvalidInput,

    // Store
    NotFound,
    AlreadyExists,
    Persistence,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::Lookup => "ERR_LOOKUP",
            ExErrorKind::Apply => "ERR_APPLY",
            ExErrorKind::InvalidTransition => "ERR_INVALID_TRANSITION",
            ExErrorKind::RunInProgress => "ERR_RUN_IN_PROGRESS",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Store implementations speak this type; the import pipeline converts its
/// own `ImportError` into it at logging boundaries.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    key: Option<String>,
    origin_index: Option<usize>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key: None,
            origin_index: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add natural key (policy number) context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add CSV origin index context
    pub fn with_origin_index(mut self, origin_index: usize) -> Self {
        self.origin_index = Some(origin_index);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
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

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn origin_index(&self) -> Option<usize> {
        self.origin_index
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message suitable for a per-row failure report: the underlying message
    /// when one was recorded, otherwise the stable code.
    pub fn reason(&self) -> String {
        if self.message.is_empty() {
            self.code().to_string()
        } else {
            self.message.clone()
        }
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
        if let Some(key) = &self.key {
            write!(f, " (policy_no: {})", key)?;
        }
        if let Some(origin_index) = self.origin_index {
            write!(f, " (row: {})", origin_index)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for the import pipeline
///
/// `Parse` and `Lookup` are terminal for the current attempt. Row validation
/// failures stay data (`RowRejection`); each failed task is an `Apply` that
/// the executor logs and then folds into a `RowFailure`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// Malformed CSV; no rows exist
    #[error("CSV parse error: {reason}")]
    Parse { reason: String },

    /// The duplicate-check query failed
    #[error("Duplicate lookup failed: {reason}")]
    Lookup { reason: String },

    /// A single task failed against the store
    #[error("Row {origin_index} failed: {reason}")]
    Apply { origin_index: usize, reason: String },

    /// Session action not permitted in the current stage
    #[error("Cannot {action} while {from}")]
    InvalidTransition { from: String, action: String },

    /// update_row named an origin index that does not exist
    #[error("No CSV row with index {origin_index}")]
    RowNotFound { origin_index: usize },

    /// Another import run is executing
    #[error("An import run is already executing")]
    RunInProgress,

    #[error("No file selected")]
    NoFileSelected,

    /// Unknown resolution policy string
    #[error("Unknown resolution policy: {value}")]
    InvalidPolicy { value: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

}

impl From<ImportError> for ExError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Parse { reason } => ExError::new(ExErrorKind::Parse)
                .with_op("parse_csv")
                .with_message(reason),

            ImportError::Lookup { reason } => ExError::new(ExErrorKind::Lookup)
                .with_op("find_duplicates")
                .with_message(reason),

            ImportError::Apply {
                origin_index,
                reason,
            } => ExError::new(ExErrorKind::Apply)
                .with_op("apply_task")
                .with_origin_index(origin_index)
                .with_message(reason),

            ImportError::InvalidTransition { from, action } => {
                ExError::new(ExErrorKind::InvalidTransition)
                    .with_op(action.clone())
                    .with_message(format!("Cannot {} while {}", action, from))
            }

            ImportError::RowNotFound { origin_index } => ExError::new(ExErrorKind::NotFound)
                .with_origin_index(origin_index)
                .with_message("CSV row not found"),

            ImportError::RunInProgress => ExError::new(ExErrorKind::RunInProgress)
                .with_message("An import run is already executing"),

            ImportError::NoFileSelected => {
                ExError::new(ExErrorKind::InvalidInput).with_message("No file selected")
            }

            ImportError::InvalidPolicy { value } => ExError::new(ExErrorKind::InvalidInput)
                .with_message(format!("Unknown resolution policy: {}", value)),

            ImportError::InvalidConfig { reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_config")
                .with_message(reason),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Parse {
            reason: err.to_string(),
        }
    }
}
