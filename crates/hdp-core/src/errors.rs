use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure the publisher can surface is classified by one of these
/// kinds. Each kind maps to a stable string code (for programmatic handling
/// and tests) and to a process exit code (for the CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Source data
    /// Source file missing, unreadable, not UTF-8, or not parsable
    InvalidInput,
    /// Source parsed but holds zero data rows
    EmptyDataset,

    // Relational source
    Connection,
    Query,

    // Ledger
    Auth,
    Network,
    TopicNotFound,

    // Storage / lookup
    Io,
    NotFound,
    AlreadyExists,
    /// Recomputed digest differs from the published one
    HashMismatch,
    /// A storage backend or transport that exists only as an extension point
    NotImplemented,

    // Plumbing
    Serialization,
    Config,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::EmptyDataset => "ERR_EMPTY_DATASET",
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::Query => "ERR_QUERY",
            ExErrorKind::Auth => "ERR_AUTH",
            ExErrorKind::Network => "ERR_NETWORK",
            ExErrorKind::TopicNotFound => "ERR_TOPIC_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::HashMismatch => "ERR_HASH_MISMATCH",
            ExErrorKind::NotImplemented => "ERR_NOT_IMPLEMENTED",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Process exit code used by the CLI for this kind
    ///
    /// Transport failures (3) are kept distinct from verification outcomes
    /// (10 for a hash mismatch, 11 for a missing record or snapshot).
    pub fn exit_code(&self) -> i32 {
        match self {
            ExErrorKind::Internal | ExErrorKind::Serialization => 1,
            ExErrorKind::InvalidInput
            | ExErrorKind::EmptyDataset
            | ExErrorKind::Query
            | ExErrorKind::Config
            | ExErrorKind::AlreadyExists => 2,
            ExErrorKind::Connection
            | ExErrorKind::Auth
            | ExErrorKind::Network
            | ExErrorKind::TopicNotFound => 3,
            ExErrorKind::Io => 4,
            ExErrorKind::NotImplemented => 5,
            ExErrorKind::HashMismatch => 10,
            ExErrorKind::NotFound => 11,
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus the
/// operation and entity context needed to explain the failure to a human.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (dataset id, topic id, storage reference)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(entity_id) = &self.entity_id {
            write!(f, " ({})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised by the snapshot builder, identifiers and message codec
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PublisherError {
    /// Source file does not exist
    #[error("Source file not found: {path}")]
    SourceMissing { path: String },

    /// Source file exists but could not be read
    #[error("Source file could not be read: {path}: {reason}")]
    SourceUnreadable { path: String, reason: String },

    /// Source bytes are not UTF-8 text
    #[error("Source is not valid UTF-8: {origin}")]
    NotUtf8 { origin: String },

    /// CSV structure is broken (ragged rows, bad quoting)
    #[error("Malformed CSV in {origin}: {reason}")]
    MalformedCsv { origin: String, reason: String },

    /// Source has a header but no data rows
    #[error("Dataset has no data rows: {origin}")]
    EmptyDataset { origin: String },

    /// An identifier string did not parse
    #[error("Invalid {kind}: {value}")]
    InvalidIdentifier { kind: &'static str, value: String },

    /// Ledger payload is not a provenance message we understand
    #[error("Cannot decode provenance message: {reason}")]
    MessageDecode { reason: String },

    /// Ledger payload declares a newer schema than this build parses
    #[error("Unsupported provenance message schema version {v} (max {supported})")]
    UnsupportedSchemaVersion { v: u32, supported: u32 },

    /// JSON serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<PublisherError> for ExError {
    fn from(err: PublisherError) -> Self {
        let message = err.to_string();
        match err {
            PublisherError::SourceMissing { path } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("read_source")
                .with_entity_id(path)
                .with_message(message),
            PublisherError::SourceUnreadable { path, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("read_source")
                    .with_entity_id(path)
                    .with_message(message)
            }
            PublisherError::NotUtf8 { origin } | PublisherError::MalformedCsv { origin, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("parse_source")
                    .with_entity_id(origin)
                    .with_message(message)
            }
            PublisherError::EmptyDataset { origin } => ExError::new(ExErrorKind::EmptyDataset)
                .with_op("build_snapshot")
                .with_entity_id(origin)
                .with_message(message),
            PublisherError::InvalidIdentifier { value, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("parse_identifier")
                    .with_entity_id(value)
                    .with_message(message)
            }
            PublisherError::MessageDecode { .. }
            | PublisherError::UnsupportedSchemaVersion { .. } => {
                ExError::new(ExErrorKind::Serialization)
                    .with_op("decode_message")
                    .with_message(message)
            }
            PublisherError::Serialization(_) => ExError::new(ExErrorKind::Serialization)
                .with_message(message),
        }
    }
}

impl From<serde_json::Error> for PublisherError {
    fn from(err: serde_json::Error) -> Self {
        PublisherError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        PublisherError::from(err).into()
    }
}
