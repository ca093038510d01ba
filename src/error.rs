use uuid::Uuid;

/// Which half of the codec a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRole {
    Encoder,
    Decoder,
}

impl std::fmt::Display for SessionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionRole::Encoder => write!(f, "encoder"),
            SessionRole::Decoder => write!(f, "decoder"),
        }
    }
}

/// Error type for all codec operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A session parameter was zero or otherwise invalid at creation.
    InvalidConfig { parameter: &'static str },
    /// The identifier has no active session of the required role.
    UnknownSession { id: Uuid, role: SessionRole },
    /// Channel-count disagreement between supplied data (or a message's
    /// declared schema) and the session configuration.
    SchemaMismatch { expected: usize, actual: usize },
    /// Structurally invalid, truncated, or non-monotonic message data.
    MalformedMessage { reason: &'static str },
    /// A retrieval index is beyond the stored dataset's bounds.
    IndexOutOfRange { index: usize, len: usize },
    /// Retrieval was attempted before any successful decode.
    NoData,
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::InvalidConfig { parameter } => {
                write!(f, "invalid session configuration: {parameter} must be positive")
            }
            CodecError::UnknownSession { id, role } => {
                write!(f, "no active {role} session for id {id}")
            }
            CodecError::SchemaMismatch { expected, actual } => {
                write!(f, "channel count mismatch: expected {expected}, got {actual}")
            }
            CodecError::MalformedMessage { reason } => {
                write!(f, "malformed message: {reason}")
            }
            CodecError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for dataset of length {len}")
            }
            CodecError::NoData => write!(f, "no dataset has been decoded yet"),
        }
    }
}

impl std::error::Error for CodecError {}
