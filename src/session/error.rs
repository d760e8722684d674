use thiserror::Error;

/// A read or write against the storage collaborator failed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot open {location}: {source}")]
    Open {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {location}: {source}")]
    Write {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{location} is not valid UTF-8 text")]
    InvalidUtf8 { location: String },
}

/// A save-as target was rejected before any write happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{location} is not a markdown file (expected a .md extension)")]
    NotMarkdown { location: String },
}

/// Failure of an editor session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no file is associated with this document yet; use Save as")]
    NotAssociated,
}

/// Session result
pub type SessionResult<T> = Result<T, SessionError>;
