use std::fmt;

// === StorageError ===

/// Errors related to the settings/stats store.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// Failed to serialize or deserialize a stored value.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === DomError ===

/// Errors related to document tree operations.
#[derive(Debug)]
pub enum DomError {
    /// The referenced node does not exist or has been removed.
    NodeNotFound(usize),
    /// The document body cannot be removed.
    CannotRemoveRoot,
    /// The referenced observer subscription does not exist.
    ObserverNotFound(usize),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::NodeNotFound(id) => write!(f, "Node not found: {}", id),
            DomError::CannotRemoveRoot => write!(f, "Cannot remove the document body"),
            DomError::ObserverNotFound(id) => write!(f, "Observer not found: {}", id),
        }
    }
}

impl std::error::Error for DomError {}

// === MessengerError ===

/// Errors related to the cross-context message protocol.
#[derive(Debug)]
pub enum MessengerError {
    /// The message carries an action no handler knows.
    UnknownAction(String),
    /// The action is known but the payload does not parse.
    MalformedMessage(String),
}

impl fmt::Display for MessengerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessengerError::UnknownAction(action) => write!(f, "Unknown action: {}", action),
            MessengerError::MalformedMessage(msg) => {
                write!(f, "Malformed message: {}", msg)
            }
        }
    }
}

impl std::error::Error for MessengerError {}

// === DownloadError ===

/// Errors related to download record management.
#[derive(Debug)]
pub enum DownloadError {
    /// Download with the given ID was not found.
    NotFound(String),
    /// The provided URL is empty or blank.
    InvalidUrl(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::NotFound(id) => write!(f, "Download not found: {}", id),
            DownloadError::InvalidUrl(url) => write!(f, "Invalid download URL: {:?}", url),
            DownloadError::DatabaseError(msg) => {
                write!(f, "Download database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DownloadError {}
