//! Error types for the content store, webhooks, and session storage.
//!
//! Library code returns these typed errors so callers can tell a missing
//! record apart from a broken network. The `hub` binary wraps them in
//! `anyhow` with context.

use thiserror::Error;

/// Result alias for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by [`DocumentStore`](crate::store::DocumentStore) backends
/// and the generic [`DataService`](crate::store::DataService).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote store returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("failed to decode {collection} record: {source}")]
    Decode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed response from store: {0}")]
    Malformed(String),

    #[error("invalid store URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True when the requested record id is absent from its collection.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Errors raised while calling an outbound webhook.
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook returned status {0}")]
    Status(u16),

    #[error("webhook response was not valid JSON: {0}")]
    Decode(String),
}

/// Errors raised by session token storage.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Contact form fields rejected before submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_record() {
        let err = StoreError::NotFound {
            collection: "blogposts".into(),
            id: "abc".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "record not found: blogposts/abc");
    }

    #[test]
    fn test_remote_error_is_not_not_found() {
        let err = StoreError::Remote {
            status: 500,
            body: "boom".into(),
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_contact_error_messages() {
        assert_eq!(
            ContactError::MissingField("name").to_string(),
            "name must not be empty"
        );
        assert_eq!(
            ContactError::InvalidEmail("nope".into()).to_string(),
            "invalid email address: nope"
        );
    }
}
