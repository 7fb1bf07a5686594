//! Error types
//!
//! Only persistence can fail. Rejected lifecycle actions are silent no-ops and
//! never surface here.

/// Errors raised by a [`ScoreStore`](crate::persistence::ScoreStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("i/o error on score key {key}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed score record {key}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            reason: reason.into(),
        }
    }
}
