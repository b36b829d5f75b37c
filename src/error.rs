/*
 *  Copyright 2025 Telepost Contributors
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Error types used across the crate.
//!
//! Each boundary gets its own enum:
//! - [`ValidationError`] - payload rejected before it ever reaches the store
//! - [`DataError`] - store-level failures (pool, queries, corrupt rows)
//! - [`MessengerError`] - raw failures from the messaging backend client
//! - [`PublishError`] - the executor's classified terminal outcome

use thiserror::Error;

/// Rejection of a post payload at the producing boundary.
///
/// Invalid payloads are never persisted; the scheduling core assumes every
/// stored job already passed these checks.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A post with no text, no media and no album carries nothing to publish.
    #[error("post payload is empty: no text, media or album")]
    EmptyPayload,

    /// Albums are grouped sends of 2 to 10 items.
    #[error("album must contain 2 to 10 items, got {0}")]
    AlbumSize(usize),

    /// Single media and an album are mutually exclusive primary content.
    #[error("post cannot carry both a single media item and an album")]
    MediaAndAlbum,

    /// Unknown media kind tag in a payload or stored row.
    #[error("unknown media kind: {0}")]
    UnknownMediaKind(String),
}

/// Failure to interpret a persisted civil timestamp.
///
/// The store has accumulated three textual encodings over its lifetime; a
/// value matching none of them is surfaced, never silently replaced with the
/// current time.
#[derive(Debug, Error)]
#[error("unparseable civil timestamp: {value:?}")]
pub struct TimeParseError {
    /// The raw text that matched none of the known encodings.
    pub value: String,
}

/// Store-level failures.
#[derive(Debug, Error)]
pub enum DataError {
    /// Failed to obtain or use a pooled connection.
    #[error("connection pool error: {0}")]
    ConnectionPool(String),

    /// Query-level failure from the database.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Defense against unconstrained setting names reaching the store.
    #[error("unknown user setting key: {0}")]
    UnknownSettingKey(String),

    /// A persisted timestamp matched none of the known encodings.
    #[error(transparent)]
    CorruptTimestamp(#[from] TimeParseError),

    /// The album column held JSON that does not decode to album items.
    #[error("corrupt album payload: {0}")]
    CorruptAlbum(#[from] serde_json::Error),

    /// A persisted status string outside the known state machine.
    #[error("unknown post status: {0}")]
    UnknownStatus(String),

    /// Payload rejected before persistence.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<deadpool_diesel::PoolError> for DataError {
    fn from(e: deadpool_diesel::PoolError) -> Self {
        DataError::ConnectionPool(e.to_string())
    }
}

impl From<deadpool_diesel::InteractError> for DataError {
    fn from(e: deadpool_diesel::InteractError) -> Self {
        DataError::ConnectionPool(e.to_string())
    }
}

/// Raw failure reported by the messaging backend client.
#[derive(Debug, Clone, Error)]
pub enum MessengerError {
    /// The backend rejected the request and described why.
    #[error("backend api error: {description}")]
    Api {
        /// Error text as returned by the backend.
        description: String,
    },

    /// The request never produced a backend response.
    #[error("network error: {0}")]
    Network(String),
}

/// Terminal outcome of a publish attempt, after retry accounting.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Transient failures exhausted the retry budget; carries the last
    /// error text the backend returned.
    #[error("publish failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Attempts consumed, including the first.
        attempts: u32,
        /// Backend error text from the final attempt.
        last_error: String,
    },

    /// The bot's channel access itself is broken; retrying is futile.
    #[error("permanent delivery failure: {reason}")]
    Permanent {
        /// Backend error text that triggered the classification.
        reason: String,
        /// User-facing remediation hint.
        remediation: &'static str,
    },

    /// Stats bookkeeping failed after a successful send.
    #[error(transparent)]
    Data(#[from] DataError),
}

impl PublishError {
    /// Whether the failure is permanent (channel access broken).
    pub fn is_permanent(&self) -> bool {
        matches!(self, PublishError::Permanent { .. })
    }

    /// User-facing description of the failure, with remediation when known.
    pub fn user_message(&self) -> String {
        match self {
            PublishError::Permanent { remediation, .. } => {
                format!("publication failed: channel access lost, {}", remediation)
            }
            PublishError::RetriesExhausted { last_error, .. } => {
                format!("publication failed: {}", last_error)
            }
            PublishError::Data(e) => format!("publication failed: {}", e),
        }
    }
}
