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

//! The scheduled post: the central entity of the deferred-publication queue.

use chrono::NaiveDateTime;

use super::payload::{MediaAttachment, PostPayload};
use super::AlbumItem;
use crate::error::ValidationError;

/// Lifecycle state of a scheduled post.
///
/// Transitions are monotonic: a post leaves `Pending` exactly once, into one
/// of the terminal states, and never returns. `scheduled_time` is meaningful
/// only while the post is `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostStatus {
    /// Waiting for its scheduled time.
    Pending,
    /// Delivered to the channel; a stats row exists for the sent message.
    Published,
    /// Delivery failed terminally; requires operator action (resend as a
    /// fresh post, or deletion). The loop never re-polls this state.
    Error,
}

impl PostStatus {
    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Pending => "pending",
            PostStatus::Published => "published",
            PostStatus::Error => "error",
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PostStatus::Pending),
            "published" => Some(PostStatus::Published),
            "error" => Some(PostStatus::Error),
            _ => None,
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(self) -> bool {
        !matches!(self, PostStatus::Pending)
    }
}

/// A persisted request to publish a specific payload to a specific channel
/// at a specific civil time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledPost {
    /// Opaque integer id, assigned by the store at creation.
    pub id: i64,
    /// Target channel.
    pub channel_id: i64,
    /// Owning operator; notified about the publish outcome.
    pub user_id: i64,
    /// Post text, or caption when media is present.
    pub text: Option<String>,
    /// Single media attachment, if any.
    pub media: Option<MediaAttachment>,
    /// Album items, if this is a grouped post. Empty when not an album.
    pub album: Vec<AlbumItem>,
    /// Raw button block in the mini-language, if any.
    pub buttons: Option<String>,
    /// Civil timestamp in the fixed operating timezone; never UTC-tagged.
    pub scheduled_time: NaiveDateTime,
    /// Delete the published message this many seconds after publishing.
    pub delete_after_seconds: Option<i64>,
    /// Lifecycle state.
    pub status: PostStatus,
    /// Creation timestamp (civil).
    pub created_at: NaiveDateTime,
}

impl ScheduledPost {
    /// Content payload as the executor consumes it.
    pub fn payload(&self) -> PostPayload {
        PostPayload {
            text: self.text.clone(),
            media: self.media.clone(),
            album: self.album.clone(),
            buttons: self.buttons.clone(),
        }
    }
}

/// A scheduled post about to be enqueued.
#[derive(Debug, Clone)]
pub struct NewScheduledPost {
    pub channel_id: i64,
    pub user_id: i64,
    pub text: Option<String>,
    pub media: Option<MediaAttachment>,
    pub album: Vec<AlbumItem>,
    pub buttons: Option<String>,
    pub scheduled_time: NaiveDateTime,
    pub delete_after_seconds: Option<i64>,
}

impl NewScheduledPost {
    /// Validate the content payload before persistence. The store calls this
    /// on enqueue; nothing invalid is ever written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        PostPayload {
            text: self.text.clone(),
            media: self.media.clone(),
            album: self.album.clone(),
            buttons: self.buttons.clone(),
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [PostStatus::Pending, PostStatus::Published, PostStatus::Error] {
            assert_eq!(PostStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PostStatus::parse("archived"), None);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!PostStatus::Pending.is_terminal());
        assert!(PostStatus::Published.is_terminal());
        assert!(PostStatus::Error.is_terminal());
    }
}
