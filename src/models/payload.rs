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

//! Executor-facing post payload and send options.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Smallest album the backend will group.
pub const ALBUM_MIN_ITEMS: usize = 2;
/// Largest album the backend will group.
pub const ALBUM_MAX_ITEMS: usize = 10;

/// Kind tag for a media reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

impl MediaKind {
    /// Storage representation of the kind tag.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }

    /// Parse a stored kind tag.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "photo" => Ok(MediaKind::Photo),
            "video" => Ok(MediaKind::Video),
            "document" => Ok(MediaKind::Document),
            other => Err(ValidationError::UnknownMediaKind(other.to_string())),
        }
    }
}

/// A single media reference with its kind tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    /// Opaque file reference understood by the messaging backend.
    pub file_ref: String,
}

/// One item of an album, as persisted in the `album` JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub file_ref: String,
}

/// Fully-resolved content of one post, as handed to the executor.
///
/// Exactly one of {plain text, single media, album} is the primary content;
/// text doubles as the caption when media is present. Buttons stay in their
/// raw mini-language form so stored jobs and templates round-trip byte-exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPayload {
    pub text: Option<String>,
    pub media: Option<MediaAttachment>,
    pub album: Vec<AlbumItem>,
    pub buttons: Option<String>,
}

impl PostPayload {
    /// Plain-text payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Validate the payload invariants enforced at the producing boundary.
    ///
    /// The executor itself does not re-validate; nothing invalid may reach
    /// the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.media.is_some() && !self.album.is_empty() {
            return Err(ValidationError::MediaAndAlbum);
        }
        if !self.album.is_empty()
            && !(ALBUM_MIN_ITEMS..=ALBUM_MAX_ITEMS).contains(&self.album.len())
        {
            return Err(ValidationError::AlbumSize(self.album.len()));
        }
        let has_text = self.text.as_deref().is_some_and(|t| !t.trim().is_empty());
        if !has_text && self.media.is_none() && self.album.is_empty() {
            return Err(ValidationError::EmptyPayload);
        }
        Ok(())
    }
}

/// Delivery flags resolved from the owner's settings at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    /// Text formatting mode understood by the backend (e.g. `HTML`).
    pub parse_mode: String,
    /// Deliver without a notification sound.
    pub silent: bool,
    /// Disable link previews on plain-text posts.
    pub suppress_link_preview: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            parse_mode: "HTML".to_string(),
            silent: true,
            suppress_link_preview: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(n: usize) -> Vec<AlbumItem> {
        (0..n)
            .map(|i| AlbumItem {
                kind: MediaKind::Photo,
                file_ref: format!("file-{i}"),
            })
            .collect()
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(
            PostPayload::default().validate(),
            Err(ValidationError::EmptyPayload)
        ));
        assert!(matches!(
            PostPayload::text("   ").validate(),
            Err(ValidationError::EmptyPayload)
        ));
    }

    #[test]
    fn album_bounds_are_enforced() {
        for n in [1, 11] {
            let payload = PostPayload {
                album: album(n),
                ..PostPayload::default()
            };
            assert!(matches!(
                payload.validate(),
                Err(ValidationError::AlbumSize(size)) if size == n
            ));
        }
        for n in [2, 10] {
            let payload = PostPayload {
                album: album(n),
                ..PostPayload::default()
            };
            assert!(payload.validate().is_ok());
        }
    }

    #[test]
    fn media_and_album_are_mutually_exclusive() {
        let payload = PostPayload {
            media: Some(MediaAttachment {
                kind: MediaKind::Video,
                file_ref: "v".into(),
            }),
            album: album(2),
            ..PostPayload::default()
        };
        assert!(matches!(
            payload.validate(),
            Err(ValidationError::MediaAndAlbum)
        ));
    }

    #[test]
    fn album_items_serialize_with_type_tag() {
        let json = serde_json::to_string(&album(2)).unwrap();
        assert!(json.contains(r#""type":"photo""#));
        let back: Vec<AlbumItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, album(2));
    }
}
