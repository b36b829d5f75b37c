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

use chrono::NaiveDateTime;

use super::payload::{MediaAttachment, PostPayload};
use super::AlbumItem;
use crate::error::ValidationError;

/// A named, reusable payload with no scheduling attributes. Publishing from
/// a template re-enters the same executor contract as any other post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub text: Option<String>,
    pub media: Option<MediaAttachment>,
    pub album: Vec<AlbumItem>,
    pub buttons: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Template {
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

/// A template about to be saved.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub user_id: i64,
    pub name: String,
    pub text: Option<String>,
    pub media: Option<MediaAttachment>,
    pub album: Vec<AlbumItem>,
    pub buttons: Option<String>,
}

impl NewTemplate {
    /// Templates obey the same payload invariants as scheduled posts.
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
