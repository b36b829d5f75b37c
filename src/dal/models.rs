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

//! SQLite row models.
//!
//! Diesel structs mirroring the physical schema: timestamps as TEXT,
//! booleans as INTEGER 0/1, albums as JSON TEXT. Conversion to domain types
//! happens here, once, and is fallible on purpose: a corrupt timestamp or
//! album column surfaces as a typed [`DataError`] instead of an arbitrary
//! substitute value.

use diesel::prelude::*;

use crate::civil;
use crate::database::schema::*;
use crate::error::DataError;
use crate::models::{
    AlbumItem, ChannelBinding, MediaAttachment, MediaKind, PostStat, PostStatus, ScheduledPost,
    Template, UserSettings,
};

// ============================================================================
// Scheduled Post Models
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = scheduled_posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SqliteScheduledPost {
    pub id: i64,
    pub channel_id: i64,
    pub user_id: i64,
    pub text: Option<String>,
    pub media_type: Option<String>,
    pub media_file_id: Option<String>,
    pub album: Option<String>,
    pub buttons: Option<String>,
    pub scheduled_time: String,
    pub delete_after: Option<i64>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = scheduled_posts)]
pub struct NewSqliteScheduledPost {
    pub channel_id: i64,
    pub user_id: i64,
    pub text: Option<String>,
    pub media_type: Option<String>,
    pub media_file_id: Option<String>,
    pub album: Option<String>,
    pub buttons: Option<String>,
    pub scheduled_time: String,
    pub delete_after: Option<i64>,
    pub status: String,
}

// ============================================================================
// Channel Models
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = channels)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SqliteChannel {
    pub id: i64,
    pub channel_id: i64,
    pub channel_username: Option<String>,
    pub channel_title: Option<String>,
    pub added_by: i64,
    pub added_at: String,
}

// ============================================================================
// User Settings Models
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users_settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SqliteUserSettings {
    pub user_id: i64,
    pub formatting: String,
    pub notifications: i32,
    pub link_preview: i32,
    pub default_reactions: Option<String>,
    pub timezone: String,
}

// ============================================================================
// Post Stats Models
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = posts_stats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SqlitePostStat {
    pub id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub posted_at: String,
    pub views: i64,
    pub reactions: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = posts_stats)]
pub struct NewSqlitePostStat {
    pub channel_id: i64,
    pub message_id: i64,
    pub posted_at: String,
}

// ============================================================================
// Template Models
// ============================================================================

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = templates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SqliteTemplate {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub text: Option<String>,
    pub media_type: Option<String>,
    pub media_file_id: Option<String>,
    pub album: Option<String>,
    pub buttons: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = templates)]
pub struct NewSqliteTemplate {
    pub user_id: i64,
    pub name: String,
    pub text: Option<String>,
    pub media_type: Option<String>,
    pub media_file_id: Option<String>,
    pub album: Option<String>,
    pub buttons: Option<String>,
}

// ============================================================================
// Conversion Utilities
// ============================================================================

/// Serialize album items for the `album` column. Empty albums persist as
/// NULL, matching rows written before album support existed.
pub fn album_to_json(items: &[AlbumItem]) -> Result<Option<String>, DataError> {
    if items.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(items)?))
    }
}

/// Decode the `album` column. NULL means "no album".
pub fn album_from_json(raw: Option<&str>) -> Result<Vec<AlbumItem>, DataError> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) if s.trim().is_empty() => Ok(Vec::new()),
        Some(s) => Ok(serde_json::from_str(s)?),
    }
}

/// Rebuild a single media attachment from its two columns. Either column
/// missing means no attachment.
fn media_from_columns(
    media_type: Option<&str>,
    media_file_id: Option<String>,
) -> Result<Option<MediaAttachment>, DataError> {
    match (media_type, media_file_id) {
        (Some(kind), Some(file_ref)) => {
            let kind = MediaKind::parse(kind).map_err(DataError::Validation)?;
            Ok(Some(MediaAttachment { kind, file_ref }))
        }
        _ => Ok(None),
    }
}

// ============================================================================
// Conversion Implementations: SQLite models -> Domain models
// ============================================================================

impl TryFrom<SqliteScheduledPost> for ScheduledPost {
    type Error = DataError;

    fn try_from(s: SqliteScheduledPost) -> Result<Self, DataError> {
        Ok(ScheduledPost {
            id: s.id,
            channel_id: s.channel_id,
            user_id: s.user_id,
            media: media_from_columns(s.media_type.as_deref(), s.media_file_id)?,
            album: album_from_json(s.album.as_deref())?,
            text: s.text,
            buttons: s.buttons,
            scheduled_time: civil::parse(&s.scheduled_time)?,
            delete_after_seconds: s.delete_after,
            status: PostStatus::parse(&s.status).ok_or(DataError::UnknownStatus(s.status))?,
            created_at: civil::parse(&s.created_at)?,
        })
    }
}

impl TryFrom<SqliteChannel> for ChannelBinding {
    type Error = DataError;

    fn try_from(s: SqliteChannel) -> Result<Self, DataError> {
        Ok(ChannelBinding {
            channel_id: s.channel_id,
            username: s.channel_username,
            title: s.channel_title,
            added_by: s.added_by,
            added_at: civil::parse(&s.added_at)?,
        })
    }
}

impl From<SqliteUserSettings> for UserSettings {
    fn from(s: SqliteUserSettings) -> Self {
        UserSettings {
            user_id: s.user_id,
            formatting: s.formatting,
            notifications: s.notifications != 0,
            link_preview: s.link_preview != 0,
            default_reactions: s.default_reactions,
            timezone: s.timezone,
        }
    }
}

impl TryFrom<SqlitePostStat> for PostStat {
    type Error = DataError;

    fn try_from(s: SqlitePostStat) -> Result<Self, DataError> {
        Ok(PostStat {
            id: s.id,
            channel_id: s.channel_id,
            message_id: s.message_id,
            posted_at: civil::parse(&s.posted_at)?,
            views: s.views,
            reactions: s.reactions,
        })
    }
}

impl TryFrom<SqliteTemplate> for Template {
    type Error = DataError;

    fn try_from(s: SqliteTemplate) -> Result<Self, DataError> {
        Ok(Template {
            id: s.id,
            user_id: s.user_id,
            name: s.name,
            media: media_from_columns(s.media_type.as_deref(), s.media_file_id)?,
            album: album_from_json(s.album.as_deref())?,
            text: s.text,
            buttons: s.buttons,
            created_at: civil::parse(&s.created_at)?,
        })
    }
}
