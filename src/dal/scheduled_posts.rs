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

//! DAL for the scheduled-post queue.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::debug;

use crate::civil;
use crate::database::schema::scheduled_posts;
use crate::error::DataError;
use crate::models::{NewScheduledPost, PostStatus, ScheduledPost};

use super::models::{album_to_json, NewSqliteScheduledPost, SqliteScheduledPost};
use super::Dal;

/// Queue operations for scheduled posts.
pub struct ScheduledPostsDal<'a> {
    pub(super) dal: &'a Dal,
}

impl ScheduledPostsDal<'_> {
    /// Enqueue a post. The payload is validated before anything is written;
    /// an invalid payload never reaches the database.
    pub async fn create(&self, new_post: NewScheduledPost) -> Result<ScheduledPost, DataError> {
        new_post.validate().map_err(DataError::Validation)?;

        let row = NewSqliteScheduledPost {
            channel_id: new_post.channel_id,
            user_id: new_post.user_id,
            text: new_post.text,
            media_type: new_post.media.as_ref().map(|m| m.kind.as_str().to_string()),
            media_file_id: new_post.media.map(|m| m.file_ref),
            album: album_to_json(&new_post.album)?,
            buttons: new_post.buttons,
            scheduled_time: civil::format(new_post.scheduled_time),
            delete_after: new_post.delete_after_seconds,
            status: PostStatus::Pending.as_str().to_string(),
        };

        let conn = self.dal.pool.get().await?;
        let inserted: SqliteScheduledPost = conn
            .interact(move |conn| {
                diesel::insert_into(scheduled_posts::table)
                    .values(&row)
                    .returning(SqliteScheduledPost::as_returning())
                    .get_result(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        debug!(
            post_id = inserted.id,
            channel_id = inserted.channel_id,
            scheduled_time = %inserted.scheduled_time,
            "Enqueued scheduled post"
        );
        inserted.try_into()
    }

    /// Fetch a single post by id.
    pub async fn get(&self, id: i64) -> Result<Option<ScheduledPost>, DataError> {
        let conn = self.dal.pool.get().await?;
        let row: Option<SqliteScheduledPost> = conn
            .interact(move |conn| {
                scheduled_posts::table
                    .find(id)
                    .select(SqliteScheduledPost::as_select())
                    .first(conn)
                    .optional()
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        row.map(TryInto::try_into).transpose()
    }

    /// All pending posts whose scheduled time is at or before `now`, oldest
    /// first. The TEXT `<=` comparison agrees with chronological order
    /// because every encoding the store has ever written shares the
    /// `YYYY-MM-DD HH:MM` prefix, with fields ordered most significant
    /// first; a shorter legacy row is a prefix of its full-second form and
    /// sorts no later than it.
    pub async fn due(&self, now: NaiveDateTime) -> Result<Vec<ScheduledPost>, DataError> {
        let cutoff = civil::format(now);
        let conn = self.dal.pool.get().await?;
        let rows: Vec<SqliteScheduledPost> = conn
            .interact(move |conn| {
                scheduled_posts::table
                    .filter(scheduled_posts::status.eq(PostStatus::Pending.as_str()))
                    .filter(scheduled_posts::scheduled_time.le(cutoff))
                    .order(scheduled_posts::scheduled_time.asc())
                    .select(SqliteScheduledPost::as_select())
                    .load(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Pending posts owned by `user_id`, soonest first.
    pub async fn list_pending_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ScheduledPost>, DataError> {
        let conn = self.dal.pool.get().await?;
        let rows: Vec<SqliteScheduledPost> = conn
            .interact(move |conn| {
                scheduled_posts::table
                    .filter(scheduled_posts::user_id.eq(user_id))
                    .filter(scheduled_posts::status.eq(PostStatus::Pending.as_str()))
                    .order(scheduled_posts::scheduled_time.asc())
                    .select(SqliteScheduledPost::as_select())
                    .load(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Move a post out of `pending`. The update is guarded on the current
    /// status, so transitions are monotonic: once a post is `published` or
    /// `error` no further call changes it, and repeating the same terminal
    /// set is a harmless no-op. Returns whether a row actually transitioned.
    pub async fn set_status(&self, id: i64, status: PostStatus) -> Result<bool, DataError> {
        let conn = self.dal.pool.get().await?;
        let updated = conn
            .interact(move |conn| {
                diesel::update(
                    scheduled_posts::table
                        .find(id)
                        .filter(scheduled_posts::status.eq(PostStatus::Pending.as_str())),
                )
                .set(scheduled_posts::status.eq(status.as_str()))
                .execute(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        if updated > 0 {
            debug!(post_id = id, status = status.as_str(), "Post status updated");
        }
        Ok(updated > 0)
    }

    /// Change the scheduled time of a still-pending post. Posts already
    /// published or failed are not rescheduled.
    pub async fn reschedule(
        &self,
        id: i64,
        new_time: NaiveDateTime,
    ) -> Result<bool, DataError> {
        let encoded = civil::format(new_time);
        let conn = self.dal.pool.get().await?;
        let updated = conn
            .interact(move |conn| {
                diesel::update(
                    scheduled_posts::table
                        .find(id)
                        .filter(scheduled_posts::status.eq(PostStatus::Pending.as_str())),
                )
                .set(scheduled_posts::scheduled_time.eq(encoded))
                .execute(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        Ok(updated > 0)
    }

    /// Replace the text of a still-pending post.
    pub async fn update_text(&self, id: i64, text: Option<String>) -> Result<bool, DataError> {
        let conn = self.dal.pool.get().await?;
        let updated = conn
            .interact(move |conn| {
                diesel::update(
                    scheduled_posts::table
                        .find(id)
                        .filter(scheduled_posts::status.eq(PostStatus::Pending.as_str())),
                )
                .set(scheduled_posts::text.eq(text))
                .execute(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        Ok(updated > 0)
    }

    /// Replace the raw button block of a still-pending post. `None` removes
    /// the buttons.
    pub async fn update_buttons(
        &self,
        id: i64,
        buttons: Option<String>,
    ) -> Result<bool, DataError> {
        let conn = self.dal.pool.get().await?;
        let updated = conn
            .interact(move |conn| {
                diesel::update(
                    scheduled_posts::table
                        .find(id)
                        .filter(scheduled_posts::status.eq(PostStatus::Pending.as_str())),
                )
                .set(scheduled_posts::buttons.eq(buttons))
                .execute(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        Ok(updated > 0)
    }

    /// Remove a post outright, whatever its status. Used when an operator
    /// cancels a pending post or clears out a failed one.
    pub async fn delete(&self, id: i64) -> Result<bool, DataError> {
        let conn = self.dal.pool.get().await?;
        let deleted = conn
            .interact(move |conn| {
                diesel::delete(scheduled_posts::table.find(id)).execute(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        Ok(deleted > 0)
    }
}
