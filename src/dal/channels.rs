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

//! DAL for channel bindings.

use diesel::prelude::*;
use tracing::info;

use crate::database::schema::channels;
use crate::error::DataError;
use crate::models::ChannelBinding;

use super::models::SqliteChannel;
use super::Dal;

/// Operations on the set of channels the assistant can publish to.
pub struct ChannelsDal<'a> {
    pub(super) dal: &'a Dal,
}

impl ChannelsDal<'_> {
    /// Bind a channel, or refresh its username/title if it is already bound.
    /// `channel_id` is the natural key; re-adding never duplicates.
    pub async fn upsert(
        &self,
        channel_id: i64,
        username: Option<String>,
        title: Option<String>,
        added_by: i64,
    ) -> Result<ChannelBinding, DataError> {
        let conn = self.dal.pool.get().await?;
        let row: SqliteChannel = conn
            .interact(move |conn| {
                diesel::insert_into(channels::table)
                    .values((
                        channels::channel_id.eq(channel_id),
                        channels::channel_username.eq(username.as_deref()),
                        channels::channel_title.eq(title.as_deref()),
                        channels::added_by.eq(added_by),
                    ))
                    .on_conflict(channels::channel_id)
                    .do_update()
                    .set((
                        channels::channel_username.eq(username.as_deref()),
                        channels::channel_title.eq(title.as_deref()),
                    ))
                    .returning(SqliteChannel::as_returning())
                    .get_result(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        info!(channel_id, added_by, "Channel binding stored");
        row.try_into()
    }

    /// Look up a binding by channel id.
    pub async fn get(&self, channel_id: i64) -> Result<Option<ChannelBinding>, DataError> {
        let conn = self.dal.pool.get().await?;
        let row: Option<SqliteChannel> = conn
            .interact(move |conn| {
                channels::table
                    .filter(channels::channel_id.eq(channel_id))
                    .select(SqliteChannel::as_select())
                    .first(conn)
                    .optional()
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        row.map(TryInto::try_into).transpose()
    }

    /// All bindings, optionally restricted to those added by one operator.
    pub async fn list(&self, added_by: Option<i64>) -> Result<Vec<ChannelBinding>, DataError> {
        let conn = self.dal.pool.get().await?;
        let rows: Vec<SqliteChannel> = conn
            .interact(move |conn| {
                let mut query = channels::table
                    .select(SqliteChannel::as_select())
                    .order(channels::added_at.asc())
                    .into_boxed();
                if let Some(user_id) = added_by {
                    query = query.filter(channels::added_by.eq(user_id));
                }
                query.load(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Unbind a channel. Scheduled posts targeting it are left alone; they
    /// fail at publish time with a remediation message instead.
    pub async fn remove(&self, channel_id: i64) -> Result<bool, DataError> {
        let conn = self.dal.pool.get().await?;
        let deleted = conn
            .interact(move |conn| {
                diesel::delete(channels::table.filter(channels::channel_id.eq(channel_id)))
                    .execute(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        if deleted > 0 {
            info!(channel_id, "Channel binding removed");
        }
        Ok(deleted > 0)
    }
}
