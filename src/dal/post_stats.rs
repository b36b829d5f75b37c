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

//! DAL for publication bookkeeping.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::civil;
use crate::database::schema::posts_stats;
use crate::error::DataError;
use crate::models::PostStat;

use super::models::{NewSqlitePostStat, SqlitePostStat};
use super::Dal;

/// Operations on the per-publication stats log.
pub struct PostStatsDal<'a> {
    pub(super) dal: &'a Dal,
}

impl PostStatsDal<'_> {
    /// Record one successful publication. The executor writes this row
    /// before the queue flips the post's status, so a crash between the two
    /// leaves the post pending and re-processable rather than lost.
    pub async fn record(
        &self,
        channel_id: i64,
        message_id: i64,
        posted_at: NaiveDateTime,
    ) -> Result<PostStat, DataError> {
        let row = NewSqlitePostStat {
            channel_id,
            message_id,
            posted_at: civil::format(posted_at),
        };

        let conn = self.dal.pool.get().await?;
        let inserted: SqlitePostStat = conn
            .interact(move |conn| {
                diesel::insert_into(posts_stats::table)
                    .values(&row)
                    .returning(SqlitePostStat::as_returning())
                    .get_result(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        inserted.try_into()
    }

    /// The most recent publications for a channel, newest first.
    pub async fn recent(&self, channel_id: i64, limit: i64) -> Result<Vec<PostStat>, DataError> {
        let conn = self.dal.pool.get().await?;
        let rows: Vec<SqlitePostStat> = conn
            .interact(move |conn| {
                posts_stats::table
                    .filter(posts_stats::channel_id.eq(channel_id))
                    .order(posts_stats::id.desc())
                    .limit(limit)
                    .select(SqlitePostStat::as_select())
                    .load(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
