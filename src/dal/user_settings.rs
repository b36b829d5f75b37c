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

//! DAL for per-user preferences.

use diesel::prelude::*;
use tracing::debug;

use crate::database::schema::users_settings;
use crate::error::DataError;
use crate::models::UserSettings;

use super::models::SqliteUserSettings;
use super::Dal;

/// Settings keys an operator may change. Anything else is rejected before
/// touching the database.
const SETTABLE_KEYS: [&str; 5] = [
    "formatting",
    "notifications",
    "link_preview",
    "default_reactions",
    "timezone",
];

/// Operations on per-user settings rows.
pub struct UserSettingsDal<'a> {
    pub(super) dal: &'a Dal,
}

impl UserSettingsDal<'_> {
    /// Fetch a user's settings, materializing the defaults row on first
    /// access. Every caller sees a complete settings object.
    pub async fn get_or_create(&self, user_id: i64) -> Result<UserSettings, DataError> {
        let conn = self.dal.pool.get().await?;
        let row: SqliteUserSettings = conn
            .interact(move |conn| {
                diesel::insert_into(users_settings::table)
                    .values(users_settings::user_id.eq(user_id))
                    .on_conflict(users_settings::user_id)
                    .do_nothing()
                    .execute(conn)?;
                users_settings::table
                    .find(user_id)
                    .select(SqliteUserSettings::as_select())
                    .first(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        Ok(row.into())
    }

    /// Set one settings field by name. The key must be one of the settable
    /// columns; boolean fields accept "1"/"true"/"on" as true and anything
    /// else as false.
    pub async fn update(
        &self,
        user_id: i64,
        key: &str,
        value: &str,
    ) -> Result<UserSettings, DataError> {
        if !SETTABLE_KEYS.contains(&key) {
            return Err(DataError::UnknownSettingKey(key.to_string()));
        }

        // The row must exist before a column update can land.
        self.get_or_create(user_id).await?;

        let key = key.to_string();
        let value = value.to_string();
        let conn = self.dal.pool.get().await?;
        let row: SqliteUserSettings = conn
            .interact(move |conn| {
                let target = users_settings::table.find(user_id);
                match key.as_str() {
                    "formatting" => diesel::update(target)
                        .set(users_settings::formatting.eq(value.as_str()))
                        .execute(conn)?,
                    "notifications" => diesel::update(target)
                        .set(users_settings::notifications.eq(flag(&value)))
                        .execute(conn)?,
                    "link_preview" => diesel::update(target)
                        .set(users_settings::link_preview.eq(flag(&value)))
                        .execute(conn)?,
                    "default_reactions" => diesel::update(target)
                        .set(users_settings::default_reactions.eq(non_empty(&value)))
                        .execute(conn)?,
                    "timezone" => diesel::update(target)
                        .set(users_settings::timezone.eq(value.as_str()))
                        .execute(conn)?,
                    _ => unreachable!("key checked against SETTABLE_KEYS"),
                };
                users_settings::table
                    .find(user_id)
                    .select(SqliteUserSettings::as_select())
                    .first(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        debug!(user_id, "User settings updated");
        Ok(row.into())
    }
}

fn flag(value: &str) -> i32 {
    matches!(value, "1" | "true" | "on") as i32
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
