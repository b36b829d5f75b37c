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

//! DAL for reusable post templates.

use diesel::prelude::*;
use tracing::debug;

use crate::database::schema::templates;
use crate::error::DataError;
use crate::models::{NewTemplate, Template};

use super::models::{album_to_json, NewSqliteTemplate, SqliteTemplate};
use super::Dal;

/// Operations on saved templates.
pub struct TemplatesDal<'a> {
    pub(super) dal: &'a Dal,
}

impl TemplatesDal<'_> {
    /// Save a template. Same payload validation as the scheduled-post queue.
    pub async fn create(&self, new_template: NewTemplate) -> Result<Template, DataError> {
        new_template.validate().map_err(DataError::Validation)?;

        let row = NewSqliteTemplate {
            user_id: new_template.user_id,
            name: new_template.name,
            text: new_template.text,
            media_type: new_template
                .media
                .as_ref()
                .map(|m| m.kind.as_str().to_string()),
            media_file_id: new_template.media.map(|m| m.file_ref),
            album: album_to_json(&new_template.album)?,
            buttons: new_template.buttons,
        };

        let conn = self.dal.pool.get().await?;
        let inserted: SqliteTemplate = conn
            .interact(move |conn| {
                diesel::insert_into(templates::table)
                    .values(&row)
                    .returning(SqliteTemplate::as_returning())
                    .get_result(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        debug!(template_id = inserted.id, user_id = inserted.user_id, "Template saved");
        inserted.try_into()
    }

    /// Fetch a template by id.
    pub async fn get(&self, id: i64) -> Result<Option<Template>, DataError> {
        let conn = self.dal.pool.get().await?;
        let row: Option<SqliteTemplate> = conn
            .interact(move |conn| {
                templates::table
                    .find(id)
                    .select(SqliteTemplate::as_select())
                    .first(conn)
                    .optional()
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        row.map(TryInto::try_into).transpose()
    }

    /// A user's templates, newest first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Template>, DataError> {
        let conn = self.dal.pool.get().await?;
        let rows: Vec<SqliteTemplate> = conn
            .interact(move |conn| {
                templates::table
                    .filter(templates::user_id.eq(user_id))
                    .order(templates::id.desc())
                    .select(SqliteTemplate::as_select())
                    .load(conn)
            })
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Delete a template.
    pub async fn delete(&self, id: i64) -> Result<bool, DataError> {
        let conn = self.dal.pool.get().await?;
        let deleted = conn
            .interact(move |conn| diesel::delete(templates::table.find(id)).execute(conn))
            .await
            .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        Ok(deleted > 0)
    }
}
