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

//! SQLite connection management.
//!
//! An async connection pool built on `deadpool-diesel`. The database file is
//! bootstrapped in place with `CREATE TABLE IF NOT EXISTS` DDL; databases
//! created before album support gain the `album` column through an additive
//! migration on startup.

use deadpool_diesel::sqlite::{Manager, Pool, Runtime};
use diesel::prelude::*;
use tracing::{debug, info};

use crate::error::DataError;

/// Statements run on every startup. Idempotent by construction.
const BOOTSTRAP_DDL: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS channels (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        channel_id INTEGER UNIQUE NOT NULL,
        channel_username TEXT,
        channel_title TEXT,
        added_by INTEGER NOT NULL,
        added_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users_settings (
        user_id INTEGER PRIMARY KEY,
        formatting TEXT NOT NULL DEFAULT 'HTML',
        notifications INTEGER NOT NULL DEFAULT 0,
        link_preview INTEGER NOT NULL DEFAULT 1,
        default_reactions TEXT,
        timezone TEXT NOT NULL DEFAULT 'Europe/Moscow'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS scheduled_posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        channel_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        text TEXT,
        media_type TEXT,
        media_file_id TEXT,
        album TEXT,
        buttons TEXT,
        scheduled_time TEXT NOT NULL,
        delete_after INTEGER,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts_stats (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        channel_id INTEGER NOT NULL,
        message_id INTEGER NOT NULL,
        posted_at TEXT NOT NULL,
        views INTEGER NOT NULL DEFAULT 0,
        reactions TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS templates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        text TEXT,
        media_type TEXT,
        media_file_id TEXT,
        album TEXT,
        buttons TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
];

/// Additive migrations for databases created before the column existed.
/// "duplicate column name" failures mean the column is already there.
const ADDITIVE_MIGRATIONS: [&str; 2] = [
    "ALTER TABLE scheduled_posts ADD COLUMN album TEXT",
    "ALTER TABLE templates ADD COLUMN album TEXT",
];

/// Handle to the SQLite database: an async pool plus schema bootstrap.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Open (or create) the database at `path` with a pool of `pool_size`
    /// connections, and bring the schema up to date.
    pub async fn new(path: &str, pool_size: usize) -> Result<Self, DataError> {
        info!("Opening database at {}", path);
        let manager = Manager::new(path, Runtime::Tokio1);
        let pool = Pool::builder(manager)
            .max_size(pool_size)
            .build()
            .map_err(|e| DataError::ConnectionPool(e.to_string()))?;

        let db = Self { pool };
        db.initialize_schema().await?;
        Ok(db)
    }

    /// The underlying pool, for the DAL.
    pub fn pool(&self) -> Pool {
        self.pool.clone()
    }

    async fn initialize_schema(&self) -> Result<(), DataError> {
        debug!("Initializing database schema");
        let conn = self.pool.get().await?;

        conn.interact(|conn| -> QueryResult<()> {
            for ddl in BOOTSTRAP_DDL {
                diesel::sql_query(ddl).execute(conn)?;
            }
            Ok(())
        })
        .await
        .map_err(|e| DataError::ConnectionPool(e.to_string()))??;

        // Pre-album databases get the column added; everyone else hits the
        // duplicate-column error, which is the success case here.
        for migration in ADDITIVE_MIGRATIONS {
            let outcome = conn
                .interact(move |conn| diesel::sql_query(migration).execute(conn))
                .await
                .map_err(|e| DataError::ConnectionPool(e.to_string()))?;
            match outcome {
                Ok(_) => info!("Applied additive migration: {}", migration),
                Err(e) if e.to_string().contains("duplicate column name") => {}
                Err(e) => return Err(e.into()),
            }
        }

        debug!("Database schema initialization complete");
        Ok(())
    }
}
