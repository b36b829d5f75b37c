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

//! Data Access Layer.
//!
//! One accessor struct per table, each borrowing the shared connection pool.
//! All methods are async, run their Diesel queries on the pool's blocking
//! executor, and hand back domain types only; SQLite row models never leave
//! this module.
//!
//! # Example
//!
//! ```rust,ignore
//! let database = Database::new("telepost.db", 5).await?;
//! let dal = Dal::new(&database);
//! let due = dal.scheduled_posts().due(civil::now(tz)).await?;
//! ```

pub mod channels;
pub mod models;
pub mod post_stats;
pub mod scheduled_posts;
pub mod templates;
pub mod user_settings;

use deadpool_diesel::sqlite::Pool;

use crate::database::Database;

use channels::ChannelsDal;
use post_stats::PostStatsDal;
use scheduled_posts::ScheduledPostsDal;
use templates::TemplatesDal;
use user_settings::UserSettingsDal;

/// Entry point to all persistence operations.
#[derive(Clone)]
pub struct Dal {
    pub(crate) pool: Pool,
}

impl Dal {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool(),
        }
    }

    /// The scheduled-post queue.
    pub fn scheduled_posts(&self) -> ScheduledPostsDal<'_> {
        ScheduledPostsDal { dal: self }
    }

    /// Channel bindings.
    pub fn channels(&self) -> ChannelsDal<'_> {
        ChannelsDal { dal: self }
    }

    /// Per-user preferences.
    pub fn user_settings(&self) -> UserSettingsDal<'_> {
        UserSettingsDal { dal: self }
    }

    /// Reusable post templates.
    pub fn templates(&self) -> TemplatesDal<'_> {
        TemplatesDal { dal: self }
    }

    /// Publication bookkeeping.
    pub fn post_stats(&self) -> PostStatsDal<'_> {
        PostStatsDal { dal: self }
    }
}
