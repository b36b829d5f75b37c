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

//! # Telepost
//!
//! A channel-publishing assistant core: a persistent scheduled-post queue,
//! a polling scheduler, and a publication executor with bounded retry,
//! backed by SQLite.
//!
//! ## Architecture
//!
//! - **Queue** ([`dal`]): scheduled posts live in SQLite with a three-state
//!   lifecycle (`pending` → `published` | `error`). Transitions are guarded
//!   in the store itself and are monotonic.
//! - **Scheduler** ([`scheduler`]): a fixed-interval polling loop. Each tick
//!   it fetches posts whose civil timestamp has arrived and drives them
//!   through the executor, isolating per-post failures.
//! - **Executor** ([`executor`]): dispatches a payload by content shape
//!   (text, single media, album), retries transient backend failures within
//!   a bounded budget, aborts instantly on loss of channel access, and
//!   records exactly one stats row per successful send.
//! - **Messenger seam** ([`messenger`]): the one trait the core needs from
//!   the chat platform. Tests script it; production wires in a real client.
//!
//! ## Time model
//!
//! All timestamps are naive civil times in one fixed operating timezone
//! ([`civil`]). The store has accumulated three textual encodings over its
//! lifetime; all three parse, and values matching none of them surface as
//! typed errors rather than being silently replaced.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use telepost::{AppConfig, Database, Dal, Scheduler};
//!
//! let config = AppConfig::from_env()?;
//! let database = Database::new(&config.database_path, config.pool_size).await?;
//! let dal = Dal::new(&database);
//! let scheduler = Scheduler::new(dal, client, config.scheduler_config());
//! let handle = scheduler.start();
//! // ... on shutdown:
//! handle.shutdown().await;
//! ```

pub mod buttons;
pub mod civil;
pub mod config;
pub mod dal;
pub mod database;
pub mod error;
pub mod executor;
pub mod logging;
pub mod messenger;
pub mod models;
pub mod retry;
pub mod scheduler;

pub use buttons::{parse_url_buttons, Keyboard, UrlButton};
pub use config::AppConfig;
pub use dal::Dal;
pub use database::Database;
pub use error::{DataError, MessengerError, PublishError, TimeParseError, ValidationError};
pub use executor::Publisher;
pub use logging::init_logging;
pub use messenger::{MessageRef, MessengerClient};
pub use models::{
    AlbumItem, ChannelBinding, MediaAttachment, MediaKind, NewScheduledPost, NewTemplate,
    PostPayload, PostStat, PostStatus, ScheduledPost, SendOptions, Template, UserSettings,
};
pub use retry::RetryPolicy;
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerHandle};
