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

//! Typed domain records.
//!
//! These are the types the rest of the crate works with; row structs live in
//! the DAL and are converted here exactly once, at the store boundary.

pub mod channel;
pub mod payload;
pub mod post_stat;
pub mod scheduled_post;
pub mod settings;
pub mod template;

pub use channel::ChannelBinding;
pub use payload::{AlbumItem, MediaAttachment, MediaKind, PostPayload, SendOptions};
pub use post_stat::PostStat;
pub use scheduled_post::{NewScheduledPost, PostStatus, ScheduledPost};
pub use settings::UserSettings;
pub use template::{NewTemplate, Template};
