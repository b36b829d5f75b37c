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

use chrono::NaiveDateTime;

/// Append-only record of a published message. Created exactly once per
/// successful publish; never mutated or deleted by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostStat {
    pub id: i64,
    pub channel_id: i64,
    pub message_id: i64,
    pub posted_at: NaiveDateTime,
    /// Reserved; populated by external collectors, not by the core.
    pub views: i64,
    /// Reserved; populated by external collectors, not by the core.
    pub reactions: Option<String>,
}
