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

/// Association between an operator and a channel they administer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBinding {
    /// Backend channel identifier.
    pub channel_id: i64,
    /// Public handle, when the channel has one.
    pub username: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// Operator who connected the channel.
    pub added_by: i64,
    pub added_at: NaiveDateTime,
}

impl ChannelBinding {
    /// Best available display name for listings.
    pub fn display_name(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| self.channel_id.to_string())
    }
}
