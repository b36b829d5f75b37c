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

use super::payload::SendOptions;

/// Per-operator preferences, created lazily with these defaults on first
/// access. One row per user; there is no deletion path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    pub user_id: i64,
    /// Text-formatting mode passed to the backend as `parse_mode`.
    pub formatting: String,
    /// Whether published posts play a notification sound.
    pub notifications: bool,
    /// Whether plain-text posts render link previews.
    pub link_preview: bool,
    pub default_reactions: Option<String>,
    /// Display-only timezone label. Scheduling math always runs in the
    /// operating timezone from config, never in this one.
    pub timezone: String,
}

impl UserSettings {
    /// Defaults applied when a user's row is created lazily.
    pub fn defaults(user_id: i64) -> Self {
        Self {
            user_id,
            formatting: "HTML".to_string(),
            notifications: false,
            link_preview: true,
            default_reactions: None,
            timezone: "Europe/Moscow".to_string(),
        }
    }

    /// Resolve these preferences into delivery flags for one send.
    pub fn send_options(&self) -> SendOptions {
        SendOptions {
            parse_mode: self.formatting.clone(),
            silent: !self.notifications,
            suppress_link_preview: !self.link_preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deliver_silently_with_previews() {
        let opts = UserSettings::defaults(7).send_options();
        assert_eq!(opts.parse_mode, "HTML");
        assert!(opts.silent);
        assert!(!opts.suppress_link_preview);
    }
}
