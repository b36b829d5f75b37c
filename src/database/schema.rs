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

//! Diesel table definitions.
//!
//! Timestamps are TEXT columns holding naive civil timestamps; the DAL
//! converts them to typed values at its boundary. Booleans are INTEGER 0/1.

diesel::table! {
    scheduled_posts (id) {
        id -> BigInt,
        channel_id -> BigInt,
        user_id -> BigInt,
        text -> Nullable<Text>,
        media_type -> Nullable<Text>,
        media_file_id -> Nullable<Text>,
        album -> Nullable<Text>,
        buttons -> Nullable<Text>,
        scheduled_time -> Text,
        delete_after -> Nullable<BigInt>,
        status -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    channels (id) {
        id -> BigInt,
        channel_id -> BigInt,
        channel_username -> Nullable<Text>,
        channel_title -> Nullable<Text>,
        added_by -> BigInt,
        added_at -> Text,
    }
}

diesel::table! {
    users_settings (user_id) {
        user_id -> BigInt,
        formatting -> Text,
        notifications -> Integer,
        link_preview -> Integer,
        default_reactions -> Nullable<Text>,
        timezone -> Text,
    }
}

diesel::table! {
    posts_stats (id) {
        id -> BigInt,
        channel_id -> BigInt,
        message_id -> BigInt,
        posted_at -> Text,
        views -> BigInt,
        reactions -> Nullable<Text>,
    }
}

diesel::table! {
    templates (id) {
        id -> BigInt,
        user_id -> BigInt,
        name -> Text,
        text -> Nullable<Text>,
        media_type -> Nullable<Text>,
        media_file_id -> Nullable<Text>,
        album -> Nullable<Text>,
        buttons -> Nullable<Text>,
        created_at -> Text,
    }
}
