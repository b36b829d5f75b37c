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

//! Integration tests for the persistence layer against a real SQLite file.

use chrono::Duration;
use chrono_tz::Europe::Moscow;
use diesel::prelude::*;
use diesel::sql_query;
use tempfile::TempDir;

use telepost::dal::Dal;
use telepost::database::Database;
use telepost::error::DataError;
use telepost::models::{
    AlbumItem, MediaAttachment, MediaKind, NewScheduledPost, NewTemplate, PostStatus,
};
use telepost::{civil, ValidationError};

async fn test_dal() -> (Dal, Database, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("telepost-test.db");
    let database = Database::new(path.to_str().unwrap(), 2).await.unwrap();
    (Dal::new(&database), database, dir)
}

fn text_post(channel_id: i64, user_id: i64, offset_minutes: i64) -> NewScheduledPost {
    NewScheduledPost {
        channel_id,
        user_id,
        text: Some("hello channel".to_string()),
        media: None,
        album: Vec::new(),
        buttons: None,
        scheduled_time: civil::now(Moscow) + Duration::minutes(offset_minutes),
        delete_after_seconds: None,
    }
}

#[tokio::test]
async fn enqueue_and_fetch_due() {
    let (dal, _database, _dir) = test_dal().await;

    let created = dal
        .scheduled_posts()
        .create(text_post(-100, 7, -5))
        .await
        .unwrap();
    assert_eq!(created.status, PostStatus::Pending);
    assert!(created.id > 0);

    let due = dal.scheduled_posts().due(civil::now(Moscow)).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, created.id);
    assert_eq!(due[0].text.as_deref(), Some("hello channel"));
}

#[tokio::test]
async fn due_excludes_future_posts_and_orders_oldest_first() {
    let (dal, _database, _dir) = test_dal().await;

    let later = dal
        .scheduled_posts()
        .create(text_post(-100, 7, -2))
        .await
        .unwrap();
    let earlier = dal
        .scheduled_posts()
        .create(text_post(-100, 7, -30))
        .await
        .unwrap();
    dal.scheduled_posts()
        .create(text_post(-100, 7, 60))
        .await
        .unwrap();

    let due = dal.scheduled_posts().due(civil::now(Moscow)).await.unwrap();
    let ids: Vec<i64> = due.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![earlier.id, later.id]);
}

#[tokio::test]
async fn empty_payload_is_rejected_before_persistence() {
    let (dal, _database, _dir) = test_dal().await;

    let mut post = text_post(-100, 7, -5);
    post.text = Some("   ".to_string());
    let err = dal.scheduled_posts().create(post).await.unwrap_err();
    assert!(matches!(
        err,
        DataError::Validation(ValidationError::EmptyPayload)
    ));

    let due = dal.scheduled_posts().due(civil::now(Moscow)).await.unwrap();
    assert!(due.is_empty());
}

#[tokio::test]
async fn album_posts_round_trip() {
    let (dal, _database, _dir) = test_dal().await;

    let mut post = text_post(-100, 7, -5);
    post.album = vec![
        AlbumItem {
            kind: MediaKind::Photo,
            file_ref: "file-a".to_string(),
        },
        AlbumItem {
            kind: MediaKind::Video,
            file_ref: "file-b".to_string(),
        },
    ];
    let created = dal.scheduled_posts().create(post).await.unwrap();

    let loaded = dal
        .scheduled_posts()
        .get(created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.album.len(), 2);
    assert_eq!(loaded.album[0].kind, MediaKind::Photo);
    assert_eq!(loaded.album[1].file_ref, "file-b");
}

#[tokio::test]
async fn status_transitions_are_monotonic() {
    let (dal, _database, _dir) = test_dal().await;
    let post = dal
        .scheduled_posts()
        .create(text_post(-100, 7, -5))
        .await
        .unwrap();

    assert!(dal
        .scheduled_posts()
        .set_status(post.id, PostStatus::Published)
        .await
        .unwrap());

    // Terminal states never change again, whatever the target.
    assert!(!dal
        .scheduled_posts()
        .set_status(post.id, PostStatus::Error)
        .await
        .unwrap());
    assert!(!dal
        .scheduled_posts()
        .set_status(post.id, PostStatus::Published)
        .await
        .unwrap());

    let loaded = dal.scheduled_posts().get(post.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, PostStatus::Published);
}

#[tokio::test]
async fn published_posts_never_reappear_as_due() {
    let (dal, _database, _dir) = test_dal().await;
    let post = dal
        .scheduled_posts()
        .create(text_post(-100, 7, -5))
        .await
        .unwrap();

    dal.scheduled_posts()
        .set_status(post.id, PostStatus::Published)
        .await
        .unwrap();

    let due = dal.scheduled_posts().due(civil::now(Moscow)).await.unwrap();
    assert!(due.is_empty());
}

#[tokio::test]
async fn reschedule_and_edits_only_touch_pending_posts() {
    let (dal, _database, _dir) = test_dal().await;
    let post = dal
        .scheduled_posts()
        .create(text_post(-100, 7, 60))
        .await
        .unwrap();

    let new_time = civil::now(Moscow) + Duration::minutes(120);
    assert!(dal
        .scheduled_posts()
        .reschedule(post.id, new_time)
        .await
        .unwrap());
    assert!(dal
        .scheduled_posts()
        .update_text(post.id, Some("edited".to_string()))
        .await
        .unwrap());

    dal.scheduled_posts()
        .set_status(post.id, PostStatus::Error)
        .await
        .unwrap();
    assert!(!dal
        .scheduled_posts()
        .reschedule(post.id, new_time)
        .await
        .unwrap());
    assert!(!dal
        .scheduled_posts()
        .update_text(post.id, Some("too late".to_string()))
        .await
        .unwrap());

    let loaded = dal.scheduled_posts().get(post.id).await.unwrap().unwrap();
    assert_eq!(loaded.text.as_deref(), Some("edited"));
}

#[tokio::test]
async fn update_buttons_sets_and_clears_on_pending_posts_only() {
    let (dal, _database, _dir) = test_dal().await;
    let post = dal
        .scheduled_posts()
        .create(text_post(-100, 7, 60))
        .await
        .unwrap();

    assert!(dal
        .scheduled_posts()
        .update_buttons(post.id, Some("Site - https://example.com".to_string()))
        .await
        .unwrap());
    let loaded = dal.scheduled_posts().get(post.id).await.unwrap().unwrap();
    assert_eq!(loaded.buttons.as_deref(), Some("Site - https://example.com"));

    // None removes the buttons outright.
    assert!(dal
        .scheduled_posts()
        .update_buttons(post.id, None)
        .await
        .unwrap());
    let loaded = dal.scheduled_posts().get(post.id).await.unwrap().unwrap();
    assert!(loaded.buttons.is_none());

    dal.scheduled_posts()
        .set_status(post.id, PostStatus::Published)
        .await
        .unwrap();
    assert!(!dal
        .scheduled_posts()
        .update_buttons(post.id, Some("B - https://b.example".to_string()))
        .await
        .unwrap());
}

#[tokio::test]
async fn list_pending_for_user_filters_owner_and_status() {
    let (dal, _database, _dir) = test_dal().await;

    let soon = dal
        .scheduled_posts()
        .create(text_post(-100, 7, 10))
        .await
        .unwrap();
    let later = dal
        .scheduled_posts()
        .create(text_post(-100, 7, 120))
        .await
        .unwrap();
    let done = dal
        .scheduled_posts()
        .create(text_post(-100, 7, 240))
        .await
        .unwrap();
    dal.scheduled_posts()
        .create(text_post(-200, 8, 30))
        .await
        .unwrap();

    dal.scheduled_posts()
        .set_status(done.id, PostStatus::Published)
        .await
        .unwrap();

    let pending = dal.scheduled_posts().list_pending_for_user(7).await.unwrap();
    let ids: Vec<i64> = pending.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![soon.id, later.id]);
}

#[tokio::test]
async fn delete_removes_a_post_whatever_its_status() {
    let (dal, _database, _dir) = test_dal().await;

    let pending = dal
        .scheduled_posts()
        .create(text_post(-100, 7, 60))
        .await
        .unwrap();
    let failed = dal
        .scheduled_posts()
        .create(text_post(-100, 7, 60))
        .await
        .unwrap();
    dal.scheduled_posts()
        .set_status(failed.id, PostStatus::Error)
        .await
        .unwrap();

    assert!(dal.scheduled_posts().delete(pending.id).await.unwrap());
    assert!(dal.scheduled_posts().delete(failed.id).await.unwrap());
    assert!(dal.scheduled_posts().get(pending.id).await.unwrap().is_none());
    assert!(dal.scheduled_posts().get(failed.id).await.unwrap().is_none());

    // Deleting a missing post reports nothing removed.
    assert!(!dal.scheduled_posts().delete(pending.id).await.unwrap());
}

#[tokio::test]
async fn legacy_minute_precision_rows_still_parse_and_come_due() {
    let (dal, database, _dir) = test_dal().await;
    let post = dal
        .scheduled_posts()
        .create(text_post(-100, 7, 60))
        .await
        .unwrap();

    // Rows written by older deployments carry minute-precision timestamps.
    let conn = database.pool().get().await.unwrap();
    let statement = format!(
        "UPDATE scheduled_posts SET scheduled_time = '2020-01-01 10:30' WHERE id = {}",
        post.id
    );
    conn.interact(move |conn| sql_query(statement).execute(conn))
        .await
        .unwrap()
        .unwrap();

    let due = dal.scheduled_posts().due(civil::now(Moscow)).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(
        civil::format(due[0].scheduled_time),
        "2020-01-01 10:30:00"
    );
}

#[tokio::test]
async fn corrupt_timestamp_is_a_typed_error_not_a_substitute() {
    let (dal, database, _dir) = test_dal().await;
    let post = dal
        .scheduled_posts()
        .create(text_post(-100, 7, -5))
        .await
        .unwrap();

    let conn = database.pool().get().await.unwrap();
    let statement = format!(
        "UPDATE scheduled_posts SET scheduled_time = 'not a time' WHERE id = {}",
        post.id
    );
    conn.interact(move |conn| sql_query(statement).execute(conn))
        .await
        .unwrap()
        .unwrap();

    let err = dal.scheduled_posts().get(post.id).await.unwrap_err();
    assert!(matches!(err, DataError::CorruptTimestamp(_)));
}

#[tokio::test]
async fn user_settings_materialize_defaults_and_update() {
    let (dal, _database, _dir) = test_dal().await;

    let settings = dal.user_settings().get_or_create(42).await.unwrap();
    assert_eq!(settings.formatting, "HTML");
    assert!(!settings.notifications);
    assert!(settings.link_preview);
    assert_eq!(settings.timezone, "Europe/Moscow");

    // Defaults map to silent sends with previews enabled.
    let opts = settings.send_options();
    assert!(opts.silent);
    assert!(!opts.suppress_link_preview);

    let updated = dal
        .user_settings()
        .update(42, "notifications", "1")
        .await
        .unwrap();
    assert!(updated.notifications);
    assert!(!updated.send_options().silent);

    let err = dal
        .user_settings()
        .update(42, "favorite_color", "red")
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::UnknownSettingKey(_)));
}

#[tokio::test]
async fn channel_upsert_refreshes_without_duplicating() {
    let (dal, _database, _dir) = test_dal().await;

    dal.channels()
        .upsert(-100, Some("old_name".to_string()), None, 7)
        .await
        .unwrap();
    let refreshed = dal
        .channels()
        .upsert(
            -100,
            Some("new_name".to_string()),
            Some("My Channel".to_string()),
            7,
        )
        .await
        .unwrap();
    assert_eq!(refreshed.username.as_deref(), Some("new_name"));

    let all = dal.channels().list(None).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title.as_deref(), Some("My Channel"));

    assert!(dal.channels().remove(-100).await.unwrap());
    assert!(dal.channels().get(-100).await.unwrap().is_none());
}

#[tokio::test]
async fn templates_share_payload_validation_with_the_queue() {
    let (dal, _database, _dir) = test_dal().await;

    let template = dal
        .templates()
        .create(NewTemplate {
            user_id: 7,
            name: "promo".to_string(),
            text: Some("promo text".to_string()),
            media: Some(MediaAttachment {
                kind: MediaKind::Photo,
                file_ref: "file-p".to_string(),
            }),
            album: Vec::new(),
            buttons: None,
        })
        .await
        .unwrap();

    let listed = dal.templates().list_for_user(7).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "promo");

    let payload = template.payload();
    assert_eq!(payload.text.as_deref(), Some("promo text"));
    assert!(payload.validate().is_ok());

    let err = dal
        .templates()
        .create(NewTemplate {
            user_id: 7,
            name: "empty".to_string(),
            text: None,
            media: None,
            album: Vec::new(),
            buttons: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DataError::Validation(ValidationError::EmptyPayload)
    ));

    assert!(dal.templates().delete(template.id).await.unwrap());
}

#[tokio::test]
async fn post_stats_record_and_list_newest_first() {
    let (dal, _database, _dir) = test_dal().await;

    dal.post_stats()
        .record(-100, 11, civil::now(Moscow))
        .await
        .unwrap();
    dal.post_stats()
        .record(-100, 12, civil::now(Moscow))
        .await
        .unwrap();
    dal.post_stats()
        .record(-200, 13, civil::now(Moscow))
        .await
        .unwrap();

    let recent = dal.post_stats().recent(-100, 10).await.unwrap();
    let message_ids: Vec<i64> = recent.iter().map(|s| s.message_id).collect();
    assert_eq!(message_ids, vec![12, 11]);
    assert_eq!(recent[0].views, 0);
}
