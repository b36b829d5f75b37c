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

//! The polling scheduler loop.
//!
//! Every tick, the loop asks the queue for posts whose civil time has
//! arrived and drives each through the executor. Per-post failures are
//! contained: they mark that post `error` and move on, never terminating the
//! loop or starving other due posts in the same cycle.

pub mod delete_timer;

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::dal::Dal;
use crate::error::DataError;
use crate::executor::Publisher;
use crate::messenger::MessengerClient;
use crate::models::{PostStatus, ScheduledPost};
use crate::retry::RetryPolicy;

use delete_timer::schedule_deletion;

/// Loop configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time between due-post polls.
    pub poll_interval: Duration,
    /// The fixed operating timezone all civil timestamps are interpreted in.
    pub timezone: Tz,
    /// Retry budget handed to the executor.
    pub retry: RetryPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            timezone: chrono_tz::Europe::Moscow,
            retry: RetryPolicy::default(),
        }
    }
}

/// Handle to a running scheduler. Dropping it does not stop the loop;
/// shutdown is explicit.
pub struct SchedulerHandle {
    shutdown: Arc<Notify>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for the in-flight cycle to finish.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        let _ = self.join.await;
    }
}

/// The deferred-publication service.
pub struct Scheduler {
    dal: Dal,
    client: Arc<dyn MessengerClient>,
    publisher: Publisher,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(dal: Dal, client: Arc<dyn MessengerClient>, config: SchedulerConfig) -> Self {
        let publisher = Publisher::new(
            dal.clone(),
            client.clone(),
            config.retry,
            config.timezone,
        );
        Self {
            dal,
            client,
            publisher,
            config,
        }
    }

    /// The executor, for publish-now paths that bypass the queue's timing.
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Spawn the polling loop. The first poll happens immediately.
    pub fn start(self) -> SchedulerHandle {
        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();
        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(
                poll_interval_secs = self.config.poll_interval.as_secs(),
                timezone = %self.config.timezone,
                "Scheduler started"
            );
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.run_cycle().await,
                    _ = signal.notified() => {
                        info!("Scheduler shutting down");
                        break;
                    }
                }
            }
        });
        SchedulerHandle { shutdown, join }
    }

    /// One poll cycle: fetch due posts and process them in order. A fetch
    /// failure skips the cycle; the posts stay pending for the next tick.
    pub async fn run_cycle(&self) {
        let now = crate::civil::now(self.config.timezone);
        let due = match self.dal.scheduled_posts().due(now).await {
            Ok(due) => due,
            Err(e) => {
                error!(error = %e, "Failed to fetch due posts, skipping cycle");
                return;
            }
        };

        if due.is_empty() {
            return;
        }
        debug!(count = due.len(), "Processing due posts");

        for post in due {
            let post_id = post.id;
            if let Err(e) = self.process_post(post).await {
                error!(post_id, error = %e, "Failed to process due post");
            }
        }
    }

    /// Publish one due post and settle its terminal status. The operator is
    /// notified about the outcome on a best-effort basis; a failed notice
    /// never changes post state.
    async fn process_post(&self, post: ScheduledPost) -> Result<(), DataError> {
        let settings = self.dal.user_settings().get_or_create(post.user_id).await?;
        let opts = settings.send_options();

        match self
            .publisher
            .publish(post.channel_id, &post.payload(), &opts)
            .await
        {
            Ok(message) => {
                self.dal
                    .scheduled_posts()
                    .set_status(post.id, PostStatus::Published)
                    .await?;
                info!(post_id = post.id, channel_id = post.channel_id, "Scheduled post published");

                if let Some(seconds) = post.delete_after_seconds {
                    schedule_deletion(
                        self.client.clone(),
                        message,
                        Duration::from_secs(seconds.max(0) as u64),
                    );
                }

                self.notify(post.user_id, &format!("Scheduled post #{} published", post.id))
                    .await;
            }
            Err(e) => {
                self.dal
                    .scheduled_posts()
                    .set_status(post.id, PostStatus::Error)
                    .await?;
                error!(post_id = post.id, error = %e, "Scheduled post failed");

                self.notify(
                    post.user_id,
                    &format!("Scheduled post #{}: {}", post.id, e.user_message()),
                )
                .await;
            }
        }

        Ok(())
    }

    async fn notify(&self, user_id: i64, text: &str) {
        if let Err(e) = self.client.notify_user(user_id, text).await {
            debug!(user_id, error = %e, "Operator notice failed");
        }
    }
}
