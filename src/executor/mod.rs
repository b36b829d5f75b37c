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

//! Publication executor.
//!
//! Takes a validated payload and drives it through the messenger client:
//! dispatch by content shape, bounded retry on transient failures, immediate
//! abort on permanent ones, and exactly one stats row per successful send.
//! The executor is the only writer of `posts_stats`.

use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{debug, error, warn};

use crate::buttons::parse_url_buttons;
use crate::civil;
use crate::dal::Dal;
use crate::error::{MessengerError, PublishError};
use crate::messenger::{MessageRef, MessengerClient};
use crate::models::{MediaKind, PostPayload, SendOptions};
use crate::retry::RetryPolicy;

/// Error text fragments that mean the bot's access to the channel is gone.
/// Retrying cannot fix these; the operator has to reconnect the channel.
const PERMANENT_MARKERS: [&str; 2] = ["bot was kicked", "bot was blocked"];

const RECONNECT_HINT: &str = "reconnect the channel";

/// Whether a send failure is worth retrying. Network failures and anything
/// the backend did not explicitly mark as an access loss count as transient;
/// unknown API errors err on the side of retrying.
fn is_transient(error: &MessengerError) -> bool {
    match error {
        MessengerError::Network(_) => true,
        MessengerError::Api { description } => {
            let description = description.to_lowercase();
            !PERMANENT_MARKERS
                .iter()
                .any(|marker| description.contains(marker))
        }
    }
}

/// Drives payloads to the channel with retry and stats bookkeeping.
#[derive(Clone)]
pub struct Publisher {
    dal: Dal,
    client: Arc<dyn MessengerClient>,
    retry: RetryPolicy,
    timezone: Tz,
}

impl Publisher {
    pub fn new(dal: Dal, client: Arc<dyn MessengerClient>, retry: RetryPolicy, timezone: Tz) -> Self {
        Self {
            dal,
            client,
            retry,
            timezone,
        }
    }

    /// Publish a payload to a channel.
    ///
    /// On success returns the ref of the primary sent message (the first
    /// message for albums) after recording exactly one stats row for it.
    /// Transient failures are retried up to the policy's budget; permanent
    /// failures abort on the spot. The primary send is never repeated once
    /// it has returned: an album's keyboard follow-up runs under its own
    /// retry budget, and its failure does not un-publish the album.
    pub async fn publish(
        &self,
        channel_id: i64,
        payload: &PostPayload,
        opts: &SendOptions,
    ) -> Result<MessageRef, PublishError> {
        let keyboard = payload.buttons.as_deref().and_then(parse_url_buttons);
        let kb = keyboard.as_ref();
        let caption = payload.text.as_deref();

        let message = if !payload.album.is_empty() {
            let message = self
                .send_with_retry(channel_id, || async move {
                    let refs = self
                        .client
                        .send_album(channel_id, &payload.album, caption, opts)
                        .await?;
                    // Validation guarantees a non-empty album.
                    refs.into_iter().next().ok_or_else(|| MessengerError::Api {
                        description: "backend returned no messages for album".to_string(),
                    })
                })
                .await?;

            // Grouped messages cannot carry an inline keyboard; the buttons
            // ride on a follow-up message. The album is committed at this
            // point, so a follow-up failure is logged, not propagated.
            if let Some(kb) = kb {
                let outcome = self
                    .send_with_retry(channel_id, || {
                        self.client.send_text(channel_id, "\u{1F517}", opts, Some(kb))
                    })
                    .await;
                if let Err(e) = outcome {
                    warn!(channel_id, error = %e, "Album keyboard follow-up failed");
                }
            }

            message
        } else if let Some(media) = &payload.media {
            self.send_with_retry(channel_id, || async move {
                match media.kind {
                    MediaKind::Photo => {
                        self.client
                            .send_photo(channel_id, &media.file_ref, caption, opts, kb)
                            .await
                    }
                    MediaKind::Video => {
                        self.client
                            .send_video(channel_id, &media.file_ref, caption, opts, kb)
                            .await
                    }
                    MediaKind::Document => {
                        self.client
                            .send_document(channel_id, &media.file_ref, caption, opts, kb)
                            .await
                    }
                }
            })
            .await?
        } else {
            // Validation rejects fully empty payloads, so text is present.
            let text = caption.unwrap_or_default();
            self.send_with_retry(channel_id, || {
                self.client.send_text(channel_id, text, opts, kb)
            })
            .await?
        };

        // Stats before any status flip by the caller: a crash here leaves the
        // post pending and re-processable rather than silently unpublished.
        self.dal
            .post_stats()
            .record(channel_id, message.message_id, civil::now(self.timezone))
            .await?;

        debug!(channel_id, message_id = message.message_id, "Post published");
        Ok(message)
    }

    /// Drive one send operation through the retry policy. Each call owns a
    /// fresh attempt budget.
    async fn send_with_retry<T, F, Fut>(
        &self,
        channel_id: i64,
        mut send: F,
    ) -> Result<T, PublishError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, MessengerError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match send().await {
                Ok(value) => return Ok(value),
                Err(e) if !is_transient(&e) => {
                    error!(channel_id, error = %e, "Permanent publish failure");
                    return Err(PublishError::Permanent {
                        reason: e.to_string(),
                        remediation: RECONNECT_HINT,
                    });
                }
                Err(e) if self.retry.should_retry(attempt) => {
                    warn!(
                        channel_id,
                        attempt,
                        error = %e,
                        "Transient publish failure, will retry"
                    );
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                }
                Err(e) => {
                    error!(channel_id, attempts = attempt, error = %e, "Retry budget exhausted");
                    return Err(PublishError::RetriesExhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_transient() {
        assert!(is_transient(&MessengerError::Network(
            "connection reset".to_string()
        )));
    }

    #[test]
    fn kicked_and_blocked_are_permanent() {
        for description in [
            "Forbidden: bot was kicked from the channel chat",
            "Forbidden: bot was blocked by the user",
        ] {
            assert!(!is_transient(&MessengerError::Api {
                description: description.to_string()
            }));
        }
    }

    #[test]
    fn unknown_api_errors_are_retried() {
        assert!(is_transient(&MessengerError::Api {
            description: "Too Many Requests: retry after 5".to_string()
        }));
        assert!(is_transient(&MessengerError::Api {
            description: "Internal Server Error".to_string()
        }));
    }
}
