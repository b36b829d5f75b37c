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

//! Timed deletion of published messages.
//!
//! Best-effort by contract: the timer lives only in process memory, is never
//! persisted, and a deletion failure is logged and dropped. A restart between
//! publish and deletion means the message simply stays up.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::messenger::{MessageRef, MessengerClient};

/// Delete `message` after `delay`. Fire-and-forget; the returned handle is
/// for tests that want to await the deletion.
pub fn schedule_deletion(
    client: Arc<dyn MessengerClient>,
    message: MessageRef,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match client.delete_message(message).await {
            Ok(()) => debug!(
                chat_id = message.chat_id,
                message_id = message.message_id,
                "Deleted message on timer"
            ),
            Err(e) => warn!(
                chat_id = message.chat_id,
                message_id = message.message_id,
                error = %e,
                "Timed deletion failed"
            ),
        }
    })
}
