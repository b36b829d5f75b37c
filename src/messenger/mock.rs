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

//! Scripted messenger client for tests.
//!
//! Records every outbound call and lets a test enqueue failures for upcoming
//! send attempts. Message ids are handed out from a counter so tests can
//! assert on ordering and deletion targets.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::buttons::Keyboard;
use crate::error::MessengerError;
use crate::models::{AlbumItem, SendOptions};

use super::{MessageRef, MessengerClient};

/// One recorded outbound send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Text {
        chat_id: i64,
        text: String,
        keyboard: Option<Keyboard>,
        silent: bool,
    },
    Media {
        chat_id: i64,
        kind: &'static str,
        file_ref: String,
        caption: Option<String>,
        keyboard: Option<Keyboard>,
    },
    Album {
        chat_id: i64,
        items: Vec<AlbumItem>,
        caption: Option<String>,
    },
}

/// A messenger client whose behavior is scripted by the test.
#[derive(Default)]
pub struct MockMessenger {
    next_message_id: AtomicI64,
    // One scripted outcome per upcoming send attempt; None means success.
    script: Mutex<VecDeque<Option<MessengerError>>>,
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<MessageRef>>,
    notices: Mutex<Vec<(i64, String)>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Queue an error for the next send attempt. Scripted outcomes are
    /// consumed in order, one per attempt; once the queue is empty sends
    /// succeed.
    pub fn fail_next(&self, error: MessengerError) {
        self.script.lock().unwrap().push_back(Some(error));
    }

    /// Queue the same error for the next `n` send attempts.
    pub fn fail_times(&self, error: MessengerError, n: usize) {
        let mut script = self.script.lock().unwrap();
        for _ in 0..n {
            script.push_back(Some(error.clone()));
        }
    }

    /// Queue an explicit success, letting a later queued failure target the
    /// send attempt after this one.
    pub fn pass_next(&self) {
        self.script.lock().unwrap().push_back(None);
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Messages deleted so far.
    pub fn deleted(&self) -> Vec<MessageRef> {
        self.deleted.lock().unwrap().clone()
    }

    /// Operator notices sent so far.
    pub fn notices(&self) -> Vec<(i64, String)> {
        self.notices.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Option<MessengerError> {
        self.script.lock().unwrap().pop_front().flatten()
    }

    fn allocate_ref(&self, chat_id: i64) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
        }
    }

    fn send_media(
        &self,
        chat_id: i64,
        kind: &'static str,
        file_ref: &str,
        caption: Option<&str>,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, MessengerError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.sent.lock().unwrap().push(SentMessage::Media {
            chat_id,
            kind,
            file_ref: file_ref.to_string(),
            caption: caption.map(str::to_string),
            keyboard: keyboard.cloned(),
        });
        Ok(self.allocate_ref(chat_id))
    }
}

#[async_trait]
impl MessengerClient for MockMessenger {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        opts: &SendOptions,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, MessengerError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.sent.lock().unwrap().push(SentMessage::Text {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
            silent: opts.silent,
        });
        Ok(self.allocate_ref(chat_id))
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        file_ref: &str,
        caption: Option<&str>,
        _opts: &SendOptions,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, MessengerError> {
        self.send_media(chat_id, "photo", file_ref, caption, keyboard)
    }

    async fn send_video(
        &self,
        chat_id: i64,
        file_ref: &str,
        caption: Option<&str>,
        _opts: &SendOptions,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, MessengerError> {
        self.send_media(chat_id, "video", file_ref, caption, keyboard)
    }

    async fn send_document(
        &self,
        chat_id: i64,
        file_ref: &str,
        caption: Option<&str>,
        _opts: &SendOptions,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, MessengerError> {
        self.send_media(chat_id, "document", file_ref, caption, keyboard)
    }

    async fn send_album(
        &self,
        chat_id: i64,
        items: &[AlbumItem],
        caption: Option<&str>,
        _opts: &SendOptions,
    ) -> Result<Vec<MessageRef>, MessengerError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.sent.lock().unwrap().push(SentMessage::Album {
            chat_id,
            items: items.to_vec(),
            caption: caption.map(str::to_string),
        });
        Ok(items.iter().map(|_| self.allocate_ref(chat_id)).collect())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), MessengerError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        self.deleted.lock().unwrap().push(message);
        Ok(())
    }

    async fn notify_user(&self, user_id: i64, text: &str) -> Result<(), MessengerError> {
        self.notices
            .lock()
            .unwrap()
            .push((user_id, text.to_string()));
        Ok(())
    }
}
