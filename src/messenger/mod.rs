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

//! The messenger seam.
//!
//! Everything the executor needs from the chat platform, behind one trait.
//! The executor and scheduler are written against this trait only; tests run
//! against [`mock::MockMessenger`], production wires in a real API client.

pub mod mock;

use async_trait::async_trait;

use crate::buttons::Keyboard;
use crate::error::MessengerError;
use crate::models::{AlbumItem, SendOptions};

/// A message that exists on the platform, addressable for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Outbound operations against the chat platform.
///
/// All sends are fallible with [`MessengerError`]; classification into
/// transient and permanent failures is the executor's job, not the
/// client's.
#[async_trait]
pub trait MessengerClient: Send + Sync {
    /// Send a plain text message.
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        opts: &SendOptions,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, MessengerError>;

    /// Send a photo with an optional caption.
    async fn send_photo(
        &self,
        chat_id: i64,
        file_ref: &str,
        caption: Option<&str>,
        opts: &SendOptions,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, MessengerError>;

    /// Send a video with an optional caption.
    async fn send_video(
        &self,
        chat_id: i64,
        file_ref: &str,
        caption: Option<&str>,
        opts: &SendOptions,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, MessengerError>;

    /// Send a document with an optional caption.
    async fn send_document(
        &self,
        chat_id: i64,
        file_ref: &str,
        caption: Option<&str>,
        opts: &SendOptions,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, MessengerError>;

    /// Send a media group. The caption rides on the first item; the platform
    /// does not support keyboards on grouped messages. Returns one ref per
    /// item, in order.
    async fn send_album(
        &self,
        chat_id: i64,
        items: &[AlbumItem],
        caption: Option<&str>,
        opts: &SendOptions,
    ) -> Result<Vec<MessageRef>, MessengerError>;

    /// Delete a previously sent message.
    async fn delete_message(&self, message: MessageRef) -> Result<(), MessengerError>;

    /// Send a private service notice to an operator. Best-effort at every
    /// call site; a failed notice never changes post state.
    async fn notify_user(&self, user_id: i64, text: &str) -> Result<(), MessengerError>;
}
