//! Outbound half of a WhatsApp session.

use async_trait::async_trait;
use prosperez_core::{error::BotError, message::OutgoingMessage, traits::Connection};
use std::sync::Arc;
use tracing::debug;
use wacore_binary::jid::Jid;
use whatsapp_rust::client::Client;

/// WhatsApp caps a text message at 65,536 characters.
pub(super) const MAX_MESSAGE_LEN: usize = 65_536;

/// Connection handle wrapping a running `whatsapp-rust` client.
pub struct WhatsAppConnection {
    client: Arc<Client>,
}

impl WhatsAppConnection {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Connection for WhatsAppConnection {
    fn name(&self) -> &str {
        "whatsapp"
    }

    /// Sends each chunk once. Failures surface to the caller, no retry.
    async fn send(&self, message: OutgoingMessage) -> Result<(), BotError> {
        let jid: Jid = message.chat_id.parse().map_err(|e| {
            BotError::Channel(format!("invalid whatsapp JID '{}': {e}", message.chat_id))
        })?;

        for chunk in split_message(&message.text, MAX_MESSAGE_LEN) {
            let msg = waproto::whatsapp::Message {
                conversation: Some(chunk.to_string()),
                ..Default::default()
            };
            let msg_id = self
                .client
                .send_message(jid.clone(), msg)
                .await
                .map_err(|e| BotError::Channel(format!("whatsapp send failed: {e}")))?;
            debug!("sent {msg_id} to {}", message.chat_id);
        }

        Ok(())
    }

    /// Stops the run loop and closes the socket so no second client shares
    /// this device identity after a reconnect.
    async fn close(&self) {
        self.client.disconnect().await;
    }

    // Credential writes go through the SQLite store as the client mutates
    // its device state, so `save_credentials` keeps the default.
}

/// Split a long message into chunks of at most `max_len` bytes, breaking
/// after the last newline in each window when there is one.
pub(super) fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        if rest.len() <= max_len {
            chunks.push(rest);
            break;
        }
        let mut window = max_len;
        while !rest.is_char_boundary(window) {
            window -= 1;
        }
        let cut = rest[..window]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(window);
        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }

    chunks
}
