//! Translation of `whatsapp-rust` events into session lifecycle and message events.

use prosperez_core::{
    message::{InboundEvent, MessageContent, NotifyKind},
    traits::{DisconnectReason, LifecycleEvent},
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use wacore::types::events::{ConnectFailureReason, Event};
use wacore::types::message::MessageInfo;
use waproto::whatsapp::Message;

/// Route one library event onto the session's lifecycle or message channel.
pub(super) async fn forward(
    event: Event,
    lifecycle: &mpsc::Sender<LifecycleEvent>,
    messages: &mpsc::Sender<InboundEvent>,
) {
    let update = match event {
        Event::PairingQrCode { code, .. } => {
            info!("WhatsApp QR code generated (scan to pair)");
            LifecycleEvent::PairingQr(code)
        }
        Event::PairSuccess(_) => {
            info!("WhatsApp pairing successful!");
            LifecycleEvent::CredentialsUpdated
        }
        Event::Connected(_) => LifecycleEvent::Open,
        Event::Disconnected(_) => {
            warn!("WhatsApp disconnected");
            LifecycleEvent::Closed(DisconnectReason::ConnectionLost)
        }
        Event::LoggedOut(_) => {
            warn!("WhatsApp logged out, session invalidated");
            LifecycleEvent::Closed(DisconnectReason::LoggedOut)
        }
        Event::StreamReplaced(_) => {
            warn!("WhatsApp stream replaced by another client");
            LifecycleEvent::Closed(DisconnectReason::ConnectionLost)
        }
        Event::ClientOutdated(_) => {
            error!("WhatsApp rejected this client version as outdated");
            LifecycleEvent::Closed(DisconnectReason::Unknown)
        }
        Event::TemporaryBan(ban) => {
            warn!(
                "WhatsApp temporary ban: {} (expires in {}s)",
                ban.code,
                ban.expire.num_seconds()
            );
            LifecycleEvent::Closed(DisconnectReason::ConnectionLost)
        }
        Event::ConnectFailure(failure) => {
            warn!(
                "WhatsApp connect failure {:?}: {}",
                failure.reason, failure.message
            );
            LifecycleEvent::Closed(failure_reason(failure.reason))
        }
        Event::StreamError(err) => {
            warn!("WhatsApp stream error {}", err.code);
            LifecycleEvent::Closed(DisconnectReason::Unknown)
        }
        Event::Message(msg, info) => {
            let inbound = inbound_event(&msg, &info);
            if messages.send(inbound).await.is_err() {
                debug!("message receiver dropped (session superseded)");
            }
            return;
        }
        _ => return,
    };

    if lifecycle.send(update).await.is_err() {
        debug!("lifecycle receiver dropped (session superseded)");
    }
}

/// Logged-out connect failures are terminal; every other one is recoverable.
pub(super) fn failure_reason(reason: ConnectFailureReason) -> DisconnectReason {
    if reason.is_logged_out() {
        DisconnectReason::LoggedOut
    } else {
        DisconnectReason::ConnectionLost
    }
}

/// How long a finished client run loop waits before reporting a close of
/// its own, so a close event with a precise reason lands first.
pub(super) const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Report `Closed(Unknown)` once the client's run loop ends.
///
/// With library auto-reconnect off, the loop can end without any close
/// event (connect errors, the post-pairing 515 restart). The supervisor
/// acts on the first close it reads and ignores the rest.
pub(super) async fn watch_run(run: JoinHandle<()>, lifecycle: mpsc::Sender<LifecycleEvent>) {
    if let Err(e) = run.await {
        if !e.is_cancelled() {
            warn!("WhatsApp run loop failed: {e}");
        }
    }
    tokio::time::sleep(CLOSE_GRACE).await;
    if lifecycle
        .send(LifecycleEvent::Closed(DisconnectReason::Unknown))
        .await
        .is_err()
    {
        debug!("lifecycle receiver dropped (session superseded)");
    }
}

/// Build an [`InboundEvent`] from a decrypted message and its envelope info.
pub(super) fn inbound_event(msg: &Message, info: &MessageInfo) -> InboundEvent {
    InboundEvent {
        chat_id: info.source.chat.to_string(),
        sender: info.source.sender.user.clone(),
        kind: NotifyKind::Notify,
        content: message_content(msg),
        received_at: chrono::Utc::now(),
    }
}

/// Pull the text-bearing fields out of a message, looking through the
/// device-sent, ephemeral and view-once wrappers first.
///
/// Returns `None` for payloads with none of those fields (stickers,
/// reactions, receipts).
pub(super) fn message_content(msg: &Message) -> Option<MessageContent> {
    let inner = msg
        .device_sent_message
        .as_ref()
        .and_then(|d| d.message.as_deref())
        .or_else(|| {
            msg.ephemeral_message
                .as_ref()
                .and_then(|e| e.message.as_deref())
        })
        .or_else(|| {
            msg.view_once_message
                .as_ref()
                .and_then(|v| v.message.as_deref())
        })
        .unwrap_or(msg);

    let content = MessageContent {
        conversation: inner.conversation.clone(),
        extended_text: inner
            .extended_text_message
            .as_ref()
            .and_then(|e| e.text.clone()),
        image_caption: inner
            .image_message
            .as_ref()
            .and_then(|i| i.caption.clone()),
        video_caption: inner
            .video_message
            .as_ref()
            .and_then(|v| v.caption.clone()),
    };

    let has_field = content.conversation.is_some()
        || content.extended_text.is_some()
        || content.image_caption.is_some()
        || content.video_caption.is_some();

    has_field.then_some(content)
}
