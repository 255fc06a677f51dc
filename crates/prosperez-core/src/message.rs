use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an inbound event is live traffic or a replay of history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    /// A freshly received message. The only actionable kind.
    Notify,
    /// Historical sync / offline replay.
    History,
}

/// Which field of the payload carried the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    PlainText,
    ExtendedText,
    MediaCaption,
    Other,
}

/// The text-bearing fields of an inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Plain conversation text.
    pub conversation: Option<String>,
    /// Body of an extended text message (replies, link previews).
    pub extended_text: Option<String>,
    pub image_caption: Option<String>,
    pub video_caption: Option<String>,
}

impl MessageContent {
    /// Plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            conversation: Some(text.into()),
            ..Default::default()
        }
    }

    /// First non-empty field, in order: conversation, extended text,
    /// image caption, video caption.
    pub fn body(&self) -> Option<&str> {
        self.candidates().find_map(|(_, text)| text)
    }

    /// Discriminator for the field that supplied [`body`](Self::body).
    pub fn kind(&self) -> MessageKind {
        self.candidates()
            .find_map(|(kind, text)| text.map(|_| kind))
            .unwrap_or(MessageKind::Other)
    }

    fn candidates(&self) -> impl Iterator<Item = (MessageKind, Option<&str>)> {
        [
            (MessageKind::PlainText, &self.conversation),
            (MessageKind::ExtendedText, &self.extended_text),
            (MessageKind::MediaCaption, &self.image_caption),
            (MessageKind::MediaCaption, &self.video_caption),
        ]
        .into_iter()
        .map(|(kind, field)| (kind, field.as_deref().filter(|s| !s.is_empty())))
    }
}

/// A single inbound chat message notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Chat the message arrived in (e.g. `123@s.whatsapp.net`). Replies go here.
    pub chat_id: String,
    /// Platform-specific sender ID.
    pub sender: String,
    pub kind: NotifyKind,
    /// `None` when the envelope carried no message body at all.
    pub content: Option<MessageContent>,
    pub received_at: DateTime<Utc>,
}

impl InboundEvent {
    /// Live plain-text message from `chat_id`. Sender is the chat itself.
    pub fn notify(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        let chat_id = chat_id.into();
        Self {
            sender: chat_id.clone(),
            chat_id,
            kind: NotifyKind::Notify,
            content: Some(MessageContent::text(text)),
            received_at: Utc::now(),
        }
    }

    /// Extracted text payload, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().and_then(MessageContent::body)
    }

    /// Whether the message was posted in a group chat.
    pub fn is_group(&self) -> bool {
        self.chat_id.ends_with("@g.us")
    }
}

/// An outgoing text message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Destination chat identifier.
    pub chat_id: String,
    pub text: String,
}

impl OutgoingMessage {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_prefers_conversation() {
        let content = MessageContent {
            conversation: Some(".ping".into()),
            extended_text: Some(".menu".into()),
            ..Default::default()
        };
        assert_eq!(content.body(), Some(".ping"));
        assert_eq!(content.kind(), MessageKind::PlainText);
    }

    #[test]
    fn test_body_skips_empty_fields() {
        let content = MessageContent {
            conversation: Some(String::new()),
            extended_text: None,
            image_caption: Some(String::new()),
            video_caption: Some(".repo".into()),
        };
        assert_eq!(content.body(), Some(".repo"));
        assert_eq!(content.kind(), MessageKind::MediaCaption);
    }

    #[test]
    fn test_body_extended_text() {
        let content = MessageContent {
            extended_text: Some("see https://example.com".into()),
            ..Default::default()
        };
        assert_eq!(content.body(), Some("see https://example.com"));
        assert_eq!(content.kind(), MessageKind::ExtendedText);
    }

    #[test]
    fn test_empty_content_is_other() {
        let content = MessageContent::default();
        assert_eq!(content.body(), None);
        assert_eq!(content.kind(), MessageKind::Other);
    }

    #[test]
    fn test_group_detection() {
        let group = InboundEvent::notify("120363001234567890@g.us", "hi");
        assert!(group.is_group());
        let direct = InboundEvent::notify("5511999887766@s.whatsapp.net", "hi");
        assert!(!direct.is_group());
    }

    #[test]
    fn test_event_without_payload_has_no_text() {
        let mut event = InboundEvent::notify("123@s.whatsapp.net", "x");
        event.content = None;
        assert_eq!(event.text(), None);
    }
}
