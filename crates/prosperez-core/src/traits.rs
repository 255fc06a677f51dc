use crate::{
    error::BotError,
    message::{InboundEvent, OutgoingMessage},
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Connection status as reported by the external client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Open,
    Closed,
}

impl ConnectionStatus {
    /// Whether moving from `self` to `next` is a transition the client can emit.
    pub fn can_transition_to(self, next: ConnectionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Open)
                | (Self::Connecting, Self::Closed)
                | (Self::Open, Self::Closed)
        )
    }
}

/// Why a connection closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The device was unlinked; the credential bundle is no longer valid.
    LoggedOut,
    /// Socket dropped, stream error, server restart.
    ConnectionLost,
    /// No reason supplied, or the event stream ended without a close.
    Unknown,
}

impl DisconnectReason {
    /// Every closure except a logout is recoverable.
    pub fn should_reconnect(self) -> bool {
        self != Self::LoggedOut
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoggedOut => "logged out",
            Self::ConnectionLost => "connection lost",
            Self::Unknown => "unknown",
        })
    }
}

/// Lifecycle notifications emitted by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Connecting,
    Open,
    Closed(DisconnectReason),
    /// The credential bundle changed and should be persisted.
    CredentialsUpdated,
    /// A new pairing QR code is available (device not linked yet).
    PairingQr(String),
}

impl LifecycleEvent {
    /// The connection status this event moves to, if it is a status change.
    pub fn status(&self) -> Option<ConnectionStatus> {
        match self {
            Self::Connecting => Some(ConnectionStatus::Connecting),
            Self::Open => Some(ConnectionStatus::Open),
            Self::Closed(_) => Some(ConnectionStatus::Closed),
            Self::CredentialsUpdated | Self::PairingQr(_) => None,
        }
    }
}

/// Live connection handle: the outbound half of a session.
///
/// Every messaging backend implements this trait so the dispatcher can
/// reply without knowing which client library sits underneath.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Send a text message to a chat.
    async fn send(&self, message: OutgoingMessage) -> Result<(), BotError>;

    /// Persist the current credential bundle.
    ///
    /// Backends whose store writes through on every change keep the default.
    async fn save_credentials(&self) -> Result<(), BotError> {
        Ok(())
    }

    /// Shut the underlying client down. Called once when the session ends,
    /// before it is dropped.
    async fn close(&self) {}
}

/// Factory for sessions, called once at startup and again after every
/// recoverable disconnect.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Load credentials, build a client and start it.
    async fn connect(&self) -> Result<Session, BotError>;
}

/// One active (or pending) connection to the messaging network.
///
/// Dropping a session aborts the client's background task.
pub struct Session {
    pub connection: Arc<dyn Connection>,
    pub lifecycle: mpsc::Receiver<LifecycleEvent>,
    pub messages: mpsc::Receiver<InboundEvent>,
    /// Protocol version negotiated by the client, when it reports one.
    pub protocol_version: Option<String>,
    task: Option<AbortHandle>,
}

impl Session {
    pub fn new(
        connection: Arc<dyn Connection>,
        lifecycle: mpsc::Receiver<LifecycleEvent>,
        messages: mpsc::Receiver<InboundEvent>,
    ) -> Self {
        Self {
            connection,
            lifecycle,
            messages,
            protocol_version: None,
            task: None,
        }
    }

    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = Some(version.into());
        self
    }

    /// Tie the client's background task to this session's lifetime.
    pub fn with_task(mut self, task: AbortHandle) -> Self {
        self.task = Some(task);
        self
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_logout_is_terminal() {
        assert!(!DisconnectReason::LoggedOut.should_reconnect());
        assert!(DisconnectReason::ConnectionLost.should_reconnect());
        assert!(DisconnectReason::Unknown.should_reconnect());
    }

    #[test]
    fn test_status_transitions() {
        use ConnectionStatus::*;
        assert!(Connecting.can_transition_to(Open));
        assert!(Connecting.can_transition_to(Closed));
        assert!(Open.can_transition_to(Closed));
        assert!(!Open.can_transition_to(Connecting));
        assert!(!Closed.can_transition_to(Open));
        assert!(!Closed.can_transition_to(Connecting));
    }

    #[test]
    fn test_lifecycle_status_mapping() {
        assert_eq!(
            LifecycleEvent::Closed(DisconnectReason::Unknown).status(),
            Some(ConnectionStatus::Closed)
        );
        assert_eq!(LifecycleEvent::CredentialsUpdated.status(), None);
        assert_eq!(LifecycleEvent::PairingQr("x".into()).status(), None);
    }

    #[tokio::test]
    async fn test_dropping_session_aborts_task() {
        struct Null;

        #[async_trait]
        impl Connection for Null {
            fn name(&self) -> &str {
                "null"
            }
            async fn send(&self, _message: OutgoingMessage) -> Result<(), BotError> {
                Ok(())
            }
        }

        let task = tokio::spawn(std::future::pending::<()>());
        let (_ltx, lrx) = mpsc::channel(1);
        let (_mtx, mrx) = mpsc::channel(1);
        let session = Session::new(Arc::new(Null), lrx, mrx).with_task(task.abort_handle());
        drop(session);

        let err = task.await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
