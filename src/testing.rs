//! In-memory `Connection` / `Connector` fakes for dispatcher and supervisor tests.

use async_trait::async_trait;
use prosperez_core::{
    error::BotError,
    message::{InboundEvent, OutgoingMessage},
    traits::{Connection, Connector, LifecycleEvent, Session},
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Records every send; optionally fails them.
#[derive(Default)]
pub struct FakeConnection {
    sent: Mutex<Vec<OutgoingMessage>>,
    fail_sends: bool,
    saves: AtomicUsize,
    closes: AtomicUsize,
}

impl FakeConnection {
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Poll until `done` holds, panicking after two seconds.
    pub async fn wait_for(&self, done: impl Fn(&Self) -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while !done(self) {
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting on fake connection"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl Connection for FakeConnection {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), BotError> {
        if self.fail_sends {
            return Err(BotError::Channel("send rejected".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn save_credentials(&self) -> Result<(), BotError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Test-side ends of a prepared session.
pub struct SessionHandles {
    pub lifecycle: mpsc::Sender<LifecycleEvent>,
    pub messages: mpsc::Sender<InboundEvent>,
    pub connection: Arc<FakeConnection>,
}

/// Hands out prepared sessions in order; errors once they run out.
#[derive(Default)]
pub struct FakeConnector {
    sessions: Mutex<VecDeque<Session>>,
    connects: AtomicUsize,
}

impl FakeConnector {
    /// Queue a session whose lifecycle channel is preloaded with `events`.
    /// The returned handles keep both channels open.
    pub fn push_session(&self, events: &[LifecycleEvent]) -> SessionHandles {
        let (lifecycle_tx, lifecycle_rx) = mpsc::channel(32);
        let (message_tx, message_rx) = mpsc::channel(32);
        for event in events {
            lifecycle_tx.try_send(event.clone()).unwrap();
        }
        let connection = Arc::new(FakeConnection::default());
        let session = Session::new(connection.clone(), lifecycle_rx, message_rx)
            .with_protocol_version("2.3000.0");
        self.sessions.lock().unwrap().push_back(session);
        SessionHandles {
            lifecycle: lifecycle_tx,
            messages: message_tx,
            connection,
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for FakeConnector {
    fn name(&self) -> &str {
        "fake"
    }

    async fn connect(&self) -> Result<Session, BotError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BotError::Session("no more sessions".into()))
    }
}
