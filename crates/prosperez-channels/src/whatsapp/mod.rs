//! WhatsApp session backend built on `whatsapp-rust`.
//!
//! Uses the WhatsApp Web protocol (Noise handshake + Signal encryption).
//! Pairing is done by scanning a QR code, like WhatsApp Web.
//! Credentials are persisted to `{data_dir}/whatsapp_session/whatsapp.db`
//! by the library's SQLite store.

mod connection;
mod events;
mod qr;

#[cfg(test)]
mod tests;

pub use connection::WhatsAppConnection;
pub use qr::generate_qr_terminal;

use async_trait::async_trait;
use prosperez_core::{
    config::SessionConfig,
    error::BotError,
    traits::{Connector, LifecycleEvent, Session},
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use whatsapp_rust::bot::Bot;
use whatsapp_rust_sqlite_storage::SqliteStore;
use whatsapp_rust_tokio_transport::TokioWebSocketTransportFactory;
use whatsapp_rust_ureq_http_client::UreqHttpClient;

const LIFECYCLE_BUFFER: usize = 16;
const MESSAGE_BUFFER: usize = 64;

/// Builds WhatsApp sessions from the on-disk credential store.
pub struct WhatsAppConnector {
    config: SessionConfig,
}

impl WhatsAppConnector {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Path of the credential store database.
    pub fn session_db_path(&self) -> String {
        format!("{}/whatsapp.db", self.config.session_dir())
    }

    /// Whether a credential store has been created (device paired at least once).
    pub fn has_session(&self) -> bool {
        std::path::Path::new(&self.session_db_path()).exists()
    }
}

#[async_trait]
impl Connector for WhatsAppConnector {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn connect(&self) -> Result<Session, BotError> {
        tokio::fs::create_dir_all(self.config.session_dir()).await?;
        let db_path = self.session_db_path();

        info!("WhatsApp session starting (store: {db_path})...");

        let backend = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .map_err(|e| BotError::Session(format!("whatsapp store init failed: {e}")))?,
        );

        let (lifecycle_tx, lifecycle_rx) = mpsc::channel(LIFECYCLE_BUFFER);
        let (message_tx, message_rx) = mpsc::channel(MESSAGE_BUFFER);

        // Receiver is ours and empty, so this cannot block.
        let _ = lifecycle_tx.send(LifecycleEvent::Connecting).await;

        let closed_tx = lifecycle_tx.clone();
        let mut bot = Bot::builder()
            .with_backend(backend)
            .with_transport_factory(TokioWebSocketTransportFactory::new())
            .with_http_client(UreqHttpClient::new())
            .with_os_info(Some(self.config.device_name.clone()), None)
            .on_event(move |event, _client| {
                let lifecycle = lifecycle_tx.clone();
                let messages = message_tx.clone();
                async move {
                    events::forward(event, &lifecycle, &messages).await;
                }
            })
            .build()
            .await
            .map_err(|e| BotError::Channel(format!("whatsapp bot build failed: {e}")))?;

        let client = bot.client();
        // Reconnects belong to the supervisor: one client per session.
        client.enable_auto_reconnect.store(false, Ordering::Relaxed);

        let run = bot
            .run()
            .await
            .map_err(|e| BotError::Channel(format!("whatsapp bot run failed: {e}")))?;
        let run_abort = run.abort_handle();
        tokio::spawn(events::watch_run(run, closed_tx));

        info!("WhatsApp client running");

        let connection = Arc::new(WhatsAppConnection::new(client));
        Ok(Session::new(connection, lifecycle_rx, message_rx).with_task(run_abort))
    }
}
