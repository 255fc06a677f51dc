//! Session supervisor: start a session, watch its lifecycle, route inbound
//! messages to the dispatcher, reconnect on every closure except a logout.


use crate::commands::Dispatcher;
use prosperez_channels::whatsapp::generate_qr_terminal;
use prosperez_core::{
    config::BotConfig,
    error::BotError,
    traits::{ConnectionStatus, Connector, DisconnectReason, LifecycleEvent, Session},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why [`Supervisor::run`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorExit {
    /// The device was unlinked. Re-pairing needs a fresh credential store.
    LoggedOut,
}

/// Owns the connect / supervise / reconnect loop.
pub struct Supervisor {
    connector: Arc<dyn Connector>,
    dispatcher: Arc<Dispatcher>,
    config: Arc<BotConfig>,
}

impl Supervisor {
    pub fn new(
        connector: Arc<dyn Connector>,
        dispatcher: Arc<Dispatcher>,
        config: Arc<BotConfig>,
    ) -> Self {
        Self {
            connector,
            dispatcher,
            config,
        }
    }

    /// Run until the device is logged out.
    ///
    /// A recoverable closure triggers an immediate new `start`, without
    /// backoff. A failing `start` ends the loop with its error.
    pub async fn run(&self) -> Result<SupervisorExit, BotError> {
        loop {
            let mut session = self.start().await?;
            let reason = self.supervise(&mut session).await;
            session.connection.close().await;
            drop(session);
            let reconnect = reason.should_reconnect();
            info!("connection closed ({reason}), reconnecting: {reconnect}");
            if !reconnect {
                return Ok(SupervisorExit::LoggedOut);
            }
        }
    }

    /// Load credentials and build a fresh session.
    async fn start(&self) -> Result<Session, BotError> {
        let session = self.connector.connect().await?;
        info!(
            "{} session started (protocol {})",
            self.connector.name(),
            session.protocol_version.as_deref().unwrap_or("unknown")
        );
        Ok(session)
    }

    /// Drive one session until it closes. The caller then closes and drops
    /// it, discarding anything still queued.
    async fn supervise(&self, session: &mut Session) -> DisconnectReason {
        let mut status: Option<ConnectionStatus> = None;

        loop {
            tokio::select! {
                biased;

                event = session.lifecycle.recv() => {
                    let Some(event) = event else {
                        debug!("lifecycle stream ended without a close");
                        return DisconnectReason::Unknown;
                    };
                    if let Some(next) = event.status() {
                        if let Some(prev) = status {
                            if prev != next && !prev.can_transition_to(next) {
                                warn!("unexpected status change {prev:?} -> {next:?}");
                            }
                        }
                        status = Some(next);
                    }
                    if let LifecycleEvent::Closed(reason) = event {
                        return reason;
                    }
                    self.on_lifecycle(event, session);
                }

                Some(event) = session.messages.recv() => {
                    let dispatcher = self.dispatcher.clone();
                    let connection = session.connection.clone();
                    tokio::spawn(async move {
                        dispatcher.handle(event, connection.as_ref()).await;
                    });
                }
            }
        }
    }

    fn on_lifecycle(&self, event: LifecycleEvent, session: &Session) {
        match event {
            LifecycleEvent::Connecting => info!("connecting to {}...", self.connector.name()),
            LifecycleEvent::Open => {
                println!("{}", connect_banner(&self.config));
                info!("{} connection open", self.connector.name());
            }
            LifecycleEvent::CredentialsUpdated => {
                let connection = session.connection.clone();
                tokio::spawn(async move {
                    if let Err(e) = connection.save_credentials().await {
                        warn!("failed to persist credentials: {e}");
                    }
                });
            }
            LifecycleEvent::PairingQr(code) => {
                println!("\nScan this QR code with WhatsApp (Linked Devices):\n");
                match generate_qr_terminal(&code) {
                    Ok(qr) => println!("{qr}"),
                    Err(e) => warn!("failed to render pairing QR: {e}"),
                }
            }
            LifecycleEvent::Closed(_) => {}
        }
    }
}

/// Console banner printed each time a connection opens.
pub fn connect_banner(config: &BotConfig) -> String {
    let rule = "━".repeat(27);
    format!(
        "{rule}\n\
         ✅ {name} Bot v{version} Connected Successfully!\n\
         {rule}\n\
         Bot Name: {upper}\n\
         Version: {version}\n\
         Plugins: {plugins}\n\
         Mode: {mode}\n\
         Prefix: {prefix}\n\
         {rule}",
        name = config.name,
        upper = config.name.to_uppercase(),
        version = config.version,
        plugins = config.plugins,
        mode = config.mode,
        prefix = config.prefix,
    )
}
