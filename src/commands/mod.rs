//! Built-in bot commands: prefix parsing, dispatch and replies.

mod catalog;
mod status;


use prosperez_core::{
    config::BotConfig,
    error::BotError,
    heap,
    message::{InboundEvent, NotifyKind, OutgoingMessage},
    traits::Connection,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Menu,
    Ping,
    Runtime,
    BotStatus,
    Owner,
    Repo,
}

impl Command {
    /// Map a lower-cased command token to its command. Each token maps to
    /// at most one command.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "menu" | "help" => Some(Self::Menu),
            "ping" | "ping2" => Some(Self::Ping),
            "runtime" => Some(Self::Runtime),
            "botstatus" => Some(Self::BotStatus),
            "owner" => Some(Self::Owner),
            "repo" => Some(Self::Repo),
            _ => None,
        }
    }
}

/// A prefixed message split into command token and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Lower-cased first word after the prefix.
    pub command: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Parse `text` if it starts with `prefix`. Returns `None` for unprefixed
    /// text and for a bare prefix.
    pub fn parse(text: &str, prefix: &str) -> Option<Self> {
        let body = text.strip_prefix(prefix)?;
        let mut tokens = body.split_whitespace();
        let command = tokens.next()?.to_lowercase();
        Some(Self {
            command,
            args: tokens.map(str::to_string).collect(),
        })
    }
}

/// One outbound send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Time elapsed since the previous send started, rendered at send time.
    ResponseTime,
}

/// Turns inbound message events into replies.
pub struct Dispatcher {
    config: Arc<BotConfig>,
    /// Process start, for uptime reporting.
    started: Instant,
}

impl Dispatcher {
    pub fn new(config: Arc<BotConfig>, started: Instant) -> Self {
        Self { config, started }
    }

    /// Extract a command invocation, or `None` when the event is not actionable.
    pub fn invocation(&self, event: &InboundEvent) -> Option<Invocation> {
        if event.kind != NotifyKind::Notify {
            return None;
        }
        Invocation::parse(event.text()?, &self.config.prefix)
    }

    /// Replies for `invocation`, without sending anything. Unknown commands
    /// plan nothing.
    pub fn plan(&self, invocation: &Invocation) -> Vec<Reply> {
        Command::from_token(&invocation.command)
            .map(|cmd| self.replies(cmd))
            .unwrap_or_default()
    }

    /// Handle one inbound event end to end.
    ///
    /// Failures are logged and swallowed; nothing is retried.
    pub async fn handle(&self, event: InboundEvent, connection: &dyn Connection) {
        let Some(invocation) = self.invocation(&event) else {
            return;
        };

        info!(
            "command received: {} from {}{}",
            invocation.command,
            event.chat_id,
            if event.is_group() { " (group)" } else { "" }
        );

        let replies = self.plan(&invocation);
        if replies.is_empty() {
            debug!("ignoring unknown command: {}", invocation.command);
            return;
        }

        if let Err(e) = deliver(connection, &event.chat_id, replies).await {
            error!(
                "error handling {} from {}: {e}",
                invocation.command, event.chat_id
            );
        }
    }

    fn replies(&self, command: Command) -> Vec<Reply> {
        let config = &self.config;
        match command {
            Command::Menu => {
                let build_start = Instant::now();
                let menu = catalog::render();
                let build_time = build_start.elapsed();
                let header = status::menu_header(config, build_time, heap::usage());
                vec![Reply::Text(format!("{header}\n\n{menu}"))]
            }
            Command::Ping => vec![
                Reply::Text(status::PING_ACK.to_string()),
                Reply::ResponseTime,
            ],
            Command::Runtime => vec![Reply::Text(status::runtime(self.started.elapsed()))],
            Command::BotStatus => vec![Reply::Text(status::bot_status(
                config,
                self.started.elapsed(),
                heap::usage(),
            ))],
            Command::Owner => vec![Reply::Text(status::owner(config))],
            Command::Repo => vec![Reply::Text(status::repo(config))],
        }
    }
}

/// Send replies in order, stopping at the first failure.
async fn deliver(
    connection: &dyn Connection,
    chat_id: &str,
    replies: Vec<Reply>,
) -> Result<(), BotError> {
    let mut previous_send: Option<Instant> = None;

    for reply in replies {
        let text = match reply {
            Reply::Text(text) => text,
            Reply::ResponseTime => {
                status::response_time(previous_send.map(|t| t.elapsed()).unwrap_or_default())
            }
        };
        let sent_at = Instant::now();
        connection.send(OutgoingMessage::new(chat_id, text)).await?;
        previous_send = Some(sent_at);
    }

    Ok(())
}
