mod commands;
mod logging;
mod supervisor;

#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use prosperez_channels::whatsapp::WhatsAppConnector;
use prosperez_core::{
    config::{self, ConfigSource},
    heap::CountingAllocator,
};
use std::sync::Arc;
use std::time::Instant;
use supervisor::{Supervisor, SupervisorExit};
use tracing::{error, info, warn};

#[global_allocator]
static ALLOC: CountingAllocator = CountingAllocator;

#[derive(Parser)]
#[command(name = "prosperez", version, about = "Prosperez: WhatsApp command bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to WhatsApp and serve commands (default).
    Start,
    /// Show the resolved configuration and pairing state.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();
    let (cfg, source) = config::load(&cli.config)?;

    match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => {
            let _guard = logging::init(&cfg)?;
            logging::install_panic_hook();
            if source == ConfigSource::Defaults {
                info!("config file not found at {}, using defaults", cli.config);
            }

            let bot = Arc::new(cfg.bot.clone());
            let connector = Arc::new(WhatsAppConnector::new(cfg.session.clone()));
            let dispatcher = Arc::new(commands::Dispatcher::new(bot.clone(), started));
            let supervisor = Supervisor::new(connector, dispatcher, bot.clone());

            info!(
                "{} v{} starting | prefix: {} | mode: {}",
                bot.name, bot.version, bot.prefix, bot.mode
            );

            tokio::select! {
                result = supervisor.run() => {
                    match result {
                        Ok(SupervisorExit::LoggedOut) => warn!(
                            "device logged out; delete {} and restart to pair again",
                            cfg.session.session_dir()
                        ),
                        Err(e) => error!("failed to start session: {e}"),
                    }
                    // Idle until interrupted.
                    tokio::signal::ctrl_c().await?;
                }
                _ = tokio::signal::ctrl_c() => {}
            }

            info!("shutting down");
        }
        Commands::Status => {
            let connector = WhatsAppConnector::new(cfg.session.clone());
            println!("Prosperez status\n");
            match source {
                ConfigSource::File => println!("Config: {}", cli.config),
                ConfigSource::Defaults => println!("Config: {} (not found, defaults)", cli.config),
            }
            println!("  name:    {}", cfg.bot.name);
            println!("  owner:   {}", cfg.bot.owner);
            println!("  prefix:  {}", cfg.bot.prefix);
            println!("  mode:    {}", cfg.bot.mode);
            println!("  version: {}", cfg.bot.version);
            println!("  host:    {}", cfg.bot.host);
            println!();
            println!(
                "  whatsapp: {} ({})",
                if connector.has_session() {
                    "paired"
                } else {
                    "not paired"
                },
                connector.session_db_path()
            );
        }
    }

    Ok(())
}
