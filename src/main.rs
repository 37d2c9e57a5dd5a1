#![deny(clippy::mod_module_files)]
use std::{io, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rcon_rotation::{
    ConsoleConfig,
    FilesystemRemote,
    HttpRemote,
    RemoteLocation,
    RemoteStore,
    Sequence,
    SyncController,
    VoteMapConfig,
};

mod commands;

#[derive(Parser)]
#[command(name = "rcon-rotation", version, about = "Manage a game server's map rotation")]
struct Cli {
    /// Config file (default: ~/.config/rcon-rotation/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Console API URL or `file::<dir>`; overrides the config file
    #[arg(long, global = true)]
    remote: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a config file for the selected console
    Init {
        /// Bearer token to store with the API URL
        #[arg(long)]
        api_token: Option<String>,
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the current rotation
    Show,
    /// List every map the server offers
    Maps,
    /// Print the vote-map settings
    Flags,
    /// Move the map at position FROM to position TO
    Move { from: usize, to: usize },
    /// Append maps to the end of the rotation
    Add {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Remove the map at POSITION
    Remove { position: usize },
    /// Follow vote-map changes until Ctrl-C
    Watch {
        /// Poll interval in seconds (default from config)
        #[arg(long)]
        interval: Option<u64>,
    },
}

/// Dispatches to the configured backend
enum Remote {
    Http(HttpRemote),
    Filesystem(FilesystemRemote),
}

impl RemoteStore for Remote {
    async fn fetch_rotation(&self) -> Result<Sequence> {
        match self {
            Remote::Http(r) => r.fetch_rotation().await,
            Remote::Filesystem(r) => r.fetch_rotation().await,
        }
    }

    async fn push_rotation(&self, ids: Vec<String>) -> Result<()> {
        match self {
            Remote::Http(r) => r.push_rotation(ids).await,
            Remote::Filesystem(r) => r.push_rotation(ids).await,
        }
    }

    async fn fetch_votemap_config(&self) -> Result<VoteMapConfig> {
        match self {
            Remote::Http(r) => r.fetch_votemap_config().await,
            Remote::Filesystem(r) => r.fetch_votemap_config().await,
        }
    }

    async fn fetch_catalog(&self) -> Result<Sequence> {
        match self {
            Remote::Http(r) => r.fetch_catalog().await,
            Remote::Filesystem(r) => r.fetch_catalog().await,
        }
    }
}

async fn open_remote(config: &ConsoleConfig) -> Result<Remote> {
    match RemoteLocation::parse(&config.api_url)? {
        RemoteLocation::Http(url) => {
            tracing::debug!("Using console API at {}", url);
            let remote = HttpRemote::new(&url, config.api_token.clone(), config.request_timeout())?;
            Ok(Remote::Http(remote))
        }
        RemoteLocation::Filesystem(path) => {
            tracing::debug!("Using filesystem remote at {:?}", path);
            let remote = FilesystemRemote::new(path);
            remote.initialize().await?;
            Ok(Remote::Filesystem(remote))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Init { api_token, force } = cli.command {
        let path = ConsoleConfig::resolve_path(cli.config.as_deref())?;
        let mut config = ConsoleConfig::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        if let Some(remote) = cli.remote {
            config.api_url = remote;
        }
        if api_token.is_some() {
            config.api_token = api_token;
        }
        return commands::init::handle(&config, &path, force, &mut io::stdout());
    }

    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if let Some(remote) = cli.remote {
        config.api_url = remote;
    }

    let remote = open_remote(&config).await?;
    let controller = SyncController::new(Arc::new(remote));
    let mut stdout = io::stdout();

    let result = match cli.command {
        Command::Init { .. } => unreachable!("init is handled before connecting"),
        Command::Show => commands::show::handle(&controller, &mut stdout).await,
        Command::Maps => commands::maps::handle(&controller, &mut stdout).await,
        Command::Flags => commands::flags::handle(&controller, &mut stdout).await,
        Command::Move { from, to } => {
            commands::edit::handle_move(&controller, &mut stdout, from, to).await
        }
        Command::Add { ids } => commands::edit::handle_add(&controller, &mut stdout, &ids).await,
        Command::Remove { position } => {
            commands::edit::handle_remove(&controller, &mut stdout, position).await
        }
        Command::Watch { interval } => {
            let period = interval
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| config.refresh_interval());
            if period.is_zero() {
                anyhow::bail!("--interval must be greater than zero");
            }
            commands::watch::handle(&controller, &mut stdout, period).await
        }
    };

    controller.shutdown();
    result
}
