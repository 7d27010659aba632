use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::sync::mpsc;

mod domain;
mod application;
mod infrastructure;

use application::errors::BotError;
use application::messaging::EventDispatcher;
use application::services::WelcomeOutcome;
use domain::entities::WelcomeConfiguration;
use domain::traits::{SettingsReader, SettingsStore};
use infrastructure::adapters::console::{joined_event, ConsoleAdapter};
use infrastructure::config::Config;
use infrastructure::host::Host;

#[derive(Parser)]
#[command(name = "welcome-bot")]
#[command(about = "Sends a configured welcome message to users joining a room", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Read `join <room> <username>` lines from stdin and welcome each user
    Run,
    /// Handle a single join event
    Join {
        /// Room display name (`-` for a room without one)
        room: String,
        /// Username of the joining user
        username: String,
    },
    /// Manage the welcome configuration setting
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current configuration JSON
    Get,
    /// Replace the configuration JSON (validated first)
    Set { json: String },
    /// Restore the packaged default
    Reset,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_console(&cli.config).await,
        Commands::Join { room, username } => join_once(&cli.config, &room, &username).await,
        Commands::Settings { action } => manage_settings(&cli.config, action).await,
        Commands::Version => {
            println!("welcome-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

async fn open_host(config_path: &str) -> Result<Host, BotError> {
    let config = load_config(config_path);
    tracing::info!("Starting welcome-bot as @{}", config.bot.username);

    let host = Host::open(&config)?;
    host.register().await?;
    Ok(host)
}

async fn run_console(config_path: &str) -> Result<(), BotError> {
    let host = open_host(config_path).await?;
    let service = host.welcome_service(Arc::new(ConsoleAdapter::new()));
    let dispatcher = EventDispatcher::new(Arc::new(service));

    println!("Type `join <room> <username>` to simulate a join, `quit` to exit.");

    let (tx, rx) = mpsc::channel(32);
    let reader = tokio::spawn(ConsoleAdapter::read_events(tokio::io::BufReader::new(tokio::io::stdin()), tx));

    dispatcher.run(rx).await;

    match reader.await {
        Ok(result) => result,
        Err(e) => Err(BotError::InvalidInput(format!("console reader stopped: {}", e))),
    }
}

async fn join_once(config_path: &str, room: &str, username: &str) -> Result<(), BotError> {
    let host = open_host(config_path).await?;
    let service = host.welcome_service(Arc::new(ConsoleAdapter::new()));

    match service.on_user_joined(&joined_event(room, username)).await? {
        WelcomeOutcome::Sent { room_id, .. } => tracing::info!("Delivered into room {}", room_id),
        outcome => println!("No welcome sent: {:?}", outcome),
    }
    Ok(())
}

async fn manage_settings(config_path: &str, action: SettingsAction) -> Result<(), BotError> {
    let host = open_host(config_path).await?;
    let id = host.setting_id().to_string();
    let settings = host.settings();

    match action {
        SettingsAction::Get => {
            let value = settings.get_value(&id).await?.unwrap_or_default();
            println!("{}", value);
        }
        SettingsAction::Set { json } => {
            let parsed = WelcomeConfiguration::parse(&json).map_err(|e| BotError::Welcome(e.into()))?;
            if parsed.is_empty() {
                tracing::warn!("Configuration has no welcome rules, nobody will be greeted");
            }
            settings.set_value(&id, &json).await?;
            println!("Saved {} welcome rule(s)", parsed.len());
        }
        SettingsAction::Reset => {
            settings.reset_value(&id).await?;
            println!("Restored default welcome configuration");
        }
    }
    Ok(())
}

fn init_config(config_path: &str) -> Result<(), BotError> {
    if std::path::Path::new(config_path).exists() {
        return Err(BotError::InvalidInput(format!("{} already exists", config_path)));
    }
    let yaml = Config::default().to_yaml()?;
    std::fs::write(config_path, yaml)?;
    println!("Created {}", config_path);
    Ok(())
}
