use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use vasya_bot::application::errors::BotError;
use vasya_bot::application::services::{Startup, StickerManager};
use vasya_bot::domain::traits::StickerSetSource;
use vasya_bot::infrastructure::adapters::telegram::TelegramAdapter;
use vasya_bot::infrastructure::config::{load_dotenv, log_level, BotConfig, ProcessEnv};

#[derive(Parser)]
#[command(name = "vasya-bot")]
#[command(about = "Startup checks for the Вася group-chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// .env file to seed the environment from (default: ./.env if present)
    #[arg(short, long, global = true)]
    env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load configuration, resolve credentials and load the sticker pack
    Check {
        /// Skip Telegram API calls
        #[arg(long)]
        offline: bool,
    },
    /// Load the configured sticker pack and list it
    Stickers,
    /// Print a .env template
    InitEnv,
    /// Show version
    Version,
}

fn init_logging(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("vasya-bot v{}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Commands::InitEnv => {
            print!("{}", BotConfig::env_template());
            println!("\n# Save this to .env and fill in the keys.");
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let dotenv = match load_dotenv(cli.env_file.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&log_level(&ProcessEnv));
    match &dotenv {
        Some(path) => tracing::debug!("Loaded environment from {}", path.display()),
        None => tracing::debug!("No .env file found, using process environment only"),
    }

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Check { offline } => check(&config, offline).await,
            Commands::Stickers => list_stickers(&config).await,
            Commands::InitEnv | Commands::Version => Ok(()),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(BotError::Config(e)) => {
            eprintln!("Configuration error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn check(config: &BotConfig, offline: bool) -> Result<(), BotError> {
    tracing::info!("Starting {} (sticker pack: {})", config.bot_name, config.sticker_pack_id);
    println!("{}\n", config.summary());

    let adapter = TelegramAdapter::new(&config.telegram_token);
    if !offline {
        match adapter.get_me().await {
            Ok(me) => tracing::info!(
                "Telegram bot: @{}",
                me.username.as_deref().unwrap_or(&me.first_name)
            ),
            Err(e) => tracing::warn!("Failed to fetch bot info: {}", e),
        }
    }

    let source: Option<&dyn StickerSetSource> = if offline { None } else { Some(&adapter) };
    let mut stickers = StickerManager::new();
    let report = Startup::new(config)
        .run(&mut stickers, source, chrono::Utc::now())
        .await?;

    println!("{}", report);
    Ok(())
}

async fn list_stickers(config: &BotConfig) -> Result<(), BotError> {
    let adapter = TelegramAdapter::new(&config.telegram_token);
    let set = adapter.get_sticker_set(&config.sticker_pack_id).await?;

    println!("{}: {} ({} stickers)", set.name, set.title, set.stickers.len());
    for sticker in &set.stickers {
        println!(
            "  {} {}",
            sticker.emoji.as_deref().unwrap_or(" "),
            sticker.file_id
        );
    }
    Ok(())
}
