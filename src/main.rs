use serenity::client::Client;
use serenity::model::gateway::GatewayIntents;
use songbird::driver::DecodeMode;
use songbird::{Config as DriverConfig, SerenityInit};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use voicetag::{BotError, Config, Handler};

#[tokio::main]
async fn main() {
    // Mirror of the original deployment setup: a .env file is optional.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "voicetag=info".into()))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), BotError> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES;

    // Decrypt incoming packets but skip opus decoding; only packet
    // metadata is reported.
    let driver_config = DriverConfig::default().decode_mode(DecodeMode::Decrypt);

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler::new())
        .register_songbird_from_config(driver_config)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await?;
    Ok(())
}
