use discord_rs::application::client::Client;
use discord_rs::application::config::{ConfigFile, DEFAULT_CONFIG_PATH};
use discord_rs::model::events::Event;
use discord_rs::utils::setup_logger;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();

    let mut client = Client::new();
    println!("{client}");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    info!("Reading configuration from {}", path);
    let config = ConfigFile::from_path(&path)?;

    client.login(config.token).await?;
    info!("Logged in, press Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received");
                break;
            }
            event = client.next_event() => match event {
                Some(Event::MessageCreate(message)) => {
                    info!("#{} {}: {}", message.channel_id, message.author.tag(), message.content);
                }
                Some(Event::Unknown { name, data }) => {
                    info!("{}: {}", name, serde_json::to_string(&data)?);
                }
                Some(event) => info!("Event: {}", event.name()),
                None => {
                    error!("Gateway connection stopped");
                    break;
                }
            },
        }
    }

    client.shutdown().await?;
    Ok(())
}
