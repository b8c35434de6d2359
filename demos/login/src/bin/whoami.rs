use discord_rs::application::client::Client;
use discord_rs::application::config::ConfigFile;
use discord_rs::application::interfaces::user::UserService;
use discord_rs::utils::setup_logger;
use tracing::info;

/// Checks a token over REST only, without opening the gateway
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger();

    let config = ConfigFile::load_default()?;
    let token = config.token.ok_or("config.json has no token")?;

    let client = Client::new();
    client
        .http()
        .set_token(discord_rs::application::auth::Token::new(token)?)
        .await;

    let user = client.get_current_user().await?;
    info!("Token belongs to {} ({})", user.username, user.id);

    let gateway = client.get_gateway_bot().await?;
    info!("Gateway details: {:#?}", gateway);

    Ok(())
}
