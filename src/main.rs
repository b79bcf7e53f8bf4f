use calvox::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting calvox");

    // Load configuration
    let config = startup::load_config().await?;

    // Run the assistant
    startup::run(config).await
}
