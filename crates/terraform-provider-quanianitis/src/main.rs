use std::sync::Arc;
use terraform_provider_quanianitis::{QuanianitisProvider, logging, serve};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting quanianitis provider"
    );

    let provider = Arc::new(QuanianitisProvider::from_env()?);

    serve(
        provider,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}
