//! weft: fetch data from a network of gateway nodes of varying reliability.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    cli::run(App::parse()).await
}
