use std::path::Path;

use anyhow::{Context, Result};
use futures_util::TryStreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::info;
use weft_fetch::{Gateway, GatewayConfig, ReqwestClient, RetryOptions};

use super::app::{App, Commands, GetArg, HashListArg, InfoArg, NodesArg};

type Client = ReqwestClient;

pub async fn run(app: App) -> Result<()> {
    let config = GatewayConfig::from_env().context("invalid configuration")?;
    let gateway = Gateway::new(ReqwestClient::new()?, &config);

    match app.cmd {
        Commands::Info(arg) => info(&gateway, arg).await,
        Commands::HashList(arg) => hash_list(&gateway, arg).await,
        Commands::Get(arg) => get(&gateway, arg).await,
        Commands::Nodes(arg) => nodes(&gateway, arg).await,
    }
}

fn retry_options(wait: bool) -> RetryOptions {
    if wait { RetryOptions::eventual() } else { RetryOptions::default() }
}

async fn info(gateway: &Gateway<Client>, arg: InfoArg) -> Result<()> {
    let info = gateway
        .info(&retry_options(arg.wait))
        .await
        .context("failed to query node info")?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

async fn hash_list(gateway: &Gateway<Client>, arg: HashListArg) -> Result<()> {
    let list = gateway.hash_list().await.context("failed to load the hash_list")?;
    let limit = arg.limit.unwrap_or(list.len());
    for hash in list.iter().take(limit) {
        println!("{hash}");
    }
    Ok(())
}

async fn get(gateway: &Gateway<Client>, arg: GetArg) -> Result<()> {
    let options = retry_options(arg.wait);
    let mut out = sink(arg.output.as_deref()).await?;

    let written = if arg.chunks {
        let data = gateway
            .data_from_chunks(&arg.id, &options)
            .await
            .with_context(|| format!("failed to reassemble {}", arg.id))?;
        out.write_all(&data).await?;
        data.len() as u64
    } else if arg.decode {
        let mut body = gateway
            .decoded_data_stream(&arg.id, &options)
            .await
            .with_context(|| format!("failed to fetch {}", arg.id))?;
        let mut written = 0u64;
        while let Some(piece) = body.try_next().await? {
            out.write_all(&piece).await?;
            written += piece.len() as u64;
        }
        written
    } else {
        let data = gateway
            .data(&arg.id, &options)
            .await
            .with_context(|| format!("failed to fetch {}", arg.id))?;
        out.write_all(&data).await?;
        data.len() as u64
    };

    out.flush().await?;
    info!(id = %arg.id, bytes = written, "payload written");
    Ok(())
}

async fn nodes(gateway: &Gateway<Client>, arg: NodesArg) -> Result<()> {
    if arg.discover
        && let Some(handle) = gateway.discovery().discover_once()
    {
        handle.await.context("discovery task panicked")?;
    }

    for node in gateway.registry().snapshot() {
        println!("{:>3}  {}", node.weight, node.endpoint);
    }
    Ok(())
}

async fn sink(output: Option<&Path>) -> Result<Box<dyn AsyncWrite + Unpin + Send>> {
    Ok(match output {
        Some(path) => Box::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdout()),
    })
}
