mod config;
mod init;
mod server;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use portainer_core::{ClientOptions, PortainerClient};
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ServerArgs};
use crate::init::InitArgs;
use crate::server::PortainerServer;

/// MCP server exposing Portainer stack management over stdio.
#[derive(Debug, Parser)]
#[command(name = "portainer-mcp", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    server: ServerArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register portainer-mcp with Claude Code and/or Codex for the current project
    Init(InitArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Init(args)) = cli.command {
        return init::init_project(&args);
    }

    // stdout carries the MCP protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("portainer_mcp=info,portainer_core=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Config::from_args(cli.server)?;
    tracing::debug!(?config, "loaded configuration");

    if config.skip_tls_verify {
        tracing::warn!("TLS certificate verification is disabled");
    }

    let client = PortainerClient::new(
        &config.server_url,
        &config.token,
        ClientOptions {
            skip_tls_verify: config.skip_tls_verify,
        },
    )?;

    let server = PortainerServer::new(Arc::new(client), config.read_only);
    tracing::info!(
        server = %config.server_url,
        read_only = config.read_only,
        tools = ?server.tool_names(),
        "starting portainer-mcp"
    );

    let service = server
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "MCP server error"))?;
    service.waiting().await?;
    tracing::info!("portainer-mcp stopped");
    Ok(())
}
