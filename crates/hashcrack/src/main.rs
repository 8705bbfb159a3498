//! # hashcrack MCP Server
//!
//! Model Context Protocol server that runs hashcat cracking sessions in the
//! background and reports their progress.
//!
//! ## Overview
//!
//! This server provides MCP tools for:
//! - Configuration discovery (supported hash types)
//! - Session management (start, get, list, stop)
//!
//! ## Architecture
//!
//! This is Layer 3 - the MCP server binary that ties together:
//! - hashcrack-core: Core types, configuration and hashing
//! - hashcrack-parser: hashcat output parsing
//! - hashcrack-launcher: Process launching
//! - hashcrack-session: Session lifecycle

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hashcrack::HashcrackServer;
use hashcrack_core::ServerConfig;
use rmcp::{transport::stdio, ServiceExt};

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "hashcrack", version, about = "MCP server for hashcat cracking sessions")]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overriding the configuration (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.server.log_level.clone());

    // Initialize logging; stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "hashcrack MCP Server v{} starting (hashcat: {}, work dir: {})",
        env!("CARGO_PKG_VERSION"),
        config.cracker.bin_path,
        config.cracker.work_dir.display()
    );

    let server = HashcrackServer::from_config(config);

    tracing::info!("Server initialized, starting stdio transport...");

    // Serve the MCP server over stdio
    let service = server.serve(stdio()).await.map_err(|e| {
        tracing::error!("Error starting server: {}", e);
        e
    })?;

    tracing::info!("hashcrack MCP Server running on stdio");

    // Wait for the service to complete
    service.waiting().await?;

    tracing::info!("hashcrack MCP Server shutting down");

    Ok(())
}
