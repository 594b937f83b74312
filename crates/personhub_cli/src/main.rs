//! `personhub` server entry point.
//!
//! # Responsibility
//! - Load configuration, initialize logging, open the database pool.
//! - Wire repository → service → router and serve until Ctrl-C.

mod config;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::{Cli, ServerConfig};
use log::info;
use personhub_core::{init_logging, DbPool, PersonService, SqlitePersonRepository};
use personhub_http::{build_router, serve, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::load(&cli.config)?.apply_cli(&cli);

    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(|err| anyhow!(err))?;
    if config.debug {
        info!("event=debug_mode module=cli status=on");
    }

    let pool = match config.database.path.as_ref() {
        Some(path) => DbPool::open(path, config.database.pool_size)
            .with_context(|| format!("failed to open database `{}`", path.display()))?,
        None => DbPool::open_in_memory().context("failed to open in-memory database")?,
    };
    info!(
        "event=pool_ready module=cli status=ok max_size={} version={}",
        pool.max_size(),
        personhub_core::core_version()
    );

    let service = PersonService::new(SqlitePersonRepository::new(pool));
    let router = build_router(AppState::new(service));

    serve(&config.server.address, router)
        .await
        .with_context(|| format!("server failed on `{}`", config.server.address))
}
