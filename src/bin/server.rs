use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use bookshelf::engine::MemStore;
use bookshelf::server::{Router, ServerConfig};
use bookshelf::BookReader;
use clap::Parser;
use log::info;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of the JSON store document
    #[arg(short, long)]
    db: Option<PathBuf>,

    #[arg(short, long)]
    port: Option<u16>,

    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = ServerConfig::from_env(args.port, args.host, args.db)?;

    let store = MemStore::open(&config.db_path)
        .with_context(|| format!("failed to load store document {:?}", config.db_path))?;
    let store = Arc::new(store);
    info!("Loaded {} books from {:?}", store.list().await?.len(), config.db_path);

    let router = Router::new(store, config);
    info!("API description at {}/api-docs", router.config().public_url());

    tokio::select! {
        res = router.listen() => {
            res.context("HTTP server failed")?;
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting.");
        }
    }

    Ok(())
}
