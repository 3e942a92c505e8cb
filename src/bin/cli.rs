use bookshelf::cli::{self, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cli::run(cli, &mut std::io::stdout().lock()).await
}
