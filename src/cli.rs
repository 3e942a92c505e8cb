//! Embedded command-line client operating directly on the store file.

use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, Subcommand};
use crate::engine::MemStore;
use crate::{BookPatch, BookReader, BookWriter, NewBook};

#[derive(Parser, Debug)]
#[command(name = "bookshelf", author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "db.json")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    List,
    Get { id: String },
    Add {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    Remove { id: String },
}

/// Opens the store named by `cli.db` and runs the command, writing pretty
/// JSON (or `OK` for removals) to `out`.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    let store = MemStore::open(&cli.db)?;

    match cli.command {
        Commands::List => {
            let books = store.list().await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&books)?)?;
        }
        Commands::Get { id } => match store.find(&id).await? {
            Some(book) => writeln!(out, "{}", serde_json::to_string_pretty(&book)?)?,
            None => anyhow::bail!("no book with id {}", id),
        },
        Commands::Add { title, author } => {
            let book = store.create(NewBook { title, author }).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&book)?)?;
        }
        Commands::Update { id, title, author } => {
            let mut patch = BookPatch::new();
            if let Some(title) = title {
                patch = patch.set("title", title);
            }
            if let Some(author) = author {
                patch = patch.set("author", author);
            }
            if patch.is_empty() {
                anyhow::bail!("nothing to update: pass --title and/or --author");
            }
            let book = store.update(&id, patch).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&book)?)?;
        }
        Commands::Remove { id } => match store.remove(&id).await? {
            Some(_) => writeln!(out, "OK")?,
            None => writeln!(out, "OK (no book with id {})", id)?,
        },
    }

    Ok(())
}
