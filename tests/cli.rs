use std::path::Path;
use bookshelf::cli::{self, Cli, Commands};
use bookshelf::Book;
use clap::Parser;
use serde_json::Value;
use tempfile::tempdir;

async fn run_args(db: &Path, args: &[&str]) -> anyhow::Result<String> {
    let db = db.to_str().unwrap();
    let prefix = ["bookshelf", "--db", db];
    let argv = prefix.iter().chain(args.iter()).copied();
    let cli = Cli::try_parse_from(argv)?;

    let mut out = Vec::new();
    cli::run(cli, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_parse_update_flags() {
    let cli = Cli::try_parse_from(["bookshelf", "update", "abc", "--author", "Jane Doe"]).unwrap();
    assert_eq!(cli.db.to_str(), Some("db.json"));
    match cli.command {
        Commands::Update { id, title, author } => {
            assert_eq!(id, "abc");
            assert!(title.is_none());
            assert_eq!(author.as_deref(), Some("Jane Doe"));
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_parse_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["bookshelf", "frobnicate"]).is_err());
}

#[tokio::test]
async fn test_add_get_update_remove() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db.json");

    let out = run_args(&db, &["add", "--title", "Make it happen", "--author", "John Doe"]).await.unwrap();
    let book: Book = serde_json::from_str(&out).unwrap();
    assert_eq!(book.id.len(), 8);

    let out = run_args(&db, &["get", &book.id]).await.unwrap();
    assert_eq!(serde_json::from_str::<Book>(&out).unwrap(), book);

    let out = run_args(&db, &["update", &book.id, "--author", "Jane Doe"]).await.unwrap();
    let updated: Book = serde_json::from_str(&out).unwrap();
    assert_eq!(updated.title.as_deref(), Some("Make it happen"));
    assert_eq!(updated.author.as_deref(), Some("Jane Doe"));

    let out = run_args(&db, &["list"]).await.unwrap();
    let list: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);

    let out = run_args(&db, &["remove", &book.id]).await.unwrap();
    assert_eq!(out.trim(), "OK");

    let out = run_args(&db, &["list"]).await.unwrap();
    assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), Value::Array(vec![]));
}

#[tokio::test]
async fn test_update_without_fields_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db.json");

    let out = run_args(&db, &["add", "--title", "T", "--author", "A"]).await.unwrap();
    let book: Book = serde_json::from_str(&out).unwrap();

    let err = run_args(&db, &["update", &book.id]).await.unwrap_err();
    assert!(err.to_string().contains("nothing to update"));

    let out = run_args(&db, &["get", &book.id]).await.unwrap();
    assert_eq!(serde_json::from_str::<Book>(&out).unwrap(), book);
}

#[tokio::test]
async fn test_get_unknown_id_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db.json");

    let err = run_args(&db, &["get", "doesnotexist"]).await.unwrap_err();
    assert!(err.to_string().contains("doesnotexist"));
}

#[tokio::test]
async fn test_remove_unknown_id_succeeds() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("db.json");

    let out = run_args(&db, &["remove", "nope"]).await.unwrap();
    assert!(out.starts_with("OK"));
}
