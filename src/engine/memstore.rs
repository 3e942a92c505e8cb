use std::path::Path;
use std::sync::Arc;
use async_trait::async_trait;
use log::error;
use tokio::sync::RwLock;
use crate::{Book, BookPatch, NewBook, Result, Error, BookReader, BookWriter};
use crate::engine::{id, Persistence, StoreDocument};

/// The in-memory document, optionally backed by a file.
///
/// Reads share the lock. Mutations hold it exclusively until the document has
/// been flushed, so the file always reflects the latest in-memory state.
pub struct MemStore {
    doc: RwLock<StoreDocument>,
    persistence: Option<Arc<Persistence>>,
}

impl MemStore {
    pub fn new(initial: StoreDocument, persistence: Option<Arc<Persistence>>) -> Self {
        Self {
            doc: RwLock::new(initial),
            persistence,
        }
    }

    /// Loads the document at `path` and returns a store that flushes back to it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let persistence = Arc::new(Persistence::new(path)?);
        let initial = persistence.load()?;
        Ok(Self::new(initial, Some(persistence)))
    }

    async fn flush(&self, doc: &StoreDocument) -> Result<()> {
        if let Some(p) = &self.persistence {
            let p = p.clone();
            let snapshot = doc.clone();
            tokio::task::spawn_blocking(move || {
                let res = p.save(&snapshot);
                if let Err(e) = &res {
                    error!("Failed to flush store to {:?}: {}", p.path(), e);
                }
                res
            })
            .await
            .map_err(|e| Error::Internal(format!("flush task failed: {}", e)))??;
        }
        Ok(())
    }
}

#[async_trait]
impl BookReader for MemStore {
    async fn list(&self) -> Result<Vec<Book>> {
        Ok(self.doc.read().await.books.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Book>> {
        let doc = self.doc.read().await;
        Ok(doc.books.iter().find(|b| b.id == id).cloned())
    }
}

#[async_trait]
impl BookWriter for MemStore {
    async fn create(&self, new_book: NewBook) -> Result<Book> {
        let book = Book::new(id::generate(id::ID_LENGTH), new_book);
        let mut doc = self.doc.write().await;
        doc.books.push(book.clone());
        self.flush(&doc).await?;
        Ok(book)
    }

    async fn update(&self, id: &str, patch: BookPatch) -> Result<Book> {
        let mut doc = self.doc.write().await;
        let book = doc
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| Error::BookNotFound(id.to_string()))?;
        book.apply(patch)?;
        let updated = book.clone();
        self.flush(&doc).await?;
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> Result<Option<Book>> {
        let mut doc = self.doc.write().await;
        let pos = doc.books.iter().position(|b| b.id == id);
        let removed = pos.map(|pos| doc.books.remove(pos));
        self.flush(&doc).await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use tempfile::tempdir;

    fn doc_with(books: Vec<Book>) -> StoreDocument {
        StoreDocument { books, other: Map::new() }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemStore::new(StoreDocument::default(), None);
        let book = store.create(NewBook::new("Make it happen", "John Doe")).await.unwrap();

        assert_eq!(book.id.len(), id::ID_LENGTH);
        let found = store.find(&book.id).await.unwrap().unwrap();
        assert_eq!(found, book);
        assert_eq!(found.title.as_deref(), Some("Make it happen"));
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let store = MemStore::new(StoreDocument::default(), None);
        let a = store.create(NewBook::new("A", "x")).await.unwrap();
        let b = store.create(NewBook::new("B", "y")).await.unwrap();
        let c = store.create(NewBook::new("C", "z")).await.unwrap();
        store.remove(&b.id).await.unwrap();

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let store = MemStore::new(StoreDocument::default(), None);
        assert!(store.find("doesnotexist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemStore::new(StoreDocument::default(), None);
        let book = store.create(NewBook::new("Make it happen", "John Doe")).await.unwrap();

        let updated = store
            .update(&book.id, BookPatch::new().set("author", "Jane Doe"))
            .await
            .unwrap();
        assert_eq!(updated.title.as_deref(), Some("Make it happen"));
        assert_eq!(updated.author.as_deref(), Some("Jane Doe"));
        assert_eq!(store.find(&book.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let store = MemStore::new(StoreDocument::default(), None);
        let res = store.update("nope", BookPatch::new().set("title", "T")).await;
        assert!(matches!(res, Err(Error::BookNotFound(ref id)) if id == "nope"));
    }

    #[tokio::test]
    async fn test_remove_only_first_match() {
        let dup = |title: &str| Book::new("same", NewBook::new(title, "a"));
        let store = MemStore::new(doc_with(vec![dup("first"), dup("second")]), None);

        let removed = store.remove("same").await.unwrap().unwrap();
        assert_eq!(removed.title.as_deref(), Some("first"));

        let left = store.list().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_remove_missing_is_noop() {
        let store = MemStore::new(StoreDocument::default(), None);
        store.create(NewBook::new("A", "x")).await.unwrap();

        assert!(store.remove("nope").await.unwrap().is_none());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_matches_memory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let store = MemStore::open(&path).unwrap();
        let a = store.create(NewBook::new("A", "x")).await.unwrap();
        let b = store.create(NewBook { title: Some("B".into()), author: None }).await.unwrap();
        store.update(&a.id, BookPatch::new().set("title", "A2").set("pages", 120)).await.unwrap();
        store.remove(&b.id).await.unwrap();

        let reopened = MemStore::open(&path).unwrap();
        assert_eq!(reopened.list().await.unwrap(), store.list().await.unwrap());
    }

    #[tokio::test]
    async fn test_rejected_update_is_not_flushed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");

        let store = MemStore::open(&path).unwrap();
        let a = store.create(NewBook::new("A", "x")).await.unwrap();
        let res = store.update(&a.id, BookPatch::new().set("title", 7)).await;
        assert!(matches!(res, Err(Error::InvalidField { .. })));

        let reopened = MemStore::open(&path).unwrap();
        assert_eq!(reopened.find(&a.id).await.unwrap().unwrap(), a);
    }
}
