use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::{Error, Result};

/// A single book record as stored in the `books` collection.
///
/// `title` and `author` may be unset: creation does not require them and an
/// update may set them to `null`. An unset field is written as `null`. Fields
/// other than these three can be introduced through an update and are kept
/// alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Book {
    pub fn new(id: impl Into<String>, new_book: NewBook) -> Self {
        Self {
            id: id.into(),
            title: new_book.title,
            author: new_book.author,
            extra: Map::new(),
        }
    }

    /// Shallow-merges `patch` into this record.
    ///
    /// Each field present in the patch overwrites the stored one; absent fields
    /// are left alone. `id` is never overwritten. The merge is all-or-nothing:
    /// if any field is rejected the record is unchanged.
    pub fn apply(&mut self, patch: BookPatch) -> Result<()> {
        let mut merged = self.clone();
        for (key, value) in patch.0 {
            match key.as_str() {
                "id" => continue,
                "title" => merged.title = string_field("title", value)?,
                "author" => merged.author = string_field("author", value)?,
                _ => {
                    merged.extra.insert(key, value);
                }
            }
        }
        *self = merged;
        Ok(())
    }
}

fn string_field(field: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(Error::InvalidField {
            field: field.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}

/// The body accepted when creating a book. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
        }
    }
}

/// An arbitrary set of fields to merge into an existing book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookPatch(Map<String, Value>);

impl BookPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to the patch, replacing any earlier value for it.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for BookPatch {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
