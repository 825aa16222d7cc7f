//! Content entries and their typed metadata views

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::error::Result;
use super::frontmatter::Metadata;

/// The kinds of content the site publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Book,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Post => f.write_str("post"),
            ContentKind::Book => f.write_str("book"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "post" | "posts" | "blog" => Ok(ContentKind::Post),
            "book" | "books" => Ok(ContentKind::Book),
            _ => Err(format!("Unknown type: {}. Available: post, book", s)),
        }
    }
}

/// A parsed content file: slug, front-matter and rendered body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// File name minus extension
    pub slug: String,

    /// Front-matter fields, unvalidated
    pub metadata: Metadata,

    /// Rendered HTML body
    pub source: String,
}

/// A blog post
pub type Post = ContentEntry;

/// A book note
pub type Book = ContentEntry;

impl ContentEntry {
    pub fn new(slug: impl Into<String>, metadata: Metadata, source: String) -> Self {
        Self {
            slug: slug.into(),
            metadata,
            source,
        }
    }

    /// Look up a front-matter field as a string
    ///
    /// Numbers and booleans are rendered with their YAML spelling; other
    /// values (and absent keys) yield `None`.
    pub fn meta_str(&self, key: &str) -> Option<String> {
        match self.metadata.get(key)? {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Deserialize the open metadata mapping into a typed view
    ///
    /// This is where schema validation happens; the loader itself never
    /// rejects an entry for missing fields.
    pub fn metadata_as<T: DeserializeOwned>(&self) -> Result<T> {
        let mapping: serde_yaml::Mapping = self
            .metadata
            .iter()
            .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.clone()))
            .collect();
        Ok(serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))?)
    }
}

/// Front-matter of a blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    pub title: String,
    pub published_at: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Topic key used to pick the post's icon
    #[serde(default)]
    pub about: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Where a book sits on the reading list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    Reading,
    Completed,
    ToRead,
}

/// Front-matter of a book note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub category: String,
    pub reading_status: ReadingStatus,
    pub description: String,
    #[serde(default)]
    pub published_date: Option<String>,
    /// Date the book was completed
    #[serde(default)]
    pub finished_on: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}
