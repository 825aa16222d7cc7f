//! Errors raised inside the content pipeline
//!
//! Public loader operations swallow these after logging them; the
//! `*_checked` variants return them so callers (and tests) can see what
//! went wrong.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no content found for slug {0:?}")]
    NotFound(String),

    #[error("invalid front-matter: {0}")]
    FrontMatter(String),

    #[error("failed to render markdown: {0}")]
    Render(String),

    #[error("metadata does not match schema: {0}")]
    Metadata(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ContentError>;
