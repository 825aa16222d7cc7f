//! folio: the content pipeline behind a portfolio and blog site
//!
//! Posts and book notes live as MDX files with YAML front-matter. This
//! crate discovers them, parses the front-matter into an open metadata
//! mapping and renders the Markdown body to HTML with light/dark syntax
//! highlighting.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cache::ContentCache;
use content::{Book, ContentKind, ContentLoader, MarkdownRenderer, Post};

/// The main application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Blog post directory
    pub content_dir: PathBuf,
    /// Book note directory
    pub books_dir: PathBuf,
    renderer: Arc<MarkdownRenderer>,
    post_cache: Arc<ContentCache>,
    book_cache: Arc<ContentCache>,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(config.dir_for(ContentKind::Post));
        let books_dir = base_dir.join(config.dir_for(ContentKind::Book));
        let renderer = Arc::new(MarkdownRenderer::with_options(
            &config.markdown,
            &config.highlight,
        ));

        Self {
            config,
            base_dir,
            content_dir,
            books_dir,
            renderer,
            post_cache: Arc::new(ContentCache::new()),
            book_cache: Arc::new(ContentCache::new()),
        }
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Directory holding a content kind
    pub fn dir_for(&self, kind: ContentKind) -> &Path {
        match kind {
            ContentKind::Post => &self.content_dir,
            ContentKind::Book => &self.books_dir,
        }
    }

    /// Entry cache of a content kind, used only when caching is enabled
    pub fn cache_for(&self, kind: ContentKind) -> &Arc<ContentCache> {
        match kind {
            ContentKind::Post => &self.post_cache,
            ContentKind::Book => &self.book_cache,
        }
    }

    /// Loader for a content kind
    pub fn loader(&self, kind: ContentKind) -> ContentLoader {
        let loader = ContentLoader::new(self.dir_for(kind), self.renderer.clone())
            .with_extension(&self.config.extension);
        if self.config.cache {
            loader.with_cache(self.cache_for(kind).clone())
        } else {
            loader
        }
    }

    /// All blog posts, unsorted
    pub async fn posts(&self) -> Vec<Post> {
        self.loader(ContentKind::Post).load_all().await
    }

    /// A single blog post
    pub async fn post(&self, slug: &str) -> Option<Post> {
        self.loader(ContentKind::Post).load(slug).await
    }

    /// All book notes, unsorted
    pub async fn books(&self) -> Vec<Book> {
        self.loader(ContentKind::Book).load_all().await
    }

    /// A single book note
    pub async fn book(&self, slug: &str) -> Option<Book> {
        self.loader(ContentKind::Book).load(slug).await
    }
}
