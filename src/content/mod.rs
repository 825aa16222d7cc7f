//! Content module - front-matter, markdown rendering and entry loading

mod entry;
pub mod error;
mod frontmatter;
mod highlight;
pub mod loader;
mod markdown;

pub use entry::{
    Book, BookMetadata, ContentEntry, ContentKind, Post, PostMetadata, ReadingStatus,
};
pub use error::ContentError;
pub use frontmatter::{FrontMatter, Metadata};
pub use highlight::CodeHighlighter;
pub use loader::{list_content_files, list_content_files_checked, ContentLoader};
pub use markdown::MarkdownRenderer;
