//! Content loader - loads posts and books from their content directories

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use walkdir::WalkDir;

use super::error::{ContentError, Result};
use super::{ContentEntry, FrontMatter, MarkdownRenderer};
use crate::cache::{self, ContentCache};

/// Default extension of content files
pub const DEFAULT_EXTENSION: &str = "mdx";

/// Loads entries from a single content directory
#[derive(Clone)]
pub struct ContentLoader {
    dir: PathBuf,
    extension: String,
    renderer: Arc<MarkdownRenderer>,
    cache: Option<Arc<ContentCache>>,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new<P: AsRef<Path>>(dir: P, renderer: Arc<MarkdownRenderer>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
            renderer,
            cache: None,
        }
    }

    /// Recognize files with `extension` (without the dot) instead of `mdx`
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Serve unchanged files from `cache`
    pub fn with_cache(mut self, cache: Arc<ContentCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn cache(&self) -> Option<&ContentCache> {
        self.cache.as_deref()
    }

    /// Path of the file backing `slug`
    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, self.extension))
    }

    /// Content files directly inside this loader's directory
    pub fn list_files(&self) -> Vec<PathBuf> {
        list_content_files(&self.dir, &self.extension, false)
    }

    /// Load a single entry; `None` when it is missing or broken
    pub async fn load(&self, slug: &str) -> Option<ContentEntry> {
        match self.load_checked(slug).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::error!("Error reading {} for slug {:?}: {}", self.dir.display(), slug, e);
                None
            }
        }
    }

    /// Load a single entry, reporting why it could not be loaded
    pub async fn load_checked(&self, slug: &str) -> Result<ContentEntry> {
        if !is_plain_slug(slug) {
            return Err(ContentError::NotFound(slug.to_string()));
        }

        let path = self.path_for(slug);
        let mtime = match cache::get_mtime(&path).await {
            Ok(mtime) => Some(mtime),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(cache) = &self.cache {
                    cache.invalidate(slug);
                }
                return Err(ContentError::NotFound(slug.to_string()));
            }
            // Some platforms have no mtime; read without caching
            Err(_) => None,
        };

        if let (Some(cache), Some(mtime)) = (&self.cache, mtime) {
            if let Some(entry) = cache.get(slug, mtime) {
                return Ok(entry);
            }
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => ContentError::NotFound(slug.to_string()),
                _ => ContentError::Read {
                    path: path.clone(),
                    source,
                },
            })?;

        let (fm, body) = FrontMatter::parse(&content)?;
        let source = self.renderer.render(body);
        let entry = ContentEntry::new(slug, fm.into_metadata(), source);

        if let (Some(cache), Some(mtime)) = (&self.cache, mtime) {
            cache.insert(slug, mtime, entry.clone());
        }

        Ok(entry)
    }

    /// Load every entry in the directory, dropping the ones that fail
    ///
    /// Order follows load completion, not the directory listing.
    pub async fn load_all(&self) -> Vec<ContentEntry> {
        self.load_all_checked()
            .await
            .into_iter()
            .filter_map(|(slug, result)| match result {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", slug, e);
                    None
                }
            })
            .collect()
    }

    /// Load every entry in the directory, keeping failures next to their slug
    pub async fn load_all_checked(&self) -> Vec<(String, Result<ContentEntry>)> {
        let dir = self.dir.clone();
        let extension = self.extension.clone();
        let files = tokio::task::spawn_blocking(move || list_content_files(&dir, &extension, false))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Directory listing task failed: {}", e);
                Vec::new()
            });

        let slugs: Vec<String> = files
            .iter()
            .filter_map(|file| {
                let slug = slug_of(file);
                if slug.is_none() {
                    tracing::warn!("Skipping file with non UTF-8 name: {:?}", file);
                }
                slug
            })
            .collect();

        // Renamed or deleted files would otherwise keep their entries forever
        if let Some(cache) = &self.cache {
            let dropped = cache.retain_slugs(&slugs);
            if dropped > 0 {
                tracing::debug!("Dropped {} cached entries without a source file", dropped);
            }
        }

        let mut tasks = JoinSet::new();
        for slug in slugs {
            let loader = self.clone();
            tasks.spawn(async move {
                let result = loader.load_checked(&slug).await;
                (slug, result)
            });
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!("Load task failed: {}", e),
            }
        }

        results
    }
}

/// List files with the content extension, in directory order
///
/// Unreadable directories are logged and treated as empty.
pub fn list_content_files(dir: &Path, extension: &str, recursive: bool) -> Vec<PathBuf> {
    match list_content_files_checked(dir, extension, recursive) {
        Ok(files) => files,
        Err(e) => {
            tracing::error!("Error reading directory {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}

/// List files with the content extension, in directory order
///
/// With `recursive`, each subdirectory's files follow the directory's own
/// files. A subdirectory that cannot be read contributes nothing; only a
/// failure on `dir` itself is an error.
pub fn list_content_files_checked(
    dir: &Path,
    extension: &str,
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut folders = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| ContentError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let file_type = entry.file_type();
        if file_type.is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        } else if recursive && file_type.is_dir() {
            folders.push(entry.into_path());
        }
    }

    for folder in folders {
        files.extend(list_content_files(&folder, extension, true));
    }

    Ok(files)
}

/// Slug of a content file: its name minus the extension
pub fn slug_of(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Check if a file has the content extension
fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == extension)
        .unwrap_or(false)
}

/// Slugs name a file directly inside the content directory
fn is_plain_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn renderer() -> Arc<MarkdownRenderer> {
        Arc::new(MarkdownRenderer::new())
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    const HELLO: &str = "---\ntitle: Hello World\npublishedAt: 2024-01-01\n---\n# Hi\nThis is **bold**.\n";

    #[tokio::test]
    async fn test_load_hello() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "hello.md", HELLO);

        let loader = ContentLoader::new(dir.path(), renderer()).with_extension("md");
        let post = loader.load("hello").await.unwrap();

        assert_eq!(post.slug, "hello");
        assert_eq!(post.metadata.len(), 2);
        assert_eq!(post.metadata["title"], Value::String("Hello World".into()));
        assert_eq!(post.metadata["publishedAt"], Value::String("2024-01-01".into()));
        assert!(post.source.contains("<h1>Hi</h1>"));
        assert!(post.source.contains("<strong>bold</strong>"));
    }

    #[tokio::test]
    async fn test_load_without_frontmatter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "plain.mdx", "Just text.\n");

        let loader = ContentLoader::new(dir.path(), renderer());
        let post = loader.load("plain").await.unwrap();
        assert!(post.metadata.is_empty());
        assert_eq!(post.source, "<p>Just text.</p>\n");
    }

    #[tokio::test]
    async fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path(), renderer());

        assert!(loader.load("missing").await.is_none());
        assert!(matches!(
            loader.load_checked("missing").await,
            Err(ContentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_paths() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("content");
        fs::create_dir(&nested).unwrap();
        write(dir.path(), "secret.mdx", "outside");

        let loader = ContentLoader::new(&nested, renderer());
        assert!(loader.load("../secret").await.is_none());
        assert!(loader.load("").await.is_none());
    }

    #[tokio::test]
    async fn test_load_malformed_frontmatter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "broken.mdx", "---\ntitle: [oops\n---\nbody");

        let loader = ContentLoader::new(dir.path(), renderer());
        assert!(loader.load("broken").await.is_none());
        assert!(matches!(
            loader.load_checked("broken").await,
            Err(ContentError::FrontMatter(_))
        ));
    }

    #[tokio::test]
    async fn test_load_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("binary.mdx"), [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let loader = ContentLoader::new(dir.path(), renderer());
        assert!(matches!(
            loader.load_checked("binary").await,
            Err(ContentError::Read { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_all_skips_broken_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "one.mdx", "---\ntitle: One\n---\nFirst");
        write(dir.path(), "two.mdx", "---\ntitle: Two\n---\nSecond");
        write(dir.path(), "three.mdx", "No front-matter at all");
        write(dir.path(), "bad.mdx", "---\ntitle: [oops\n---\nbody");
        write(dir.path(), "worse.mdx", "---\n- not\n- a mapping\n---\n");
        write(dir.path(), "notes.txt", "---\ntitle: Ignored\n---\n");
        fs::create_dir(dir.path().join("drafts")).unwrap();
        write(&dir.path().join("drafts"), "draft.mdx", "---\ntitle: Draft\n---\n");

        let loader = ContentLoader::new(dir.path(), renderer());
        let mut slugs: Vec<_> = loader
            .load_all()
            .await
            .into_iter()
            .map(|e| e.slug)
            .collect();
        slugs.sort();
        assert_eq!(slugs, vec!["one", "three", "two"]);

        let checked = loader.load_all_checked().await;
        assert_eq!(checked.len(), 5);
        assert_eq!(checked.iter().filter(|(_, r)| r.is_err()).count(), 2);
    }

    #[tokio::test]
    async fn test_load_all_missing_directory() {
        let dir = TempDir::new().unwrap();
        let loader = ContentLoader::new(dir.path().join("nope"), renderer());
        assert!(loader.load_all().await.is_empty());
    }

    #[test]
    fn test_list_content_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.mdx", "");
        write(dir.path(), "b.md", "");
        write(dir.path(), ".mdx", "");
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write(&sub, "c.mdx", "");
        let deeper = sub.join("deeper");
        fs::create_dir(&deeper).unwrap();
        write(&deeper, "d.mdx", "");

        let flat = list_content_files(dir.path(), "mdx", false);
        assert_eq!(flat, vec![dir.path().join("a.mdx")]);

        let all = list_content_files(dir.path(), "mdx", true);
        assert_eq!(
            all,
            vec![
                dir.path().join("a.mdx"),
                sub.join("c.mdx"),
                deeper.join("d.mdx"),
            ]
        );
    }

    #[test]
    fn test_list_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(list_content_files(&missing, "mdx", true).is_empty());
        assert!(matches!(
            list_content_files_checked(&missing, "mdx", false),
            Err(ContentError::ReadDir { .. })
        ));
    }

    #[tokio::test]
    async fn test_cache_serves_until_mtime_changes() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "cached.mdx", "---\ntitle: v1\n---\nfirst");
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(base)
            .unwrap();

        let cache = Arc::new(ContentCache::new());
        let loader = ContentLoader::new(dir.path(), renderer()).with_cache(cache.clone());

        let first = loader.load("cached").await.unwrap();
        assert_eq!(first.metadata["title"], Value::String("v1".into()));
        assert_eq!(cache.len(), 1);

        // Same mtime: the stale cached copy is served
        fs::write(&path, "---\ntitle: v2\n---\nsecond").unwrap();
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(base)
            .unwrap();
        let again = loader.load("cached").await.unwrap();
        assert_eq!(again.metadata["title"], Value::String("v1".into()));

        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(base + Duration::from_secs(5))
            .unwrap();
        let fresh = loader.load("cached").await.unwrap();
        assert_eq!(fresh.metadata["title"], Value::String("v2".into()));

        fs::remove_file(&path).unwrap();
        assert!(loader.load("cached").await.is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_load_all_forgets_renamed_files() {
        let dir = TempDir::new().unwrap();
        let old = write(dir.path(), "draft.mdx", "---\ntitle: Draft\n---\nbody");
        write(dir.path(), "kept.mdx", "kept");

        let cache = Arc::new(ContentCache::new());
        let loader = ContentLoader::new(dir.path(), renderer()).with_cache(cache.clone());
        assert_eq!(loader.load_all().await.len(), 2);
        assert_eq!(cache.len(), 2);

        fs::rename(&old, dir.path().join("published.mdx")).unwrap();
        let mut slugs: Vec<String> = loader
            .load_all()
            .await
            .into_iter()
            .map(|e| e.slug)
            .collect();
        slugs.sort();
        assert_eq!(slugs, vec!["kept", "published"]);
        assert_eq!(cache.len(), 2);
        assert!(!cache.invalidate("draft"));

        fs::remove_file(dir.path().join("kept.mdx")).unwrap();
        assert_eq!(loader.load_all().await.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_slug_of() {
        assert_eq!(slug_of(Path::new("/a/b/hello.mdx")).as_deref(), Some("hello"));
        assert_eq!(slug_of(Path::new("v1.2.mdx")).as_deref(), Some("v1.2"));
    }
}
