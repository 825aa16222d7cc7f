//! Validate content files

use anyhow::Result;

use crate::content::{BookMetadata, ContentEntry, ContentKind, PostMetadata};
use crate::Folio;

/// A file that failed to load or whose metadata does not fit its schema
#[derive(Debug)]
pub struct Problem {
    pub kind: ContentKind,
    pub slug: String,
    pub message: String,
}

/// Load every entry of `kind` and collect what is wrong with it
pub async fn check_kind(folio: &Folio, kind: ContentKind) -> Vec<Problem> {
    let loader = folio.loader(kind);
    let mut problems = Vec::new();

    if let Err(e) = crate::content::list_content_files_checked(
        loader.dir(),
        loader.extension(),
        false,
    ) {
        problems.push(Problem {
            kind,
            slug: String::new(),
            message: e.to_string(),
        });
        return problems;
    }

    for (slug, result) in loader.load_all_checked().await {
        let message = match result {
            Ok(entry) => match validate(kind, &entry) {
                Ok(()) => continue,
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        };
        problems.push(Problem {
            kind,
            slug,
            message,
        });
    }

    problems.sort_by(|a, b| a.slug.cmp(&b.slug));
    problems
}

fn validate(kind: ContentKind, entry: &ContentEntry) -> crate::content::error::Result<()> {
    match kind {
        ContentKind::Post => entry.metadata_as::<PostMetadata>().map(|_| ()),
        ContentKind::Book => entry.metadata_as::<BookMetadata>().map(|_| ()),
    }
}

/// Check the given kinds; returns the number of problems found
pub async fn run(folio: &Folio, kinds: &[ContentKind]) -> Result<usize> {
    let mut total = 0;
    for &kind in kinds {
        let problems = check_kind(folio, kind).await;
        if problems.is_empty() {
            println!("{}: ok", kind);
        }
        for problem in &problems {
            if problem.slug.is_empty() {
                println!("{}: {}", problem.kind, problem.message);
            } else {
                println!("{} {:?}: {}", problem.kind, problem.slug, problem.message);
            }
        }
        total += problems.len();
    }
    Ok(total)
}
