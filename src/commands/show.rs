//! Show a single entry

use anyhow::Result;

use crate::content::ContentKind;
use crate::Folio;

/// Print one entry; returns false when the slug does not resolve
pub async fn run(folio: &Folio, kind: ContentKind, slug: &str, json: bool) -> Result<bool> {
    let Some(entry) = folio.loader(kind).load(slug).await else {
        eprintln!("No {} found for slug {:?}", kind, slug);
        return Ok(false);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(true);
    }

    println!("slug: {}", entry.slug);
    if !entry.metadata.is_empty() {
        print!("{}", serde_yaml::to_string(&entry.metadata)?);
    }
    println!();
    println!("{}", entry.source);

    Ok(true)
}
