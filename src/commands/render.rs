//! Render a single markdown file to HTML

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::FrontMatter;
use crate::Folio;

/// Render the body of `path` and return the HTML
pub fn render_file(folio: &Folio, path: &Path) -> Result<String> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let (_, body) =
        FrontMatter::parse(&content).with_context(|| format!("Failed to parse {:?}", path))?;
    let html = folio.renderer().try_render(body)?;
    Ok(html)
}

pub fn run(folio: &Folio, path: &Path) -> Result<()> {
    print!("{}", render_file(folio, path)?);
    Ok(())
}
