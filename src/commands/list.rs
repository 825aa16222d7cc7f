//! List site content

use anyhow::Result;

use crate::content::{ContentEntry, ContentKind};
use crate::helpers::{format_date, reading_time, sort_posts, Bookshelf};
use crate::Folio;

/// List site content by type
pub async fn run(folio: &Folio, kind: ContentKind) -> Result<()> {
    match kind {
        ContentKind::Post => {
            let mut posts = folio.posts().await;
            sort_posts(&mut posts);
            println!("Posts ({}):", posts.len());
            for post in &posts {
                println!(
                    "  {} - {} [{}] {} min read",
                    post.meta_str("publishedAt")
                        .map(|d| format_date(&d, true))
                        .unwrap_or_else(|| "undated".to_string()),
                    title_of(post),
                    post.slug,
                    reading_time(&post.source, folio.config.words_per_minute)
                );
            }
        }
        ContentKind::Book => {
            let shelf = Bookshelf::from_books(folio.books().await);
            println!("Books ({}):", shelf.len());
            print_shelf("Currently reading", &shelf.reading);
            print_shelf("Completed", &shelf.completed);
            print_shelf("Reading list", &shelf.to_read);
        }
    }

    Ok(())
}

fn print_shelf(label: &str, books: &[ContentEntry]) {
    println!("  {} ({}):", label, books.len());
    for book in books {
        match book.meta_str("author") {
            Some(author) => println!("    {} by {} [{}]", title_of(book), author, book.slug),
            None => println!("    {} [{}]", title_of(book), book.slug),
        }
    }
}

fn title_of(entry: &ContentEntry) -> String {
    entry
        .meta_str("title")
        .unwrap_or_else(|| entry.slug.clone())
}
