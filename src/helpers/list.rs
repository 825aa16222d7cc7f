//! Ordering and grouping of loaded entries for listing pages

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use super::date::parse_date;
use crate::content::{Book, Post, ReadingStatus};

/// Sort posts newest first by their `publishedAt` field
///
/// Posts without a parseable date go last, keeping their relative order.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| newest_first(published_at(a), published_at(b)));
}

fn published_at(post: &Post) -> Option<DateTime<Utc>> {
    post.meta_str("publishedAt").as_deref().and_then(parse_date)
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Reading status declared by a book's front-matter
pub fn reading_status(book: &Book) -> Option<ReadingStatus> {
    match book.meta_str("readingStatus")?.as_str() {
        "reading" => Some(ReadingStatus::Reading),
        "completed" => Some(ReadingStatus::Completed),
        "to-read" => Some(ReadingStatus::ToRead),
        _ => None,
    }
}

/// Books split by reading status
#[derive(Debug, Default, Serialize)]
pub struct Bookshelf {
    pub reading: Vec<Book>,
    /// Most recently finished first; books without `finishedOn` last
    pub completed: Vec<Book>,
    pub to_read: Vec<Book>,
}

impl Bookshelf {
    /// Group books by status; books with an unknown status are left out
    pub fn from_books(books: Vec<Book>) -> Self {
        let mut shelf = Bookshelf::default();
        for book in books {
            match reading_status(&book) {
                Some(ReadingStatus::Reading) => shelf.reading.push(book),
                Some(ReadingStatus::Completed) => shelf.completed.push(book),
                Some(ReadingStatus::ToRead) => shelf.to_read.push(book),
                None => {
                    tracing::debug!("Book {:?} has no known reading status", book.slug);
                }
            }
        }

        shelf.completed.sort_by(|a, b| newest_first(finished_on(a), finished_on(b)));
        shelf
    }

    pub fn len(&self) -> usize {
        self.reading.len() + self.completed.len() + self.to_read.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn finished_on(book: &Book) -> Option<DateTime<Utc>> {
    book.meta_str("finishedOn").as_deref().and_then(parse_date)
}
