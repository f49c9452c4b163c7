//! Book records and the per-session reading list

use serde::{Deserialize, Serialize};

/// A simplified book record as shown in search results and the reading list.
///
/// Two records are the same book when their title and author match; the
/// description and thumbnail are not part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    /// Comma-joined author list, or "Unknown"
    pub author: String,
    pub description: String,
    pub thumbnail: String,
}

impl Book {
    pub fn is_same_book(&self, title: &str, author: &str) -> bool {
        self.title == title && self.author == author
    }
}

/// A search result annotated with whether it is already saved
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub book: Book,
    pub is_saved: bool,
}

/// Result of adding a book to a reading list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Added,
    AlreadyPresent,
}

/// Ordered list of saved books, deduplicated by (title, author)
#[derive(Debug, Clone, Default)]
pub struct ReadingList {
    books: Vec<Book>,
}

impl ReadingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, title: &str, author: &str) -> bool {
        self.books.iter().any(|b| b.is_same_book(title, author))
    }

    /// Append `book` unless a book with the same identity is already saved
    pub fn add(&mut self, book: Book) -> SaveOutcome {
        if self.contains(&book.title, &book.author) {
            return SaveOutcome::AlreadyPresent;
        }
        self.books.push(book);
        SaveOutcome::Added
    }

    /// Remove every book matching (title, author), returning how many were removed
    pub fn remove(&mut self, title: &str, author: &str) -> usize {
        let before = self.books.len();
        self.books.retain(|b| !b.is_same_book(title, author));
        before - self.books.len()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Saved books in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }
}

/// Annotate search results with their saved state
pub fn mark_saved(books: Vec<Book>, list: &ReadingList) -> Vec<SearchHit> {
    books
        .into_iter()
        .map(|book| {
            let is_saved = list.contains(&book.title, &book.author);
            SearchHit { book, is_saved }
        })
        .collect()
}
