//! Book management service

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload, BookQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Store a new book and return its id.
    /// The payload is expected to be checked by the caller.
    pub fn create(&self, payload: BookPayload) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let book = Book::new(id.clone(), payload, Utc::now());
        self.repository.books.insert(book)?;

        tracing::info!("Book created: id={}", id);
        Ok(id)
    }

    /// List books matching every filter in `query`, in insertion order
    pub fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        if query.is_empty() {
            return self.repository.books.list(|_| true);
        }

        let books = self.repository.books.list(|book| query.matches(book))?;
        tracing::debug!("Filtered books with {:?}: {} result(s)", query, books.len());
        Ok(books)
    }

    /// Number of stored books
    pub fn count(&self) -> AppResult<usize> {
        self.repository.books.count()
    }

    pub fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books
            .get(id)?
            .ok_or_else(|| AppError::NotFound(format!("book {} not found", id)))
    }

    /// Replace all mutable fields of a book.
    /// Checks the name, then page progress, then existence.
    pub fn update(&self, id: &str, payload: BookPayload) -> AppResult<Book> {
        payload
            .check()
            .map_err(|issue| AppError::Validation(issue.update_message().to_string()))?;

        let now = Utc::now();
        let updated = self
            .repository
            .books
            .update(id, |book| book.apply(payload, now))?
            .ok_or_else(|| AppError::NotFound(format!("book {} not found", id)))?;

        tracing::info!("Book updated: id={} finished={}", id, updated.finished);
        Ok(updated)
    }

    pub fn delete_by_id(&self, id: &str) -> AppResult<()> {
        self.repository
            .books
            .remove(id)?
            .ok_or_else(|| AppError::NotFound(format!("book {} not found", id)))?;

        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }
}
