//! In-memory books repository.
//!
//! Records live in an insertion-ordered map keyed by id. Every check-and-mutate
//! step runs under a single write guard; readers get clones.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<IndexMap<String, Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, IndexMap<String, Book>>> {
        self.books
            .read()
            .map_err(|_| AppError::Internal("books store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, IndexMap<String, Book>>> {
        self.books
            .write()
            .map_err(|_| AppError::Internal("books store lock poisoned".to_string()))
    }

    /// Append a record. Fails if the id is already taken.
    pub fn insert(&self, book: Book) -> AppResult<()> {
        let mut books = self.write()?;
        if books.contains_key(&book.id) {
            return Err(AppError::Internal(format!("book id collision: {}", book.id)));
        }
        books.insert(book.id.clone(), book);
        Ok(())
    }

    /// Records matching `predicate`, in insertion order
    pub fn list<F>(&self, predicate: F) -> AppResult<Vec<Book>>
    where
        F: Fn(&Book) -> bool,
    {
        let books = self.read()?;
        Ok(books.values().filter(|&book| predicate(book)).cloned().collect())
    }

    pub fn get(&self, id: &str) -> AppResult<Option<Book>> {
        Ok(self.read()?.get(id).cloned())
    }

    /// Run `mutate` on the record with `id` under the write lock.
    /// Returns the updated record, or `None` when the id is unknown.
    pub fn update<F>(&self, id: &str, mutate: F) -> AppResult<Option<Book>>
    where
        F: FnOnce(&mut Book),
    {
        let mut books = self.write()?;
        Ok(books.get_mut(id).map(|book| {
            mutate(book);
            book.clone()
        }))
    }

    /// Remove a record, keeping the order of the others.
    pub fn remove(&self, id: &str) -> AppResult<Option<Book>> {
        Ok(self.write()?.shift_remove(id))
    }

    pub fn count(&self) -> AppResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::BookPayload;
    use chrono::Utc;

    fn book(id: &str) -> Book {
        Book::new(
            id.to_string(),
            BookPayload { name: Some(id.to_uppercase()), ..Default::default() },
            Utc::now(),
        )
    }

    fn ids(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let repo = BooksRepository::new();
        repo.insert(book("a")).unwrap();
        let err = repo.insert(book("a")).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_remove_preserves_order() {
        let repo = BooksRepository::new();
        for id in ["a", "b", "c", "d"] {
            repo.insert(book(id)).unwrap();
        }

        assert!(repo.remove("b").unwrap().is_some());
        assert!(repo.remove("b").unwrap().is_none());

        let all = repo.list(|_| true).unwrap();
        assert_eq!(ids(&all), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_update_unknown_id_runs_nothing() {
        let repo = BooksRepository::new();
        repo.insert(book("a")).unwrap();

        let result = repo.update("zzz", |_| panic!("must not be called")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_in_place() {
        let repo = BooksRepository::new();
        repo.insert(book("a")).unwrap();
        repo.insert(book("b")).unwrap();

        let updated = repo.update("a", |b| b.reading = true).unwrap().unwrap();
        assert!(updated.reading);
        assert_eq!(repo.get("a").unwrap(), Some(updated));
        assert_eq!(ids(&repo.list(|_| true).unwrap()), vec!["a", "b"]);
    }
}
