// Book catalog operations: validated creates and edits, and the
// client-side search over the full book list.

use crate::error::{StoreError, ValidationError};
use crate::model::{Book, BookUpdate, NewBook, RecordId};
use crate::store::Store;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of a catalog write.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Search criteria. Absent (or blank) criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub author: Option<String>,
    pub category: Option<String>,
    pub max_price: Option<Decimal>,
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        contains_ignore_case(&book.author, self.author.as_deref())
            && contains_ignore_case(&book.category, self.category.as_deref())
            && self.max_price.map_or(true, |max| book.price <= max)
    }
}

/// Fetch every book and keep the ones matching `filter`.
pub fn search<S: Store + ?Sized>(store: &S, filter: &BookFilter) -> Result<Vec<Book>, StoreError> {
    let books = store.list_books()?;
    let found: Vec<Book> = books.into_iter().filter(|b| filter.matches(b)).collect();
    tracing::debug!(?filter, matches = found.len(), "book search");
    Ok(found)
}

/// Validate and create a book.
pub fn add_book<S: Store + ?Sized>(store: &S, book: &NewBook) -> Result<Book, CatalogError> {
    book.validate()?;
    let created = store.create_book(book)?;
    tracing::info!(book = %created.id, title = %created.title, "book created");
    Ok(created)
}

/// Fetch a book, apply the present fields of `update`, and write it back.
pub fn update_book<S: Store + ?Sized>(
    store: &S,
    id: &RecordId,
    update: &BookUpdate,
) -> Result<Book, CatalogError> {
    let mut book = store.get_book(id)?;
    update.apply_to(&mut book)?;
    store.update_book(&book)?;
    tracing::info!(book = %book.id, "book updated");
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn book(id: u64, title: &str, author: &str, price: Decimal, category: &str) -> Book {
        Book {
            id: RecordId::Number(id),
            title: title.into(),
            author: author.into(),
            price,
            stock: 5,
            category: category.into(),
        }
    }

    fn shelf() -> MemoryStore {
        MemoryStore::with_books(vec![
            book(1, "The Hobbit", "J.R.R. Tolkien", dec!(35.90), "Fantasy"),
            book(2, "The Silmarillion", "J. R. R. TOLKIEN", dec!(18), "Fantasy"),
            book(3, "Dune", "Frank Herbert", dec!(50), "Science Fiction"),
            book(4, "Neuromancer", "William Gibson", dec!(20), "science fiction"),
        ])
    }

    fn ids(books: &[Book]) -> Vec<RecordId> {
        books.iter().map(|b| b.id.clone()).collect()
    }

    #[rstest]
    #[case::author_ignores_case(Some("tolkien"), None, None, vec![1, 2])]
    #[case::category_substring(None, Some("FICTION"), None, vec![3, 4])]
    #[case::price_ceiling_is_inclusive(None, None, Some(dec!(20)), vec![2, 4])]
    #[case::combined(Some("tolkien"), Some("fantasy"), Some(dec!(20)), vec![2])]
    #[case::blank_means_absent(Some("  "), Some(""), None, vec![1, 2, 3, 4])]
    #[case::no_match(Some("asimov"), None, None, vec![])]
    fn search_filters(
        #[case] author: Option<&str>,
        #[case] category: Option<&str>,
        #[case] max_price: Option<Decimal>,
        #[case] expected: Vec<u64>,
    ) {
        let filter = BookFilter {
            author: author.map(String::from),
            category: category.map(String::from),
            max_price,
        };
        let found = search(&shelf(), &filter).unwrap();
        let expected: Vec<RecordId> = expected.into_iter().map(RecordId::from).collect();
        assert_eq!(ids(&found), expected);
    }

    #[test]
    fn max_price_excludes_everything_above() {
        let filter = BookFilter {
            max_price: Some(dec!(20)),
            ..Default::default()
        };
        let found = search(&shelf(), &filter).unwrap();
        assert!(found.iter().all(|b| b.price <= dec!(20)));
    }

    #[test]
    fn search_surfaces_store_failures() {
        let store = shelf();
        store.fail_reads.set(true);
        assert!(search(&store, &BookFilter::default()).is_err());
    }

    #[test]
    fn add_book_validates_before_writing() {
        let store = MemoryStore::with_books(vec![]);
        let draft = NewBook {
            title: "".into(),
            author: "Anon".into(),
            price: dec!(10),
            stock: 1,
            category: "Misc".into(),
        };
        assert!(matches!(
            add_book(&store, &draft),
            Err(CatalogError::Invalid(ValidationError::EmptyTitle))
        ));
        assert!(store.list_books().unwrap().is_empty());

        let draft = NewBook {
            title: "Emma".into(),
            ..draft
        };
        let created = add_book(&store, &draft).unwrap();
        assert_eq!(store.list_books().unwrap(), vec![created]);
    }

    #[test]
    fn update_book_writes_only_present_fields() {
        let store = shelf();
        let update = BookUpdate {
            stock: Some(0),
            category: Some("Classics".into()),
            ..Default::default()
        };

        let updated = update_book(&store, &RecordId::Number(3), &update).unwrap();

        assert_eq!(updated.stock, 0);
        assert_eq!(updated.category, "Classics");
        assert_eq!(updated.title, "Dune");
        assert_eq!(store.book(3).unwrap(), updated);
    }

    #[test]
    fn update_missing_book_is_not_found() {
        let store = shelf();
        let err = update_book(&store, &RecordId::Number(42), &BookUpdate::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Store(StoreError::NotFound { .. })));
    }
}
