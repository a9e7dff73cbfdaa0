// Storage seam between the bookkeeping logic and the HTTP client.
//
// [`crate::api::ApiClient`] is the production implementation; the unit
// tests run the same logic against an in-memory store.

use crate::error::StoreError;
use crate::model::{Book, NewBook, NewSale, RecordId, Sale};

/// CRUD operations on the `books` and `sales` collections.
///
/// Every call is a fresh round trip: implementations hold no cached copy of
/// the records.
pub trait Store {
    fn list_books(&self) -> Result<Vec<Book>, StoreError>;
    fn get_book(&self, id: &RecordId) -> Result<Book, StoreError>;
    fn create_book(&self, book: &NewBook) -> Result<Book, StoreError>;
    /// Replace the stored record with `book` (matched on `book.id`).
    fn update_book(&self, book: &Book) -> Result<(), StoreError>;
    fn delete_book(&self, id: &RecordId) -> Result<(), StoreError>;

    fn list_sales(&self) -> Result<Vec<Sale>, StoreError>;
    fn get_sale(&self, id: &RecordId) -> Result<Sale, StoreError>;
    fn create_sale(&self, sale: &NewSale) -> Result<Sale, StoreError>;
    fn update_sale(&self, sale: &Sale) -> Result<(), StoreError>;
    fn delete_sale(&self, id: &RecordId) -> Result<(), StoreError>;
}
