// Error types shared by the store client and the bookkeeping layers.
// The UI catches every one of these at the handler boundary, prints a
// single line and returns to the menu.

use crate::model::{Collection, RecordId, Sale};
use thiserror::Error;

/// Failures talking to the JSON store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never got an answer (connection refused, DNS, reset...).
    #[error("connection error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The store answered with an unexpected status code.
    #[error("{collection} request failed with status {status}")]
    Status { collection: Collection, status: u16 },

    /// The requested record does not exist.
    #[error("{} ID {id} not found", collection.singular())]
    NotFound { collection: Collection, id: RecordId },

    /// The store answered 2xx but the body could not be decoded.
    #[error("invalid {collection} response: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: reqwest::Error,
    },
}

/// Input that is rejected before anything is sent to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,

    #[error("price cannot be negative")]
    NegativePrice,

    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("amount is too large to compute")]
    AmountOverflow,

    #[error("'{input}' is not a valid {expected}")]
    NotANumber { input: String, expected: &'static str },
}

/// Failures of the sale bookkeeping (sell, cancel, update).
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("book ID {0} not found")]
    BookNotFound(RecordId),

    #[error("sale ID {0} not found")]
    SaleNotFound(RecordId),

    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: u32, requested: u32 },

    /// The sale was recorded but the book's stock was not decremented.
    /// Nothing is rolled back; the sale is returned so the caller can report it.
    #[error("sale ID {} was recorded but the stock of book ID {} could not be updated: {source}", sale.id, sale.book_id)]
    StockNotUpdated {
        sale: Box<Sale>,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
