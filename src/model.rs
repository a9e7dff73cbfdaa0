// Record shapes exchanged with the JSON store, plus the optional-field
// update requests used by the "leave blank to keep" prompts.

use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Timestamp format captured on every sale.
pub const SALE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The two collections exposed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Books,
    Sales,
}

impl Collection {
    /// URL path segment, e.g. `books` in `/books/3`.
    pub fn path(self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Sales => "sales",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Collection::Books => "book",
            Collection::Sales => "sale",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Store-assigned identifier.
///
/// Older json-server releases hand out numbers, newer ones strings. Both are
/// accepted and written back untouched; equality compares the textual form
/// so `1` and `"1"` name the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl From<&str> for RecordId {
    /// Digits become a numeric id, anything else is kept as text.
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<u64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_string()),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RecordId::from(s))
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Number(n)
    }
}

/// A catalog entry as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u32,
    pub category: String,
}

/// Payload for creating a book; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u32,
    pub category: String,
}

impl NewBook {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice);
        }
        Ok(())
    }
}

/// A recorded sale. Title and unit price are captured when the sale is made
/// and are not kept in sync with later edits of the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: RecordId,
    pub book_id: RecordId,
    pub book_title: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub customer: String,
    pub date: String,
}

/// quantity × unit price, or `AmountOverflow` when it does not fit a `Decimal`.
pub fn line_total(unit_price: Decimal, quantity: u32) -> Result<Decimal, ValidationError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(ValidationError::AmountOverflow)
}

/// Payload for creating a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub book_id: RecordId,
    pub book_title: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub customer: String,
    pub date: String,
}

impl NewSale {
    /// Attach the id assigned by the store.
    pub fn into_sale(self, id: RecordId) -> Sale {
        Sale {
            id,
            book_id: self.book_id,
            book_title: self.book_title,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total: self.total,
            customer: self.customer,
            date: self.date,
        }
    }
}

/// Partial book edit: `None` keeps the stored value, `Some` replaces it,
/// including `Some(0)` for price or stock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub category: Option<String>,
}

impl BookUpdate {
    pub fn is_empty(&self) -> bool {
        *self == BookUpdate::default()
    }

    /// Apply the present fields to `book`.
    pub fn apply_to(&self, book: &mut Book) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle);
            }
            book.title = title.clone();
        }
        if let Some(price) = self.price {
            if price < Decimal::ZERO {
                return Err(ValidationError::NegativePrice);
            }
            book.price = price;
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(stock) = self.stock {
            book.stock = stock;
        }
        if let Some(category) = &self.category {
            book.category = category.clone();
        }
        Ok(())
    }
}

/// Partial sale edit. A new quantity recomputes the total from the unit
/// price captured at sale time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleUpdate {
    pub quantity: Option<u32>,
    pub customer: Option<String>,
}

impl SaleUpdate {
    pub fn is_empty(&self) -> bool {
        *self == SaleUpdate::default()
    }

    pub fn apply_to(&self, sale: &mut Sale) -> Result<(), ValidationError> {
        if let Some(quantity) = self.quantity {
            if quantity == 0 {
                return Err(ValidationError::NonPositiveQuantity);
            }
            sale.total = line_total(sale.unit_price, quantity)?;
            sale.quantity = quantity;
        }
        if let Some(customer) = &self.customer {
            sale.customer = customer.clone();
        }
        Ok(())
    }
}
