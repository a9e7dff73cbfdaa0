// Sale bookkeeping: selling decrements a book's stock, cancelling
// restores it.
//
// The store offers no transactions, so each operation is a sequence of
// independent requests. When a later step fails after an earlier one
// succeeded, nothing is undone; the outcome says what was left behind.

use crate::error::{InventoryError, StoreError, ValidationError};
use crate::model::{line_total, NewSale, RecordId, Sale, SaleUpdate, SALE_DATE_FORMAT};
use crate::store::Store;
use chrono::Local;

/// What the user asked to sell.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleOrder {
    pub book_id: RecordId,
    pub quantity: u32,
    pub customer: String,
}

/// What happened to the book's stock when a sale was cancelled.
#[derive(Debug)]
pub enum Restock {
    /// Stock written back; holds the new stock level.
    Restored(u32),
    /// The referenced book no longer exists.
    BookMissing,
    /// The book exists but the write failed; its stock was not restored.
    Failed(StoreError),
}

/// Result of a cancellation: the sale was deleted.
#[derive(Debug)]
pub struct Cancellation {
    pub sale: Sale,
    pub restock: Restock,
}

/// Record a sale and decrement the book's stock.
///
/// Fails without writing anything when the book is missing, the quantity is
/// zero or the stock is insufficient. If the sale is recorded but the stock
/// write-back fails, returns [`InventoryError::StockNotUpdated`] carrying the
/// recorded sale.
pub fn sell<S: Store + ?Sized>(store: &S, order: &SaleOrder) -> Result<Sale, InventoryError> {
    if order.quantity == 0 {
        return Err(ValidationError::NonPositiveQuantity.into());
    }

    let mut book = store.get_book(&order.book_id).map_err(|e| match e {
        StoreError::NotFound { id, .. } => InventoryError::BookNotFound(id),
        other => other.into(),
    })?;

    if order.quantity > book.stock {
        return Err(InventoryError::InsufficientStock {
            available: book.stock,
            requested: order.quantity,
        });
    }

    let total = line_total(book.price, order.quantity)?;
    let new_sale = NewSale {
        book_id: book.id.clone(),
        book_title: book.title.clone(),
        quantity: order.quantity,
        unit_price: book.price,
        total,
        customer: order.customer.clone(),
        date: Local::now().format(SALE_DATE_FORMAT).to_string(),
    };
    let sale = store.create_sale(&new_sale)?;

    book.stock -= order.quantity;
    if let Err(source) = store.update_book(&book) {
        tracing::warn!(
            sale = %sale.id,
            book = %book.id,
            error = %source,
            "sale recorded but stock not decremented"
        );
        return Err(InventoryError::StockNotUpdated {
            sale: Box::new(sale),
            source,
        });
    }

    tracing::info!(sale = %sale.id, book = %book.id, stock = book.stock, total = %sale.total, "sale recorded");
    Ok(sale)
}

/// Restore the sold quantity to the book, then delete the sale.
///
/// A missing book is not an error: the sale is still deleted. A failed
/// restore is reported in [`Cancellation::restock`] and the sale is deleted
/// anyway.
pub fn cancel<S: Store + ?Sized>(store: &S, sale_id: &RecordId) -> Result<Cancellation, InventoryError> {
    let sale = store.get_sale(sale_id).map_err(|e| match e {
        StoreError::NotFound { id, .. } => InventoryError::SaleNotFound(id),
        other => other.into(),
    })?;

    let restock = match store.get_book(&sale.book_id) {
        Ok(mut book) => {
            book.stock = book.stock.saturating_add(sale.quantity);
            match store.update_book(&book) {
                Ok(()) => Restock::Restored(book.stock),
                Err(e) => {
                    tracing::warn!(sale = %sale.id, book = %book.id, error = %e, "stock not restored");
                    Restock::Failed(e)
                }
            }
        }
        Err(StoreError::NotFound { .. }) => {
            tracing::info!(sale = %sale.id, book = %sale.book_id, "book gone, nothing to restock");
            Restock::BookMissing
        }
        Err(e) => {
            tracing::warn!(sale = %sale.id, book = %sale.book_id, error = %e, "stock not restored");
            Restock::Failed(e)
        }
    };

    store.delete_sale(&sale.id)?;
    tracing::info!(sale = %sale.id, "sale cancelled");
    Ok(Cancellation { sale, restock })
}

/// Change a sale's quantity and/or customer. The total is recomputed from
/// the unit price captured at sale time; the book's stock is left alone.
pub fn update_sale<S: Store + ?Sized>(
    store: &S,
    sale_id: &RecordId,
    update: &SaleUpdate,
) -> Result<Sale, InventoryError> {
    let mut sale = store.get_sale(sale_id).map_err(|e| match e {
        StoreError::NotFound { id, .. } => InventoryError::SaleNotFound(id),
        other => other.into(),
    })?;
    update.apply_to(&mut sale)?;
    store.update_sale(&sale)?;
    Ok(sale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Book;
    use crate::store::memory::MemoryStore;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn dune() -> Book {
        Book {
            id: RecordId::Number(1),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            price: dec!(50),
            stock: 3,
            category: "Sci-Fi".into(),
        }
    }

    fn order(book: u64, quantity: u32) -> SaleOrder {
        SaleOrder {
            book_id: RecordId::Number(book),
            quantity,
            customer: "Ana".into(),
        }
    }

    #[test]
    fn sell_decrements_stock_and_records_total() {
        let store = MemoryStore::with_books(vec![dune()]);

        let sale = sell(&store, &order(1, 2)).unwrap();

        assert_eq!(sale.total, dec!(100.00));
        assert_eq!(sale.unit_price, dec!(50));
        assert_eq!(sale.book_title, "Dune");
        assert_eq!(sale.book_id, RecordId::Number(1));
        assert!(NaiveDateTime::parse_from_str(&sale.date, SALE_DATE_FORMAT).is_ok());
        assert_eq!(store.book(1).unwrap().stock, 1);
        assert_eq!(store.sales(), vec![sale]);
    }

    #[test]
    fn sell_more_than_stock_fails_and_writes_nothing() {
        let store = MemoryStore::with_books(vec![dune()]);
        sell(&store, &order(1, 2)).unwrap();

        let err = sell(&store, &order(1, 5)).unwrap_err();

        assert!(matches!(
            err,
            InventoryError::InsufficientStock {
                available: 1,
                requested: 5
            }
        ));
        assert_eq!(store.book(1).unwrap().stock, 1);
        assert_eq!(store.sales().len(), 1);
    }

    #[test]
    fn sell_whole_stock_leaves_zero() {
        let store = MemoryStore::with_books(vec![dune()]);
        sell(&store, &order(1, 3)).unwrap();
        assert_eq!(store.book(1).unwrap().stock, 0);
    }

    #[test]
    fn sell_unknown_book_is_book_not_found() {
        let store = MemoryStore::with_books(vec![dune()]);
        let err = sell(&store, &order(9, 1)).unwrap_err();
        assert!(matches!(err, InventoryError::BookNotFound(id) if id == RecordId::Number(9)));
        assert!(store.sales().is_empty());
    }

    #[test]
    fn sell_zero_quantity_is_rejected() {
        let store = MemoryStore::with_books(vec![dune()]);
        let err = sell(&store, &order(1, 0)).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Invalid(ValidationError::NonPositiveQuantity)
        ));
        assert_eq!(store.book(1).unwrap().stock, 3);
    }

    #[test]
    fn failed_sale_create_leaves_stock_untouched() {
        let store = MemoryStore::with_books(vec![dune()]);
        store.fail_sale_creates.set(true);
        let err = sell(&store, &order(1, 1)).unwrap_err();
        assert!(matches!(err, InventoryError::Store(StoreError::Status { status: 500, .. })));
        assert_eq!(store.book(1).unwrap().stock, 3);
    }

    #[test]
    fn failed_stock_write_back_keeps_the_sale() {
        let store = MemoryStore::with_books(vec![dune()]);
        store.fail_book_updates.set(true);

        let err = sell(&store, &order(1, 2)).unwrap_err();

        match err {
            InventoryError::StockNotUpdated { sale, .. } => {
                assert_eq!(store.sales(), vec![*sale]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.book(1).unwrap().stock, 3);
    }

    #[test]
    fn sell_with_overflowing_total_is_rejected() {
        let mut ledger = dune();
        ledger.price = "40000000000000000000000000000".parse().unwrap();
        ledger.stock = 5;
        let store = MemoryStore::with_books(vec![ledger]);

        let err = sell(&store, &order(1, 3)).unwrap_err();

        assert!(matches!(
            err,
            InventoryError::Invalid(ValidationError::AmountOverflow)
        ));
        assert!(store.sales().is_empty());
        assert_eq!(store.book(1).unwrap().stock, 5);
    }

    #[test]
    fn cancel_restores_stock_and_deletes_sale() {
        let store = MemoryStore::with_books(vec![dune()]);
        let sale = sell(&store, &order(1, 2)).unwrap();

        let cancellation = cancel(&store, &sale.id).unwrap();

        assert!(matches!(cancellation.restock, Restock::Restored(3)));
        assert_eq!(cancellation.sale, sale);
        assert_eq!(store.book(1).unwrap().stock, 3);
        assert!(store.sales().is_empty());
    }

    #[test]
    fn cancel_deletes_sale_of_removed_book() {
        let store = MemoryStore::with_books(vec![dune()]);
        let sale = sell(&store, &order(1, 1)).unwrap();
        store.delete_book(&RecordId::Number(1)).unwrap();

        let cancellation = cancel(&store, &sale.id).unwrap();

        assert!(matches!(cancellation.restock, Restock::BookMissing));
        assert!(store.sales().is_empty());
    }

    #[test]
    fn cancel_with_failed_restore_still_deletes_sale() {
        let store = MemoryStore::with_books(vec![dune()]);
        let sale = sell(&store, &order(1, 2)).unwrap();
        store.fail_book_updates.set(true);

        let cancellation = cancel(&store, &sale.id).unwrap();

        assert!(matches!(
            cancellation.restock,
            Restock::Failed(StoreError::Status { status: 500, .. })
        ));
        assert!(store.sales().is_empty());
        assert_eq!(store.book(1).unwrap().stock, 1);
    }

    #[test]
    fn cancel_with_unreadable_book_still_deletes_sale() {
        let store = MemoryStore::with_books(vec![dune()]);
        let sale = sell(&store, &order(1, 2)).unwrap();
        store.fail_book_reads.set(true);

        let cancellation = cancel(&store, &sale.id).unwrap();

        assert!(matches!(cancellation.restock, Restock::Failed(_)));
        assert!(store.sales().is_empty());
        assert_eq!(store.book(1).unwrap().stock, 1);
    }

    #[test]
    fn cancel_unknown_sale_is_sale_not_found() {
        let store = MemoryStore::with_books(vec![dune()]);
        let err = cancel(&store, &RecordId::Text("nope".into())).unwrap_err();
        assert!(matches!(err, InventoryError::SaleNotFound(_)));
    }

    #[test]
    fn cancel_with_failed_delete_keeps_restored_stock() {
        let store = MemoryStore::with_books(vec![dune()]);
        let sale = sell(&store, &order(1, 2)).unwrap();
        store.fail_sale_deletes.set(true);

        let err = cancel(&store, &sale.id).unwrap_err();

        assert!(matches!(err, InventoryError::Store(_)));
        // Stock was already restored; the sale record is still there.
        assert_eq!(store.book(1).unwrap().stock, 3);
        assert_eq!(store.sales().len(), 1);
    }

    #[test]
    fn update_sale_uses_captured_price() {
        let store = MemoryStore::with_books(vec![dune()]);
        let sale = sell(&store, &order(1, 1)).unwrap();
        let mut repriced = store.book(1).unwrap();
        repriced.price = dec!(80);
        store.update_book(&repriced).unwrap();

        let update = SaleUpdate {
            quantity: Some(2),
            customer: Some("Bruno".into()),
        };
        let updated = update_sale(&store, &sale.id, &update).unwrap();

        assert_eq!(updated.total, dec!(100));
        assert_eq!(updated.customer, "Bruno");
        assert_eq!(store.sales(), vec![updated]);
        assert_eq!(store.book(1).unwrap().stock, 2);
    }
}
