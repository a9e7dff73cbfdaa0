// Plain-text tables for book and sale listings, plus the small
// formatting helpers shared with the charts.

use crate::model::{Book, Sale};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

const ELLIPSIS: &str = "...";

/// Keep the first `max` characters of `text`, appending `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Currency with two decimals and thousands separators, e.g. `$1,234.50`.
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

fn rule(f: &mut fmt::Formatter<'_>, width: usize) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(width))
}

/// Book listing: id, title, author, price, stock.
pub struct BooksTable<'a>(pub &'a [Book]);

impl fmt::Display for BooksTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        rule(f, 80)?;
        writeln!(f, "{:<5} {:<30} {:<20} {:<12} {:<8}", "ID", "Title", "Author", "Price", "Stock")?;
        rule(f, 80)?;
        for b in self.0 {
            writeln!(
                f,
                "{:<5} {:<30} {:<20} {:<12} {:<8}",
                b.id.to_string(),
                truncate(&b.title, 27),
                truncate(&b.author, 17),
                money(b.price),
                b.stock
            )?;
        }
        write!(f, "{}", "=".repeat(80))
    }
}

/// Search results: id, title, author, price, category.
pub struct SearchTable<'a>(pub &'a [Book]);

impl fmt::Display for SearchTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        rule(f, 80)?;
        writeln!(f, "{:<5} {:<30} {:<20} {:<12} {}", "ID", "Title", "Author", "Price", "Category")?;
        rule(f, 80)?;
        for b in self.0 {
            writeln!(
                f,
                "{:<5} {:<30} {:<20} {:<12} {}",
                b.id.to_string(),
                truncate(&b.title, 27),
                truncate(&b.author, 17),
                money(b.price),
                b.category
            )?;
        }
        write!(f, "{}", "=".repeat(80))
    }
}

/// Sale listing: id, book, customer, quantity, total, date.
pub struct SalesTable<'a>(pub &'a [Sale]);

impl fmt::Display for SalesTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        rule(f, 100)?;
        writeln!(
            f,
            "{:<5} {:<30} {:<20} {:<6} {:<14} {:<20}",
            "ID", "Book", "Customer", "Qty", "Total", "Date"
        )?;
        rule(f, 100)?;
        for s in self.0 {
            writeln!(
                f,
                "{:<5} {:<30} {:<20} {:<6} {:<14} {:<20}",
                s.id.to_string(),
                truncate(&s.book_title, 27),
                truncate(&s.customer, 17),
                s.quantity,
                money(s.total),
                s.date
            )?;
        }
        write!(f, "{}", "=".repeat(100))
    }
}
