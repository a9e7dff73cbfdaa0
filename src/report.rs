// ASCII bar charts over the store's contents.
//
// Both charts scale every bar against the largest value, so the top row
// always spans the full width. Charts are built from already-fetched
// records and rendered through [`std::fmt::Display`].

use crate::model::{Book, Sale};
use crate::tables::{money, truncate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::fmt;

/// Widest bar of the category chart.
pub const CATEGORY_BAR_WIDTH: usize = 50;
/// Widest bar of the sales chart.
pub const SALES_BAR_WIDTH: usize = 40;
/// Longest book title shown before it is cut with `...`.
pub const TITLE_WIDTH: usize = 30;

const BAR: char = '█';
const NO_DATA: &str = "No data available to build the chart.";

/// round(value / max × width), or 0 when `max` is not positive.
pub fn bar_length(value: Decimal, max: Decimal, width: usize) -> usize {
    if max <= Decimal::ZERO {
        return 0;
    }
    (value / max * Decimal::from(width))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_usize()
        .unwrap_or(0)
}

/// Sums pin at `Decimal::MAX` instead of overflowing.
fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}

/// Sort descending by value; ties keep their (alphabetical) input order.
fn sort_desc<V: Ord>(rows: &mut [(String, V)]) {
    rows.sort_by(|a, b| b.1.cmp(&a.1));
}

/// One row of the category chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub category: String,
    pub count: usize,
    pub bar: usize,
}

/// Number of books per category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChart {
    rows: Vec<CategoryRow>,
    total_books: usize,
}

impl CategoryChart {
    pub fn new(books: &[Book]) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for book in books {
            *counts.entry(book.category.as_str()).or_default() += 1;
        }
        let mut sorted: Vec<(String, usize)> =
            counts.into_iter().map(|(c, n)| (c.to_string(), n)).collect();
        sort_desc(&mut sorted);

        let max = sorted.first().map_or(0, |(_, n)| *n);
        let rows = sorted
            .into_iter()
            .map(|(category, count)| CategoryRow {
                bar: bar_length(Decimal::from(count), Decimal::from(max), CATEGORY_BAR_WIDTH),
                category,
                count,
            })
            .collect();
        CategoryChart {
            rows,
            total_books: books.len(),
        }
    }

    pub fn rows(&self) -> &[CategoryRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for CategoryChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{NO_DATA}");
        }
        writeln!(f, "{}", "=".repeat(70))?;
        writeln!(f, "{:^70}", "BOOKS PER CATEGORY")?;
        writeln!(f, "{}", "=".repeat(70))?;
        writeln!(f)?;
        for row in &self.rows {
            let bar: String = std::iter::repeat(BAR).take(row.bar).collect();
            writeln!(f, "{:<20} | {} {}", row.category, bar, row.count)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(70))?;
        writeln!(f, "Total books: {}", self.total_books)?;
        writeln!(f, "Total categories: {}", self.rows.len())?;
        write!(f, "{}", "=".repeat(70))
    }
}

/// One row of the sales chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRow {
    pub title: String,
    pub total: Decimal,
    pub bar: usize,
}

/// Revenue per book, grouped by the title captured on each sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesChart {
    rows: Vec<SalesRow>,
}

impl SalesChart {
    pub fn new(sales: &[Sale]) -> Self {
        let mut sums: BTreeMap<&str, Decimal> = BTreeMap::new();
        for sale in sales {
            let sum = sums.entry(sale.book_title.as_str()).or_default();
            *sum = saturating_add(*sum, sale.total);
        }
        let mut sorted: Vec<(String, Decimal)> =
            sums.into_iter().map(|(t, s)| (t.to_string(), s)).collect();
        sort_desc(&mut sorted);

        let max = sorted.first().map_or(Decimal::ZERO, |(_, s)| *s);
        let rows = sorted
            .into_iter()
            .map(|(title, total)| SalesRow {
                bar: bar_length(total, max, SALES_BAR_WIDTH),
                title,
                total,
            })
            .collect();
        SalesChart { rows }
    }

    pub fn rows(&self) -> &[SalesRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn grand_total(&self) -> Decimal {
        self.rows
            .iter()
            .fold(Decimal::ZERO, |acc, r| saturating_add(acc, r.total))
    }
}

impl fmt::Display for SalesChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{NO_DATA}");
        }
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "{:^80}", "TOTAL SALES PER BOOK")?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f)?;
        for row in &self.rows {
            let bar: String = std::iter::repeat(BAR).take(row.bar).collect();
            writeln!(
                f,
                "{:<35} | {} {}",
                truncate(&row.title, TITLE_WIDTH),
                bar,
                money(row.total)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "Total sales: {}", money(self.grand_total()))?;
        writeln!(f, "Books sold: {}", self.rows.len())?;
        write!(f, "{}", "=".repeat(80))
    }
}
