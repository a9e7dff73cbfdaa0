// UI layer: nested interactive menus built on `dialoguer`.
// Every handler is an error boundary: store and validation failures are
// printed as a single line and the user goes back to the menu. Only
// terminal I/O errors propagate out of here.

use crate::api::ApiClient;
use crate::catalog::{self, BookFilter, CatalogError};
use crate::error::{InventoryError, ValidationError};
use crate::inventory::{self, Restock, SaleOrder};
use crate::model::{Book, BookUpdate, NewBook, RecordId, SaleUpdate};
use crate::report::{CategoryChart, SalesChart};
use crate::store::Store;
use crate::tables;
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

fn success(msg: impl Display) {
    println!("{} {}", "✓".green(), msg);
}

fn failure(msg: impl Display) {
    println!("{} {}", "✗".red(), msg);
}

fn header(title: &str) {
    println!("\n{}", "-".repeat(60));
    println!("    {}", title.bold());
    println!("{}", "-".repeat(60));
}

/// Run `work` while a spinner shows `msg`. The spinner is cleared before
/// anything else is printed.
fn with_spinner<T>(msg: &'static str, work: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = work();
    spinner.finish_and_clear();
    out
}

/// Startup banner with a reminder of how to launch the store.
pub fn banner(api: &ApiClient) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", "WELCOME TO THE BOOKSTORE MANAGER".bold());
    println!("{}", "=".repeat(60));
    println!("\nStore: {}", api.base_url());
    println!("Make sure the JSON server is running, e.g.:");
    match api.port() {
        Some(port) => println!("  json-server --watch db.json --port {port}"),
        None => println!("  json-server --watch db.json"),
    }
}

/// Main interactive menu. Runs until the user picks "Exit".
pub fn main_menu(api: ApiClient) -> Result<()> {
    let items = [
        "Manage books",
        "Manage sales",
        "Search books",
        "Chart: books per category",
        "Chart: sales per book",
        "Exit",
    ];
    loop {
        println!();
        let selection = Select::new()
            .with_prompt("Bookstore")
            .items(&items)
            .default(0)
            .interact()?;
        match selection {
            0 => books_menu(&api)?,
            1 => sales_menu(&api)?,
            2 => handle_search(&api)?,
            3 => show_category_chart(&api),
            4 => show_sales_chart(&api),
            _ => {
                println!("\nThanks for using the bookstore manager. Bye!");
                break;
            }
        }
    }
    Ok(())
}

fn books_menu(api: &ApiClient) -> Result<()> {
    let items = ["Create book", "List books", "Update book", "Delete book", "Back"];
    loop {
        header("BOOKS");
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_create_book(api)?,
            1 => {
                list_books(api);
            }
            2 => handle_update_book(api)?,
            3 => handle_delete_book(api)?,
            _ => break,
        }
    }
    Ok(())
}

fn sales_menu(api: &ApiClient) -> Result<()> {
    let items = ["Sell", "List sales", "Update sale", "Cancel sale", "Back"];
    loop {
        header("SALES");
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_sell(api)?,
            1 => list_sales(api),
            2 => handle_update_sale(api)?,
            3 => handle_cancel_sale(api)?,
            _ => break,
        }
    }
    Ok(())
}

/// Prompt for a required, non-empty text value.
fn prompt_text(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), String> {
            if input.trim().is_empty() {
                Err("value cannot be empty".into())
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// Prompt for a value that may be left blank; blank means `None`.
fn prompt_optional_text(prompt: &str) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn parse_number<T: FromStr>(input: &str, expected: &'static str) -> Result<T, ValidationError> {
    input.trim().parse().map_err(|_| ValidationError::NotANumber {
        input: input.trim().to_string(),
        expected,
    })
}

fn read_number<T: FromStr>(prompt: &str, expected: &'static str, optional: bool) -> Result<Option<T>> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(optional)
        .validate_with(move |input: &String| -> Result<(), String> {
            if optional && input.trim().is_empty() {
                return Ok(());
            }
            parse_number::<T>(input, expected).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    if value.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(parse_number(&value, expected)?))
}

/// Prompt for a number, re-asking until the input parses.
fn prompt_number<T: FromStr>(prompt: &str, expected: &'static str) -> Result<T> {
    read_number(prompt, expected, false)?
        .ok_or_else(|| ValidationError::NotANumber {
            input: String::new(),
            expected,
        })
        .map_err(Into::into)
}

/// Like [`prompt_number`], but blank input yields `None`.
fn prompt_optional_number<T: FromStr>(prompt: &str, expected: &'static str) -> Result<Option<T>> {
    read_number(prompt, expected, true)
}

fn prompt_id(prompt: &str) -> Result<RecordId> {
    let raw = prompt_text(prompt)?;
    Ok(RecordId::from(raw.as_str()))
}

fn confirm(prompt: String) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn handle_create_book(api: &ApiClient) -> Result<()> {
    let title = prompt_text("Title")?;
    let author = prompt_text("Author")?;
    let price: Decimal = prompt_number("Price", "price")?;
    let stock: u32 = prompt_number("Stock", "stock quantity")?;
    let category = prompt_text("Category")?;
    let draft = NewBook {
        title,
        author,
        price,
        stock,
        category,
    };
    match with_spinner("Saving...", || catalog::add_book(api, &draft)) {
        Ok(book) => success(format!("Book '{}' created with ID {}", book.title, book.id)),
        Err(CatalogError::Invalid(e)) => failure(e),
        Err(CatalogError::Store(e)) => failure(format!("Error creating book: {e}")),
    }
    Ok(())
}

/// Print the book table; returns an empty list when the store is
/// unreachable or has no books.
fn list_books(api: &ApiClient) -> Vec<Book> {
    match with_spinner("Loading books...", || api.list_books()) {
        Ok(books) if books.is_empty() => {
            println!("No books registered.");
            books
        }
        Ok(books) => {
            println!("\n{}", tables::BooksTable(&books));
            books
        }
        Err(e) => {
            failure(format!("Error listing books: {e}"));
            Vec::new()
        }
    }
}

fn handle_update_book(api: &ApiClient) -> Result<()> {
    let id = prompt_id("Book ID")?;
    println!("Leave blank to keep the current value");
    let update = BookUpdate {
        title: prompt_optional_text("New title")?,
        author: prompt_optional_text("New author")?,
        price: prompt_optional_number("New price", "price")?,
        stock: prompt_optional_number("New stock", "stock quantity")?,
        category: prompt_optional_text("New category")?,
    };
    if update.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }
    match with_spinner("Saving...", || catalog::update_book(api, &id, &update)) {
        Ok(book) => success(format!("Book ID {} updated", book.id)),
        Err(CatalogError::Invalid(e)) => failure(e),
        Err(CatalogError::Store(e)) => failure(format!("Error updating book: {e}")),
    }
    Ok(())
}

fn handle_delete_book(api: &ApiClient) -> Result<()> {
    let id = prompt_id("Book ID to delete")?;
    if !confirm(format!("Delete book ID {id}?"))? {
        return Ok(());
    }
    match with_spinner("Deleting...", || api.delete_book(&id)) {
        Ok(()) => success(format!("Book ID {id} deleted")),
        Err(e) => failure(format!("Error deleting book: {e}")),
    }
    Ok(())
}

fn handle_sell(api: &ApiClient) -> Result<()> {
    if list_books(api).is_empty() {
        return Ok(());
    }
    let book_id = prompt_id("Book ID")?;
    let quantity: u32 = prompt_number("Quantity", "quantity")?;
    let customer = prompt_text("Customer name")?;
    let order = SaleOrder {
        book_id,
        quantity,
        customer,
    };
    match with_spinner("Recording sale...", || inventory::sell(api, &order)) {
        Ok(sale) => success(format!("Sale recorded! Total: {}", tables::money(sale.total))),
        Err(InventoryError::InsufficientStock { available, .. }) => {
            failure(format!("Insufficient stock! Available: {available}"))
        }
        Err(e @ InventoryError::StockNotUpdated { .. }) => failure(format!("Warning: {e}")),
        Err(e) => failure(e),
    }
    Ok(())
}

fn list_sales(api: &ApiClient) {
    match with_spinner("Loading sales...", || api.list_sales()) {
        Ok(sales) if sales.is_empty() => println!("No sales recorded."),
        Ok(sales) => println!("\n{}", tables::SalesTable(&sales)),
        Err(e) => failure(format!("Error listing sales: {e}")),
    }
}

fn handle_update_sale(api: &ApiClient) -> Result<()> {
    let id = prompt_id("Sale ID")?;
    println!("Leave blank to keep the current value");
    let update = SaleUpdate {
        quantity: prompt_optional_number("New quantity", "quantity")?,
        customer: prompt_optional_text("New customer")?,
    };
    if update.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }
    match with_spinner("Saving...", || inventory::update_sale(api, &id, &update)) {
        Ok(sale) => success(format!(
            "Sale ID {} updated (total {})",
            sale.id,
            tables::money(sale.total)
        )),
        Err(e) => failure(e),
    }
    Ok(())
}

fn handle_cancel_sale(api: &ApiClient) -> Result<()> {
    let id = prompt_id("Sale ID to cancel")?;
    if !confirm(format!("Cancel sale ID {id}?"))? {
        return Ok(());
    }
    match with_spinner("Cancelling...", || inventory::cancel(api, &id)) {
        Ok(done) => match done.restock {
            Restock::Restored(stock) => success(format!(
                "Sale ID {} cancelled and stock restored (now {stock})",
                done.sale.id
            )),
            Restock::BookMissing => success(format!(
                "Sale ID {} cancelled; book ID {} no longer exists",
                done.sale.id, done.sale.book_id
            )),
            Restock::Failed(e) => failure(format!(
                "Sale ID {} cancelled but stock was not restored: {e}",
                done.sale.id
            )),
        },
        Err(e) => failure(e),
    }
    Ok(())
}

fn handle_search(api: &ApiClient) -> Result<()> {
    header("ADVANCED BOOK SEARCH");
    println!("Leave blank to skip a criterion");
    let filter = BookFilter {
        author: prompt_optional_text("Author")?,
        category: prompt_optional_text("Category")?,
        max_price: prompt_optional_number("Max price", "price")?,
    };
    match with_spinner("Searching...", || catalog::search(api, &filter)) {
        Ok(books) if books.is_empty() => failure("No books match the given criteria."),
        Ok(books) => {
            success(format!("Found {} book(s):", books.len()));
            println!("{}", tables::SearchTable(&books));
        }
        Err(e) => failure(format!("Search failed: {e}")),
    }
    Ok(())
}

fn show_category_chart(api: &ApiClient) {
    match with_spinner("Loading books...", || api.list_books()) {
        Ok(books) => println!("\n{}", CategoryChart::new(&books)),
        Err(e) => failure(format!("Could not build chart: {e}")),
    }
}

fn show_sales_chart(api: &ApiClient) {
    match with_spinner("Loading sales...", || api.list_sales()) {
        Ok(sales) => println!("\n{}", SalesChart::new(&sales)),
        Err(e) => failure(format!("Could not build chart: {e}")),
    }
}
