// Library root
// -----------
// The binary (`main.rs`) wires these modules into an interactive CLI that
// manages a bookstore's catalog and sales stored in a JSON REST store.
//
// Module responsibilities:
// - `settings`: where the store lives (`BOOKSTORE_API_URL`).
// - `api`: blocking HTTP client for the `books` and `sales` collections.
// - `store`: the `Store` trait the logic layers are written against.
// - `model` / `error`: record shapes and typed failures.
// - `catalog`: validated book writes and client-side search.
// - `inventory`: sell / cancel / update sale with stock bookkeeping.
// - `report` / `tables`: bar charts and text tables.
// - `ui`: terminal menus; the place where errors are printed.
pub mod api;
pub mod catalog;
pub mod error;
pub mod inventory;
pub mod model;
pub mod report;
pub mod settings;
pub mod store;
pub mod tables;
pub mod ui;
