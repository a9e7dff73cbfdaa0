// Entrypoint for the bookstore CLI.
// - Keeps `main` small: set up logging, build the API client and hand it
//   to the UI loop.
// - Logs go to stderr at `warn` unless `RUST_LOG` says otherwise, so they
//   do not interleave with the menus.

use anyhow::Context;
use bookstore_cli::{api::ApiClient, settings::Settings, ui};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let settings = Settings::from_env()?;
    let api = ApiClient::new(&settings).context("failed to set up the store client")?;
    tracing::info!(base_url = %settings.base_url, "bookstore-cli starting");

    ui::banner(&api);
    // Blocks until the user exits.
    ui::main_menu(api)?;
    Ok(())
}
