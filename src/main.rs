use std::sync::Arc;

use tracing::info;

use sheetboard::store::{ContentStore, MemoryStore, SheetStore};
use sheetboard::{BoardService, Config, Result, SessionRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.validate()?;

    // Initialize logging
    if let Err(e) = sheetboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        sheetboard::logging::init_console_only(&config.logging.level);
    }

    info!("sheetboard - discussion board core");

    let store: Arc<dyn ContentStore> = match config.store.backend.as_str() {
        "sheet" => {
            info!(base_url = %config.store.base_url, "using sheet store backend");
            Arc::new(SheetStore::new(&config.store)?)
        }
        _ => {
            info!("using in-memory store backend");
            Arc::new(MemoryStore::new())
        }
    };

    let registry = SessionRegistry::new();
    let service = BoardService::new(store);

    let threads = service.list_threads().await?;
    info!(
        threads = threads.len(),
        sessions = registry.count().await,
        "board core ready on {}:{}",
        config.server.host,
        config.server.port
    );

    Ok(())
}
