//! # Mostrador Back-Office Library
//!
//! Host process for the back-office product dialogs. The UI spawns it and
//! talks to it over stdin/stdout.
//!
//! ## Module Organization
//! ```text
//! mostrador_backoffice_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── ipc.rs          ◄─── JSON-lines protocol and dispatcher
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── Pricing defaults
//! │   ├── drafts.rs   ◄─── Open product dialogs
//! │   └── rates.rs    ◄─── Exchange rate feed handle
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── pricing.rs  ◄─── Product dialog commands
//! │   ├── rates.rs    ◄─── Exchange rate commands
//! │   └── config.rs   ◄─── Configuration commands
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod ipc;
pub mod state;

use mostrador_rates::{HttpRateSource, RateFeed, RatesConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ipc::AppState;
use state::{ConfigState, RatesState};

/// Runs the host until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Host Startup                                      │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,mostrador=debug, override with RUST_LOG             │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • ConfigState from MOSTRADOR_* environment                          │
/// │     • RatesConfig from rates.toml + environment                         │
/// │                                                                         │
/// │  3. Start Rate Feed ──────────────────────────────────────────────────► │
/// │     • Falls back to offline (no rate) if the client can't be built      │
/// │                                                                         │
/// │  4. Serve IPC ────────────────────────────────────────────────────────► │
/// │     • One JSON request per stdin line until EOF                         │
/// │                                                                         │
/// │  5. Shut Down ────────────────────────────────────────────────────────► │
/// │     • Stop the rate feed                                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> std::io::Result<()> {
    init_tracing();

    info!("Starting Mostrador back office");

    let config = ConfigState::from_env();
    info!(
        store = %config.store_name,
        currency = %config.default_currency,
        markup = %config.default_markup,
        "Configuration loaded"
    );

    let rates = start_rate_feed();
    let app = AppState::new(config, rates);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = ipc::serve(&app, stdin, tokio::io::stdout()).await;

    if let Err(e) = app.rates.shutdown().await {
        warn!(error = %e, "Rate feed already stopped");
    }

    info!("Back office stopped");
    result
}

/// Starts the exchange rate feed, or returns an offline state.
fn start_rate_feed() -> RatesState {
    let config = RatesConfig::load_or_default(None);

    match HttpRateSource::new(&config.source) {
        Ok(source) => {
            info!(url = %source.url(), "Starting exchange rate feed");
            RatesState::new(RateFeed::new(source, config.refresh).start())
        }
        Err(e) => {
            error!(error = %e, "Exchange rate feed unavailable, USD costs priced as ARS");
            RatesState::offline()
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mostrador_rates=trace` - Trace the rate feed only
/// - Default: INFO, DEBUG for mostrador crates
///
/// Logs go to stderr; stdout carries IPC responses.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,mostrador=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
