//! # Mostrador Back-Office Entry Point
//!
//! ## Process Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mostrador Back Office                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      UI process                                  │  │
//! │  │  • New product dialog    • Edit product dialog                   │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                     stdin ▼     ▲ stdout  (JSON lines)                  │
//! │  ┌──────────────────────────────┴───────────────────────────────────┐  │
//! │  │                    Rust host (this crate)                        │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Starts the runtime                               │  │
//! │  │  lib.rs ─────► Logging, config, rate feed, IPC loop             │  │
//! │  │  commands/ ──► open_*_draft, edit_draft_field, submit_draft     │  │
//! │  │  state/ ─────► ConfigState, DraftState, RatesState              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │ HTTP                                  │
//! │                                 ▼                                       │
//! │                       USD→ARS rate endpoint                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match mostrador_backoffice_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "IPC loop failed");
            ExitCode::FAILURE
        }
    }
}
