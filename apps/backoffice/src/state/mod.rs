//! # State Module
//!
//! Manages application state for the back-office host.
//!
//! Each command receives only the state types it needs instead of one
//! `AppState` with everything in it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────────┐      │
//! │  │ ConfigState  │  │   DraftState     │  │    RatesState        │      │
//! │  │              │  │                  │  │                      │      │
//! │  │ store_name   │  │  Arc<Mutex<      │  │  RateHandle (watch   │      │
//! │  │ default_*    │  │   HashMap<id,    │  │  receiver + command  │      │
//! │  │              │  │   ProductDraft>  │  │  sender)             │      │
//! │  │              │  │  >>              │  │                      │      │
//! │  └──────────────┘  └──────────────────┘  └──────────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ConfigState: Read-only after initialization                         │
//! │  • DraftState: Protected by Arc<Mutex<T>> for exclusive access         │
//! │  • RatesState: watch channel, readers never block                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod drafts;
mod rates;

pub use config::ConfigState;
pub use drafts::DraftState;
pub use rates::RatesState;
