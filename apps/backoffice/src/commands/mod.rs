//! # Commands Module
//!
//! All commands exposed to the back-office UI.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── pricing.rs  ◄─── Product dialogs: open, edit, blur, submit, discard
//! ├── rates.rs    ◄─── Exchange rate status and refresh
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI writes one line to the host's stdin:                               │
//! │  {"id":3,"command":"edit_draft_field",                                 │
//! │   "args":{"draftId":"…","field":"unit_cost","value":"1.250,50"}}       │
//! │         │                                                               │
//! │         │ (ipc::dispatch)                                               │
//! │         ▼                                                               │
//! │  fn edit_draft_field(                                                   │
//! │      drafts: &DraftState,     ◄── Only the state it needs              │
//! │      rates: &RatesState,                                                │
//! │      args: EditFieldArgs,     ◄── From "args"                          │
//! │  ) -> Result<DraftResponse, ApiError>                                   │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  {"id":3,"ok":{"draft":{…},"result":{…},"exchangeRateAvailable":true}} │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod pricing;
pub mod rates;
