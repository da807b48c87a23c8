//! # IPC Host
//!
//! JSON-lines protocol between the UI process and this host.
//!
//! ## Wire Format
//! ```text
//! stdin  (one request per line)
//!   {"id": 1, "command": "open_new_product_draft", "args": {}}
//!
//! stdout (one response per line, same id)
//!   {"id": 1, "ok": { ... }}
//!   {"id": 1, "error": {"code": "NOT_FOUND", "message": "..."}}
//! ```
//!
//! `id` is echoed back untouched and may be any JSON value. A line that is
//! not valid JSON gets an `INVALID_REQUEST` error with a `null` id. Logs go
//! to stderr, never to stdout.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::commands;
use crate::error::{ApiError, ErrorCode};
use crate::state::{ConfigState, DraftState, RatesState};

// =============================================================================
// Messages
// =============================================================================

/// One request line.
#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

/// One response line.
#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    fn from_result(id: Value, result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(value) => Response {
                id,
                ok: Some(value),
                error: None,
            },
            Err(error) => Response {
                id,
                ok: None,
                error: Some(error),
            },
        }
    }
}

// =============================================================================
// App State
// =============================================================================

/// Everything the commands need, bundled for the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub config: ConfigState,
    pub drafts: DraftState,
    pub rates: RatesState,
}

impl AppState {
    pub fn new(config: ConfigState, rates: RatesState) -> Self {
        let drafts = DraftState::new(config.max_open_drafts);
        AppState {
            config,
            drafts,
            rates,
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ApiError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ApiError::invalid_request(format!("Invalid args: {}", e)))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Routes one command to its handler.
pub async fn dispatch(app: &AppState, command: &str, args: Value) -> Result<Value, ApiError> {
    use commands::{config, pricing, rates};

    match command {
        // Config commands
        "get_config" => to_value(config::get_config(&app.config)),

        // Rate commands
        "get_exchange_rate" => to_value(rates::get_exchange_rate(&app.rates)),
        "refresh_exchange_rate" => to_value(rates::refresh_exchange_rate(&app.rates).await?),

        // Pricing commands
        "open_new_product_draft" => to_value(pricing::open_new_product_draft(
            &app.config,
            &app.drafts,
            &app.rates,
        )?),
        "open_edit_product_draft" => to_value(pricing::open_edit_product_draft(
            &app.config,
            &app.drafts,
            &app.rates,
            parse_args(args)?,
        )?),
        "edit_draft_field" => to_value(pricing::edit_draft_field(
            &app.drafts,
            &app.rates,
            parse_args(args)?,
        )?),
        "blur_sale_price" => to_value(pricing::blur_sale_price(
            &app.drafts,
            &app.rates,
            parse_args(args)?,
        )?),
        "get_draft" => to_value(pricing::get_draft(&app.drafts, &app.rates, parse_args(args)?)?),
        "submit_draft" => to_value(pricing::submit_draft(
            &app.drafts,
            &app.rates,
            parse_args(args)?,
        )?),
        "discard_draft" => to_value(pricing::discard_draft(&app.drafts, parse_args(args)?)?),

        other => Err(ApiError::new(
            ErrorCode::UnknownCommand,
            format!("Unknown command: {}", other),
        )),
    }
}

/// Handles one request line and returns the response line (without `\n`).
pub async fn handle_line(app: &AppState, line: &str) -> String {
    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            debug!(command = %request.command, id = %request.id, "IPC request");
            let result = dispatch(app, &request.command, request.args).await;
            if let Err(e) = &result {
                debug!(command = %request.command, error = %e, "Command failed");
            }
            Response::from_result(request.id, result)
        }
        Err(e) => {
            warn!(error = %e, "Malformed IPC request");
            Response::from_result(Value::Null, Err(ApiError::from(e)))
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"id":null,"error":{{"code":"INTERNAL","message":"{}"}}}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

/// Serves requests until the reader hits end of input.
pub async fn serve<R, W>(app: &AppState, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(app, &line).await;
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!("IPC input closed");
    Ok(())
}
