//! # Config Commands
//!
//! Commands for retrieving back-office configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current configuration.
///
/// ## When Used
/// - UI startup (window title, default selections in the product form)
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
