//! Display of applied state results
//!
//! Every applied state is shown as it is produced, pretty-printed with a
//! blank line after it.

use tracing::warn;

use crate::state::ApplyResult;

/// Pretty-print one apply result to stdout
pub fn display_result(result: &ApplyResult) {
    match serde_json::to_string_pretty(result) {
        Ok(rendered) => println!("{rendered}\n"),
        Err(e) => warn!("Could not render result for {}: {}", result.name, e),
    }
}
