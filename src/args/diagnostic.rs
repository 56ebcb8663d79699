//! Human-targeted diagnostic for malformed provisioning arguments
//!
//! Renders the failing document with the line reported by the parser
//! highlighted in bold red. serde_json's line number can be a little off
//! relative to the human-visible cause (trailing commas, unclosed
//! brackets), so the highlight is "near the mistake", not exact.

use std::fmt::Write;

use colored::Colorize;

/// Render the full diagnostic for a JSON parse failure
///
/// Output: a header naming the labeled block, the parser's own message, and
/// the original text verbatim with the offending line highlighted.
pub fn render(text: &str, err: &serde_json::Error, description: &str) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "butio-salt-rs has crashed while trying to parse the json block labeled as: {description}."
    )
    .ok();
    writeln!(
        out,
        "We've tried to highlight a line which is close to the error, though \
         the highlighting may be a few lines off.\n"
    )
    .ok();
    writeln!(out, ">>> Error: {err}").ok();

    // err.line() is 1-based; line 0 means the error has no location.
    let bad_line = err.line().saturating_sub(1);
    for (idx, line) in text.split('\n').enumerate() {
        if idx == bad_line {
            writeln!(out, "{}", line.red().bold()).ok();
        } else {
            writeln!(out, "{line}").ok();
        }
    }

    out
}
