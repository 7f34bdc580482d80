//! Modes command implementation.

use crate::cli::Output;
use crate::summary::SummaryMode;

/// List the summary modes with their keys.
pub fn run_modes() {
    Output::header("Summary modes");
    for mode in SummaryMode::ALL {
        let marker = if mode == SummaryMode::default() { " (default)" } else { "" };
        Output::kv(mode.key(), &format!("{}{}", mode.label(), marker));
    }
}
