//! CLI command implementations.

mod ask;
mod config;
mod modes;
mod serve;
mod summarize;
mod transcript;

pub use ask::run_ask;
pub use config::run_config;
pub use modes::run_modes;
pub use serve::run_serve;
pub use summarize::run_summarize;
pub use transcript::run_transcript;
