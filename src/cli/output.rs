//! CLI output formatting utilities.

use crate::markup::{split_fenced, Segment};
use crate::vector_store::ScoredFragment;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print model output, rendering fenced code apart from the prose.
    pub fn markup(text: &str) {
        for segment in split_fenced(text) {
            match segment {
                Segment::Prose(prose) => {
                    let prose = prose.trim_matches('\n');
                    if !prose.trim().is_empty() {
                        println!("{}", prose);
                    }
                }
                Segment::Code(block) => {
                    let label = block.language().unwrap_or("code");
                    println!("{}", style(format!("--- {} ---", label)).dim());
                    for line in block.code().trim_end_matches('\n').lines() {
                        println!("{}", style(line).cyan());
                    }
                    println!("{}", style("---").dim());
                }
            }
        }
    }

    /// Print retrieved fragments, numbered from one.
    pub fn fragments(fragments: &[ScoredFragment]) {
        for (i, scored) in fragments.iter().enumerate() {
            println!(
                "\n{} {}",
                style(fragment_label(i)).green().bold(),
                style(format!("(score: {:.2})", scored.score)).dim()
            );
            if let Some(source) = &scored.fragment.source {
                println!("   {}", style(source).dim());
            }
            println!("   {}", content_preview(&scored.fragment.content, 400));
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Heading for the `index`-th fragment (zero-based).
fn fragment_label(index: usize) -> String {
    format!("Фрагмент {}", index + 1)
}

/// Format duration in seconds to a human-readable string.
pub(crate) fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Flatten newlines and truncate on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_labels_start_at_one() {
        assert_eq!(fragment_label(0), "Фрагмент 1");
        assert_eq!(fragment_label(9), "Фрагмент 10");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42.0), "42s");
        assert_eq!(format_duration(125.5), "2m 5s");
        assert_eq!(format_duration(3725.0), "1h 2m 5s");
    }

    #[test]
    fn test_content_preview_respects_char_boundaries() {
        let text = "Градиентный спуск\nминимизирует функцию потерь";
        let preview = content_preview(text, 10);
        assert_eq!(preview, "Градиентны...");
        assert_eq!(content_preview("short", 10), "short");
    }
}
