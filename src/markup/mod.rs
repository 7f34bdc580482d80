//! Post-processing of model output for display.

mod fences;
mod sections;

pub use fences::{split_fenced, CodeBlock, Segment};
pub use sections::{split_sections, AnswerSections};
