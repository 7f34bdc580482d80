//! RAG (Retrieval-Augmented Generation) over the knowledge base.
//!
//! A question is embedded, the nearest fragments are joined into a context
//! string and a single templated prompt is sent to the chat model.

pub mod context;
mod response;

pub use context::{context_string, ContextBuilder};
pub use response::{Answer, RagEngine, RagResponse};
