//! Streaming tokenization of untrusted markup.
//!
//! `tokenize` drives a caller-supplied [`TokenSink`] over a complete input
//! string, delivering start/end/text/comment events with legacy closure
//! behavior (auto-closing inline runs, self-closing list elements, void
//! elements, raw-text `script`/`style` bodies). The scan is total: it never
//! fails, never panics on malformed input, and consumes at least one byte
//! per step. A sink stops it early by returning [`SinkResult::Stop`].

pub mod elements;
mod events;
mod tokenizer;

pub use events::{Attribute, SinkResult, Token, TokenSink};
pub use tokenizer::tokenize;
