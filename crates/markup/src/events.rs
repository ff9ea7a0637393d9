//! Token events and the push-style consumer seam.
//!
//! The tokenizer drives a [`TokenSink`] instead of collecting a token vector:
//! consumers such as the sanitizing filter fold events into output as they
//! arrive, and a sink can stop the scan early by returning
//! [`SinkResult::Stop`]. Events are transient; nothing here borrows from the
//! input once a token has been built.

/// A single attribute as scanned from a start tag.
///
/// `name` keeps its source case (consumers decide how to fold it). `value` is
/// the resolved raw value: quote marks removed, boolean attributes filled in
/// with their own name, everything else left byte-for-byte. `escaped` is
/// `value` with `"` replaced by `&quot;`, safe to embed between double quotes
/// when re-serializing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub escaped: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        let escaped = value.replace('"', "&quot;");
        Attribute {
            name,
            value,
            escaped,
        }
    }
}

/// One event of the scan.
///
/// Invariants:
/// - `StartTag::name` and `EndTag` names are ASCII-lowercased.
/// - `self_closing` is the unary flag: set for void elements whether or not
///   the source carried a `/` marker.
/// - Every `EndTag` closes a previously opened, still-open `StartTag`; at end
///   of input the tokenizer closes whatever remains open.
/// - `Text` carries raw input text (no entity decoding). `Comment` carries
///   the interior without the `<!--` / `-->` markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Text(String),
    Comment(String),
}

/// Flow control returned from every sink call.
///
/// `Stop` aborts the scan immediately: no further events are delivered, not
/// even the end-of-input close events for still-open elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkResult {
    Continue,
    Stop,
}

/// Push-style consumer of the token stream.
pub trait TokenSink {
    fn process(&mut self, token: Token) -> SinkResult;
}
