//! Plain-text snippet extraction: a second, simpler tokenizer consumer.
//!
//! Pulls the first `max_chars` characters of visible text out of a message
//! body, skipping quoted replies (`blockquote`) and stylesheet bodies. This
//! is the length-bounded consumer that exercises the tokenizer's early-abort
//! path: once the budget is full the sink answers `Stop` and the scan ends
//! mid-input.

use markup::{SinkResult, Token, TokenSink};

struct SnippetSink {
    max_chars: usize,
    text: String,
    char_count: usize,
    // Nesting depth of blockquote/style elements whose text is skipped.
    // Saturates downward so a stray close cannot wedge it below zero.
    ignore_depth: u32,
}

impl SnippetSink {
    fn new(max_chars: usize) -> Self {
        SnippetSink {
            max_chars,
            text: String::with_capacity(max_chars.min(1024)),
            char_count: 0,
            ignore_depth: 0,
        }
    }

    fn ignored_container(name: &str) -> bool {
        name == "blockquote" || name == "style"
    }

    /// Append visible text, collapsing whitespace runs to single spaces and
    /// never emitting a leading or doubled space.
    fn append(&mut self, chunk: &str) -> SinkResult {
        for c in chunk.chars() {
            if self.char_count >= self.max_chars {
                return SinkResult::Stop;
            }
            if c.is_whitespace() {
                if !self.text.is_empty() && !self.text.ends_with(' ') {
                    self.text.push(' ');
                    self.char_count += 1;
                }
            } else {
                self.text.push(c);
                self.char_count += 1;
            }
        }
        if self.char_count >= self.max_chars {
            SinkResult::Stop
        } else {
            SinkResult::Continue
        }
    }

    fn into_snippet(mut self) -> String {
        let kept = self.text.trim_end().len();
        self.text.truncate(kept);
        self.text
    }
}

impl TokenSink for SnippetSink {
    fn process(&mut self, token: Token) -> SinkResult {
        match token {
            Token::StartTag {
                name, self_closing, ..
            } => {
                // Unary tags never produce a close event, so they must not
                // touch the depth counter.
                if !self_closing && Self::ignored_container(&name) {
                    self.ignore_depth += 1;
                }
                SinkResult::Continue
            }
            Token::EndTag(name) => {
                if Self::ignored_container(&name) {
                    self.ignore_depth = self.ignore_depth.saturating_sub(1);
                }
                SinkResult::Continue
            }
            Token::Text(text) => {
                if self.ignore_depth > 0 {
                    SinkResult::Continue
                } else {
                    self.append(&text)
                }
            }
            Token::Comment(_) => SinkResult::Continue,
        }
    }
}

pub(crate) fn extract(html: &str, max_chars: usize) -> String {
    let mut sink = SnippetSink::new(max_chars);
    markup::tokenize(html, &mut sink);
    sink.into_snippet()
}
