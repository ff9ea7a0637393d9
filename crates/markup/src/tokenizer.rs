//! Error-tolerant single-pass tokenizer for real-world markup.
//!
//! The scan follows the classic permissive parser family rather than the
//! HTML5 state machine: a tag is recognized only when the whole construct
//! matches the strict legacy grammar at the current position; otherwise the
//! `<` is delivered as literal text. That whole-construct-or-text rule is
//! what lets a sanitizing consumer treat everything it does not recognize as
//! plain text.
//!
//! Invariants:
//! - Forward progress: every loop iteration consumes at least one byte, so
//!   tokenization terminates on any input.
//! - Never fails: there is no error path; any byte sequence produces a
//!   (possibly all-text) event stream.
//! - End tags are emitted only for open stack entries, so every `EndTag` is
//!   lowercase and balanced against an earlier non-unary `StartTag`.
//! - Slice endpoints land on ASCII structural bytes, so UTF-8 boundaries are
//!   preserved without inspecting multi-byte sequences.

use crate::elements;
use crate::events::{Attribute, SinkResult, Token, TokenSink};
use memchr::memchr;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

// A comment terminator is only honored past this offset from the `<`.
// Anything earlier (including the empty comment `<!---->`) turns the rest of
// the input into one comment.
const MIN_COMMENT_CLOSE_INDEX: usize = 5;

// Tag names (and attribute names in the attribute sub-parse).
fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

// Attribute names at the whole-tag level: word characters only. A hyphenated
// attribute makes the whole construct fall out of the grammar.
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

macro_rules! deliver {
    ($sink:expr, $token:expr) => {
        if let SinkResult::Stop = $sink.process($token) {
            return SinkResult::Stop;
        }
    };
}

struct RawStartTag<'a> {
    name: &'a str,
    attr_text: &'a str,
    marked_self_closing: bool,
    consumed: usize,
}

/// Matches a complete start tag at the head of `rest`, or nothing.
///
/// Grammar: `<`, optional `name:` prefix (dropped), tag name over
/// `[-A-Za-z0-9_]`, attribute repetitions (whitespace, word name, optional
/// `=` value as double-quoted, single-quoted or unquoted `[^>\s]+`), optional
/// whitespace, optional single `/`, `>`. Partial matches are rejected whole:
/// a dangling `=` or an out-of-grammar attribute name makes the entire
/// construct literal text.
///
/// Quoted values here use plain quote pairing; the backslash rule lives in
/// the attribute sub-parse, which can therefore read the validated region
/// slightly differently. Both passes are kept as-is.
fn match_start_tag(rest: &str) -> Option<RawStartTag<'_>> {
    let bytes = rest.as_bytes();
    debug_assert_eq!(bytes.first(), Some(&b'<'));
    let mut i = 1;
    let first_start = i;
    while i < bytes.len() && is_tag_name_byte(bytes[i]) {
        i += 1;
    }
    if i == first_start {
        return None;
    }
    let mut name = &rest[first_start..i];
    if i < bytes.len() && bytes[i] == b':' {
        // The prefix is only taken when a second name follows; otherwise the
        // `:` has to be consumed by the rest of the grammar, which it never
        // is, so `<a:>` falls back to text while `</a:>` matches as `a`.
        let second_start = i + 1;
        let mut j = second_start;
        while j < bytes.len() && is_tag_name_byte(bytes[j]) {
            j += 1;
        }
        if j > second_start {
            name = &rest[second_start..j];
            i = j;
        }
    }
    let attrs_start = i;
    loop {
        let rep_start = i;
        let mut k = i;
        while k < bytes.len() && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k == rep_start {
            break;
        }
        let name_start = k;
        while k < bytes.len() && is_word_byte(bytes[k]) {
            k += 1;
        }
        if k == name_start {
            // Not an attribute; i stays at the repetition start so the
            // trailing whitespace is re-consumed below.
            break;
        }
        i = k;
        let mut w = k;
        while w < bytes.len() && bytes[w].is_ascii_whitespace() {
            w += 1;
        }
        if w >= bytes.len() || bytes[w] != b'=' {
            continue;
        }
        w += 1;
        while w < bytes.len() && bytes[w].is_ascii_whitespace() {
            w += 1;
        }
        if w >= bytes.len() {
            continue;
        }
        match bytes[w] {
            quote @ (b'"' | b'\'') => {
                if let Some(rel) = memchr(quote, &bytes[w + 1..]) {
                    i = w + 1 + rel + 1;
                    continue;
                }
                // No closing quote: the unquoted alternative re-reads from
                // the quote character itself.
            }
            _ => {}
        }
        let value_start = w;
        while w < bytes.len() && !bytes[w].is_ascii_whitespace() && bytes[w] != b'>' {
            w += 1;
        }
        if w > value_start {
            i = w;
        }
        // else: the value group failed; the attribute stands name-only and
        // scanning resumes right after the name.
    }
    let attr_text = &rest[attrs_start..i];
    let mut k = i;
    while k < bytes.len() && bytes[k].is_ascii_whitespace() {
        k += 1;
    }
    let mut marked_self_closing = false;
    if k < bytes.len() && bytes[k] == b'/' {
        marked_self_closing = true;
        k += 1;
    }
    if k >= bytes.len() || bytes[k] != b'>' {
        return None;
    }
    Some(RawStartTag {
        name,
        attr_text,
        marked_self_closing,
        consumed: k + 1,
    })
}

/// Matches `</ns:name anything>` at the head of `rest`, returning the name
/// and consumed length. Everything between the name and `>` is discarded, so
/// `</div class="x">` still closes a `div`.
fn match_end_tag(rest: &str) -> Option<(&str, usize)> {
    let bytes = rest.as_bytes();
    debug_assert!(rest.starts_with("</"));
    let mut i = 2;
    let first_start = i;
    while i < bytes.len() && is_tag_name_byte(bytes[i]) {
        i += 1;
    }
    if i == first_start {
        return None;
    }
    let mut name = &rest[first_start..i];
    if i < bytes.len() && bytes[i] == b':' {
        let second_start = i + 1;
        let mut j = second_start;
        while j < bytes.len() && is_tag_name_byte(bytes[j]) {
            j += 1;
        }
        if j > second_start {
            name = &rest[second_start..j];
            i = j;
        }
    }
    let close = memchr(b'>', &bytes[i..])?;
    Some((name, i + close + 1))
}

/// Scans a validated attribute region into resolved attributes.
///
/// A valueless or empty-valued attribute resolves to its own name when the
/// (source-cased) name is a boolean attribute, otherwise to the empty
/// string. Duplicates are kept in source order.
fn parse_attributes(attr_text: &str) -> Vec<Attribute> {
    let bytes = attr_text.as_bytes();
    let mut attributes = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !is_tag_name_byte(bytes[i]) {
            i += 1;
            continue;
        }
        let name_start = i;
        while i < bytes.len() && is_tag_name_byte(bytes[i]) {
            i += 1;
        }
        let name = &attr_text[name_start..i];
        let (value, next) = parse_attribute_value(attr_text, i);
        let resolved = match value {
            Some(v) if !v.is_empty() => v,
            _ if elements::fills_value(name) => name.to_string(),
            _ => String::new(),
        };
        attributes.push(Attribute::new(name, resolved));
        i = next;
    }
    attributes
}

/// Parses the optional `= value` following an attribute name at `i`,
/// returning the raw value (quotes stripped, backslashes kept) and the
/// resume position. A failed value leaves the resume position at the name
/// end so the `=` region is rescanned as potential further attributes.
fn parse_attribute_value(attr_text: &str, i: usize) -> (Option<String>, usize) {
    let bytes = attr_text.as_bytes();
    let mut w = i;
    while w < bytes.len() && bytes[w].is_ascii_whitespace() {
        w += 1;
    }
    if w >= bytes.len() || bytes[w] != b'=' {
        return (None, i);
    }
    w += 1;
    while w < bytes.len() && bytes[w].is_ascii_whitespace() {
        w += 1;
    }
    if w >= bytes.len() {
        return (None, i);
    }
    if let quote @ (b'"' | b'\'') = bytes[w] {
        if let Some(end) = scan_quoted(bytes, w + 1, quote) {
            return (Some(attr_text[w + 1..end].to_string()), end + 1);
        }
        // Unterminated under the backslash rule: fall through, the unquoted
        // run re-reads from the quote character.
    }
    let value_start = w;
    while w < bytes.len() && !bytes[w].is_ascii_whitespace() && bytes[w] != b'>' {
        w += 1;
    }
    if w > value_start {
        (Some(attr_text[value_start..w].to_string()), w)
    } else {
        (None, i)
    }
}

/// Finds the closing quote, with a backslash hiding the byte after it from
/// the close check. Quote bytes are ASCII and cannot occur inside UTF-8
/// continuation sequences, so byte stepping is safe.
fn scan_quoted(bytes: &[u8], mut i: usize, quote: u8) -> Option<usize> {
    while i < bytes.len() {
        if bytes[i] == quote {
            return Some(i);
        }
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            i += 2;
        } else {
            i += 1;
        }
    }
    None
}

/// Finds the first case-insensitive `</name` followed by any non-`>` run and
/// a `>`. Returns (close tag start, index past the `>`). Junk after the name
/// is treated like attributes and ignored, so `</STYLE foo>` and even
/// `</stylex>` both close a `<style>`.
fn find_raw_text_close(rest: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = rest.as_bytes();
    let n = name.len();
    let mut i = 0;
    while i + 2 + n <= bytes.len() {
        let rel = memchr(b'<', &bytes[i..])?;
        i += rel;
        if i + 2 + n > bytes.len() {
            return None;
        }
        if bytes[i + 1] == b'/' && bytes[i + 2..i + 2 + n].eq_ignore_ascii_case(name.as_bytes()) {
            let mut k = i + 2 + n;
            while k < bytes.len() && bytes[k] != b'>' {
                k += 1;
            }
            if k < bytes.len() {
                return Some((i, k + 1));
            }
            // No `>` anywhere after this candidate, so no later candidate
            // can complete either.
            return None;
        }
        i += 1;
    }
    None
}

/// Removes `open`..`close` marker pairs, keeping the text between them. An
/// opener without a closer is left alone.
fn strip_marker_pairs(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        let inner_start = start + open.len();
        let Some(inner_len) = rest[inner_start..].find(close) else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&rest[inner_start..inner_start + inner_len]);
        rest = &rest[inner_start + inner_len + close.len()..];
    }
    out.push_str(rest);
    out
}

/// Runs the scan over `input`, pushing events into `sink`.
///
/// Returns the final flow decision: `Stop` when the sink aborted the scan,
/// `Continue` when the input was fully consumed and every still-open element
/// was closed.
pub fn tokenize(input: &str, sink: &mut dyn TokenSink) -> SinkResult {
    let bytes = input.as_bytes();
    let mut stack: Vec<String> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        debug_assert!(input.is_char_boundary(i));
        if let Some(name) = stack.last()
            && elements::is_raw_text(name)
        {
            let name = name.clone();
            let rest = &input[i..];
            let (interior, consumed) = match find_raw_text_close(rest, &name) {
                Some((open, after)) => (&rest[..open], after),
                None => {
                    #[cfg(any(test, feature = "debug-stats"))]
                    log::trace!(
                        target: "markup.tokenizer",
                        "raw-text <{name}> has no close tag; closing at end of input"
                    );
                    (rest, rest.len())
                }
            };
            let text = strip_marker_pairs(interior, COMMENT_OPEN, COMMENT_CLOSE);
            let text = strip_marker_pairs(&text, CDATA_OPEN, CDATA_CLOSE);
            deliver!(sink, Token::Text(text));
            stack.pop();
            deliver!(sink, Token::EndTag(name));
            i += consumed;
            continue;
        }
        if bytes[i] == b'<' {
            let rest = &input[i..];
            if rest.starts_with(COMMENT_OPEN) {
                match rest.find(COMMENT_CLOSE) {
                    Some(close) if close >= MIN_COMMENT_CLOSE_INDEX => {
                        deliver!(
                            sink,
                            Token::Comment(rest[COMMENT_OPEN.len()..close].to_string())
                        );
                        i += close + COMMENT_CLOSE.len();
                    }
                    _ => {
                        deliver!(sink, Token::Comment(rest[COMMENT_OPEN.len()..].to_string()));
                        i = bytes.len();
                    }
                }
                continue;
            }
            if rest.len() >= 2 && bytes[i + 1] == b'/' {
                if let Some((name, consumed)) = match_end_tag(rest) {
                    // Case-sensitive stack search: stack entries are
                    // lowercase, so `</EM>` never matches and is dropped.
                    if let Some(pos) = stack.iter().rposition(|open| open == name) {
                        for open in stack.drain(pos..).rev() {
                            deliver!(sink, Token::EndTag(open));
                        }
                    } else {
                        #[cfg(any(test, feature = "debug-stats"))]
                        log::trace!(
                            target: "markup.tokenizer",
                            "dropping end tag </{name}> with no open element"
                        );
                    }
                    i += consumed;
                    continue;
                }
            } else if let Some(raw) = match_start_tag(rest) {
                let name = raw.name.to_ascii_lowercase();
                if elements::is_block(&name) {
                    while stack.last().is_some_and(|top| elements::is_inline(top)) {
                        if let Some(open) = stack.pop() {
                            deliver!(sink, Token::EndTag(open));
                        }
                    }
                }
                if elements::closes_self(&name) && stack.last().is_some_and(|top| top == &name) {
                    if let Some(open) = stack.pop() {
                        deliver!(sink, Token::EndTag(open));
                    }
                }
                let self_closing = elements::is_void(&name) || raw.marked_self_closing;
                if !self_closing {
                    stack.push(name.clone());
                }
                let attributes = parse_attributes(raw.attr_text);
                deliver!(
                    sink,
                    Token::StartTag {
                        name,
                        attributes,
                        self_closing,
                    }
                );
                i += raw.consumed;
                continue;
            }
            // Nothing matched: the `<` itself is literal text. One byte of
            // progress keeps the scan total on any input.
            deliver!(sink, Token::Text("<".to_string()));
            i += 1;
            continue;
        }
        let start = i;
        let end = memchr(b'<', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
        debug_assert!(input.is_char_boundary(end));
        deliver!(sink, Token::Text(input[start..end].to_string()));
        i = end;
    }
    while let Some(open) = stack.pop() {
        deliver!(sink, Token::EndTag(open));
    }
    SinkResult::Continue
}
