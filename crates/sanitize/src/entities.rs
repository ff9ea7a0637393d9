//! Named-entity escaping and decoding.
//!
//! The escape path is what the sanitizer runs over every text event, so it
//! has to be idempotent: feeding sanitized output back through must change
//! nothing. That is achieved by recognizing already-well-formed named
//! references and copying them through untouched.

use std::collections::HashMap;
use std::sync::OnceLock;

use memchr::memchr;

use crate::entity_table::NAMED_ENTITIES;

/// Escape text for safe inclusion in markup output.
///
/// Contract:
/// - `<`, `>`, and bare `&` become `&lt;`, `&gt;`, `&amp;`.
/// - An existing `&name;` reference (ASCII letters only) is copied verbatim,
///   whether or not the name is known. This makes escaping idempotent.
/// - Characters in U+00A0..=U+2666 with a table entry become `&name;`;
///   characters in that range without an entry are copied unchanged.
/// - `"` and `'` are never escaped here. Attribute values are quoted
///   elsewhere with their own escaping.
pub fn escape_html_entities(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut i = 0;
    let mut copy_start = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            match b {
                b'&' => {
                    if copy_start < i {
                        out.push_str(&text[copy_start..i]);
                    }
                    if let Some(len) = named_reference_len(&bytes[i..]) {
                        out.push_str(&text[i..i + len]);
                        i += len;
                    } else {
                        out.push_str("&amp;");
                        i += 1;
                    }
                    copy_start = i;
                }
                b'<' => {
                    if copy_start < i {
                        out.push_str(&text[copy_start..i]);
                    }
                    out.push_str("&lt;");
                    i += 1;
                    copy_start = i;
                }
                b'>' => {
                    if copy_start < i {
                        out.push_str(&text[copy_start..i]);
                    }
                    out.push_str("&gt;");
                    i += 1;
                    copy_start = i;
                }
                _ => i += 1,
            }
        } else {
            // Multi-byte scalar. Everything the table names above ASCII sits
            // in U+00A0..=U+2666; anything else rides along in the copy run.
            let Some(c) = text[i..].chars().next() else {
                break;
            };
            let width = c.len_utf8();
            if ('\u{A0}'..='\u{2666}').contains(&c)
                && let Some(name) = entity_name(c)
            {
                if copy_start < i {
                    out.push_str(&text[copy_start..i]);
                }
                out.push('&');
                out.push_str(name);
                out.push(';');
                copy_start = i + width;
            }
            i += width;
        }
    }

    if copy_start < bytes.len() {
        out.push_str(&text[copy_start..]);
    }

    out
}

/// Decode `&name;` references back to their characters.
///
/// Named references only: numeric forms (`&#60;`, `&#x3C;`) are not
/// recognized. Lookup is case-sensitive; unknown names, bare `&`, and
/// unterminated references are copied verbatim.
pub fn unescape_named_entities(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut copy_start = 0;

    while let Some(rel) = memchr(b'&', &bytes[i..]) {
        let at = i + rel;
        match named_reference_len(&bytes[at..]) {
            Some(len) => {
                if let Some(&c) = decode_map().get(&text[at + 1..at + len - 1]) {
                    if copy_start < at {
                        out.push_str(&text[copy_start..at]);
                    }
                    out.push(c);
                    copy_start = at + len;
                }
                i = at + len;
            }
            None => i = at + 1,
        }
    }

    if copy_start < bytes.len() {
        out.push_str(&text[copy_start..]);
    }

    out
}

/// Escape text for direct placement inside element content.
///
/// Neutralizes `&`, `<`, `>`, quotes, and `/` (so a value can never smuggle
/// in a closing-tag sequence). For composing markup by hand, not for the
/// sanitizer's own output path.
pub fn escape_element_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '/' => out.push_str("&#47;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape text for placement inside a quoted attribute value.
///
/// On top of the element-text set (minus `/`), whitespace separators are
/// encoded numerically so the value cannot split into further attributes.
pub fn escape_attribute_value(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            ' ' => out.push_str("&#32;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\u{C}' => out.push_str("&#12;"),
            c => out.push(c),
        }
    }
    out
}

/// Length of a leading `&[A-Za-z]+;` reference, if one starts at `rest[0]`.
fn named_reference_len(rest: &[u8]) -> Option<usize> {
    debug_assert_eq!(rest.first(), Some(&b'&'));
    let mut i = 1;
    while rest.get(i).is_some_and(|b| b.is_ascii_alphabetic()) {
        i += 1;
    }
    (i > 1 && rest.get(i) == Some(&b';')).then_some(i + 1)
}

fn entity_name(c: char) -> Option<&'static str> {
    NAMED_ENTITIES
        .binary_search_by_key(&(c as u32), |&(cp, _)| cp)
        .ok()
        .map(|idx| NAMED_ENTITIES[idx].1)
}

fn decode_map() -> &'static HashMap<&'static str, char> {
    static MAP: OnceLock<HashMap<&'static str, char>> = OnceLock::new();
    MAP.get_or_init(|| {
        NAMED_ENTITIES
            .iter()
            .filter_map(|&(cp, name)| char::from_u32(cp).map(|c| (name, c)))
            .collect()
    })
}
