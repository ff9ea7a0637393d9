//! Declaration-level CSS filtering against an allowed-property set.
//!
//! This is not a CSS parser. Both entry points walk the text with the same
//! split discipline the values arrived with and re-emit accepted spans
//! byte-for-byte, so whatever survives the filter round-trips unchanged.
//! Malformed spans (a declaration without `:`, a rule without `{`) are
//! dropped rather than reported; the filters are total.

use std::collections::HashSet;

// input: "color: red; position:fixed", allowed {"color"}
// output: "color: red;"
//
// Whitespace-only segments (the tail after a trailing `;` included) pass
// through verbatim, which keeps filtering idempotent over its own output.
// The property name is trimmed for the check, case-sensitively; the kept
// text is the original pair.
pub fn filter_declarations(css: &str, allowed: &HashSet<String>) -> String {
    let mut kept = String::new();
    for segment in css.split(';') {
        if segment.trim().is_empty() {
            kept.push_str(segment);
            continue;
        }
        let Some((property, value)) = segment.split_once(':') else {
            continue;
        };
        if allowed.contains(property.trim()) {
            kept.push_str(property);
            kept.push(':');
            kept.push_str(value);
            kept.push(';');
        }
    }
    kept
}

// input: "p { color: red; } @media x { p { color: red; } }", allowed {"color"}
// output: "p { color: red; }"
//
// Rules are the `}`-separated chunks; at-rules (selector starting with `@`)
// are dropped with their block, and so is any rule whose declarations all
// fail the filter. Selectors are re-emitted untrimmed.
pub fn filter_style_body(css: &str, allowed: &HashSet<String>) -> String {
    let mut kept = String::new();
    for chunk in css.split('}') {
        if chunk.is_empty() {
            continue;
        }
        let Some((selector, declarations)) = chunk.split_once('{') else {
            continue;
        };
        if selector.trim_start().starts_with('@') {
            continue;
        }
        let filtered = filter_declarations(declarations, allowed);
        if filtered.is_empty() {
            continue;
        }
        kept.push_str(selector);
        kept.push('{');
        kept.push_str(&filtered);
        kept.push('}');
    }
    kept
}
