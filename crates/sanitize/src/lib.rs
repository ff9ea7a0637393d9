//! Whitelist-and-escape HTML sanitization.
//!
//! [`sanitize`] drives the `markup` tokenizer with a policy-bound filter:
//! allowed tags are re-serialized with whitelisted attributes, disallowed
//! markup is escaped into visible text (or dropped in strip mode), pruned
//! subtrees vanish, and `style` content passes through the restricted
//! `cssfilter` crate. [`generate_snippet`] reuses the tokenizer for bounded
//! plain-text extraction.
//!
//! Both entry points fail closed: an internal fault yields an empty string,
//! never unsanitized input.

pub mod perf_fixtures;

mod entities;
mod entity_table;
mod filter;
mod policy;
mod snippet;

use std::panic::{self, AssertUnwindSafe};

use crate::filter::Sanitizer;

pub use crate::entities::{
    escape_attribute_value, escape_element_text, escape_html_entities, unescape_named_entities,
};
pub use crate::policy::{AttrAllow, Policy, TagRewrite};
pub use markup::Attribute;

/// Sanitize `html` under `policy` and return the safe output string.
///
/// Never fails on malformed input; the tokenizer absorbs anything. If the
/// pipeline itself faults, the error is logged and the output is the empty
/// string. Callers must not disable unwinding (`panic = "abort"`) or the
/// fail-closed path degrades to a process abort.
pub fn sanitize(html: &str, policy: &Policy) -> String {
    // The filter owns every piece of mutated state; the policy is only read.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut sink = Sanitizer::new(policy);
        markup::tokenize(html, &mut sink);
        sink.into_output()
    }));
    match result {
        Ok(output) => output,
        Err(_) => {
            log::error!(target: "sanitize", "sanitizer panicked; returning empty output");
            String::new()
        }
    }
}

/// Extract up to `max_chars` characters of visible plain text from `html`,
/// skipping quoted replies and stylesheet bodies.
pub fn generate_snippet(html: &str, max_chars: usize) -> String {
    let result = panic::catch_unwind(AssertUnwindSafe(|| snippet::extract(html, max_chars)));
    match result {
        Ok(text) => text,
        Err(_) => {
            log::error!(target: "sanitize", "snippet extraction panicked; returning empty output");
            String::new()
        }
    }
}
