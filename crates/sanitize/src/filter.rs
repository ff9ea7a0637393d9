//! The sanitizing filter: a token sink that folds the event stream into a
//! safe output string under a policy.
//!
//! Invariants:
//! - Prune beats every other rule, including the allowed-tag set.
//! - `prune_depth`/`strip_depth` move only on tag events and return to zero
//!   on balanced input; the tokenizer's end-of-input flush guarantees the
//!   end events arrive.
//! - Text inside a stripped tag is still emitted (stripping drops markup,
//!   not content); text inside a pruned subtree is not.
//! - Output text passes through `escape_html_entities` except for `<style>`
//!   interiors, which carry filtered CSS verbatim.
//! - Kept comments re-emit verbatim only when `<!--interior-->` tokenizes
//!   back to the same interior; the rest are dropped.

use markup::{Attribute, SinkResult, Token, TokenSink};

use crate::entities::escape_html_entities;
use crate::policy::Policy;

pub(crate) struct Sanitizer<'p> {
    policy: &'p Policy,
    output: String,
    prune_depth: u32,
    strip_depth: u32,
    inside_style: bool,
}

impl<'p> Sanitizer<'p> {
    pub(crate) fn new(policy: &'p Policy) -> Self {
        Sanitizer {
            policy,
            output: String::new(),
            prune_depth: 0,
            strip_depth: 0,
            inside_style: false,
        }
    }

    pub(crate) fn into_output(self) -> String {
        self.output
    }

    fn start_tag(&mut self, name: &str, attributes: Vec<Attribute>, unary: bool) {
        if self.prune_depth > 0 {
            if !unary {
                self.prune_depth += 1;
            }
            return;
        }
        if self.policy.prune.contains(name) {
            self.prune_depth = 1;
            return;
        }
        if !self.policy.tags.contains(name) {
            if self.policy.strip {
                if !unary {
                    self.strip_depth += 1;
                }
                return;
            }
            // Escape mode: the tag shows up as literal text. A unary tag
            // renders in its closing form.
            self.output.push_str("&lt;");
            if unary {
                self.output.push('/');
            }
            self.output.push_str(name);
            self.output.push_str("&gt;");
            return;
        }

        self.inside_style = name == "style" && !unary;

        let attributes = match &self.policy.rewrite {
            Some(hook) if hook.pattern.is_match(name) => (hook.apply)(name, attributes),
            _ => attributes,
        };

        self.output.push('<');
        self.output.push_str(name);
        for attr in &attributes {
            let attr_name = attr.name.to_ascii_lowercase();
            if !self.policy.attributes.allows(name, &attr_name) {
                continue;
            }
            self.output.push(' ');
            self.output.push_str(&attr_name);
            self.output.push_str("=\"");
            if attr_name == "style" {
                let kept = cssfilter::filter_declarations(&attr.escaped, &self.policy.styles);
                self.output.push_str(&kept);
            } else {
                self.output.push_str(&attr.escaped);
            }
            self.output.push('"');
        }
        if unary {
            self.output.push('/');
        }
        self.output.push('>');
    }

    fn end_tag(&mut self, name: &str) {
        if self.prune_depth > 0 {
            self.prune_depth -= 1;
            return;
        }
        if !self.policy.tags.contains(name) {
            if self.strip_depth > 0 {
                self.strip_depth -= 1;
                return;
            }
            self.output.push_str("&lt;/");
            self.output.push_str(name);
            self.output.push_str("&gt;");
            return;
        }
        if self.inside_style {
            self.inside_style = false;
        }
        self.output.push_str("</");
        self.output.push_str(name);
        self.output.push('>');
    }

    fn text(&mut self, text: &str) {
        if self.prune_depth > 0 {
            return;
        }
        if self.inside_style {
            let kept = cssfilter::filter_style_body(text, &self.policy.styles);
            self.output.push_str(&kept);
            return;
        }
        self.output.push_str(&escape_html_entities(text));
    }

    fn comment(&mut self, text: &str) {
        if self.prune_depth > 0 || self.policy.strip_comments {
            return;
        }
        // `<!--text-->` must re-tokenize to the same interior. An interior
        // containing the terminator (the short-close quirk produces these)
        // or an empty one cannot round-trip, so it is dropped.
        if text.is_empty() || text.contains("-->") {
            return;
        }
        self.output.push_str("<!--");
        self.output.push_str(text);
        self.output.push_str("-->");
    }
}

impl TokenSink for Sanitizer<'_> {
    fn process(&mut self, token: Token) -> SinkResult {
        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => self.start_tag(&name, attributes, self_closing),
            Token::EndTag(name) => self.end_tag(&name),
            Token::Text(text) => self.text(&text),
            Token::Comment(text) => self.comment(&text),
        }
        SinkResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn run(policy: &Policy, html: &str) -> String {
        let mut sink = Sanitizer::new(policy);
        markup::tokenize(html, &mut sink);
        sink.into_output()
    }

    fn names(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prune_wins_over_allowed() {
        let policy = Policy {
            tags: names(&["style"]),
            prune: names(&["style"]),
            ..Policy::default()
        };
        assert_eq!(run(&policy, "<style>x</style>y"), "y");
    }

    #[test]
    fn prune_drops_nested_subtree_only() {
        let policy = Policy {
            tags: names(&["b"]),
            prune: names(&["select"]),
            ..Policy::default()
        };
        assert_eq!(
            run(&policy, "a<select><b>deep</b></select>b<b>keep</b>"),
            "ab<b>keep</b>"
        );
    }

    #[test]
    fn prune_of_void_tag_extends_to_enclosing_close() {
        // A pruned void tag opens a prune region that the next end event
        // closes, so the enclosing tag's close is consumed by it.
        let policy = Policy {
            tags: names(&["p"]),
            prune: names(&["img"]),
            ..Policy::default()
        };
        assert_eq!(run(&policy, "<p><img>x</p>"), "<p>");
    }

    #[test]
    fn strip_mode_keeps_children() {
        let policy = Policy {
            strip: true,
            ..Policy::default()
        };
        assert_eq!(run(&policy, "<div>keep <em>this</em></div>"), "keep <em>this</em>");
    }

    #[test]
    fn strip_mode_keeps_comments_when_comments_kept() {
        let policy = Policy {
            strip: true,
            strip_comments: false,
            ..Policy::default()
        };
        assert_eq!(run(&policy, "<div><!-- note --></div>"), "<!-- note -->");
    }

    #[test]
    fn unstable_comment_interiors_are_dropped_when_kept() {
        let policy = Policy {
            strip_comments: false,
            ..Policy::default()
        };
        // The empty comment swallows the rest of the input as its interior,
        // terminator included; re-emitting that would grow on every pass.
        assert_eq!(run(&policy, "<!---->trailing"), "");
        // An unterminated comment has no terminator in its interior and
        // re-serializes stably.
        let once = run(&policy, "<!-- never closed");
        assert_eq!(once, "<!-- never closed-->");
        assert_eq!(run(&policy, &once), once);
    }

    #[test]
    fn escape_mode_renders_disallowed_tags_as_text() {
        let policy = Policy::default();
        assert_eq!(run(&policy, "a<div>b</div>c"), "a&lt;div&gt;b&lt;/div&gt;c");
        assert_eq!(run(&policy, "x<br>y"), "x&lt;/br&gt;y");
    }

    #[test]
    fn style_attribute_is_filtered_not_dropped() {
        let policy = Policy {
            tags: names(&["span"]),
            attributes: crate::policy::AttrAllow::flat(["style"]),
            styles: names(&["color"]),
            ..Policy::default()
        };
        assert_eq!(
            run(&policy, "<span style=\"color: red; position: fixed\">x</span>"),
            "<span style=\"color: red;\">x</span>"
        );
        // All declarations rejected: the attribute stays, emptied.
        assert_eq!(
            run(&policy, "<span style=\"position: fixed\">x</span>"),
            "<span style=\"\">x</span>"
        );
    }

    #[test]
    fn style_body_is_css_filtered_and_unescaped() {
        let policy = Policy {
            tags: names(&["style"]),
            styles: names(&["color"]),
            ..Policy::default()
        };
        assert_eq!(
            run(&policy, "<style>p {color: red; top: 0}</style>"),
            "<style>p {color: red;}</style>"
        );
    }

    #[test]
    fn text_after_closed_style_is_escaped_again() {
        let policy = Policy {
            tags: names(&["style"]),
            styles: names(&["color"]),
            ..Policy::default()
        };
        assert_eq!(
            run(&policy, "<style>p{color:red}</style>a < b"),
            "<style>p{color:red;}</style>a &lt; b"
        );
    }

    #[test]
    fn rewrite_hook_sees_attributes_before_filtering() {
        use regex::Regex;

        let hook = crate::policy::TagRewrite::new(
            Regex::new("^a$").unwrap(),
            |_tag, mut attrs: Vec<Attribute>| {
                for attr in &mut attrs {
                    if attr.name == "href" {
                        *attr = Attribute::new("title", attr.value.clone());
                    }
                }
                attrs
            },
        );
        let policy = Policy {
            rewrite: Some(hook),
            ..Policy::default()
        };
        assert_eq!(
            run(&policy, "<a href=\"x\">go</a>"),
            "<a title=\"x\">go</a>"
        );
    }

    #[test]
    fn rewrite_hook_skips_non_matching_tags() {
        use regex::Regex;

        let hook = crate::policy::TagRewrite::new(Regex::new("^img$").unwrap(), |_, _| {
            vec![Attribute::new("class", "hit")]
        });
        let policy = Policy {
            rewrite: Some(hook),
            ..Policy::default()
        };
        assert_eq!(run(&policy, "<a href=\"x\">go</a>"), "<a href=\"x\">go</a>");
    }

    #[test]
    fn attribute_names_are_lowercased_in_output() {
        let policy = Policy::default();
        assert_eq!(
            run(&policy, "<a HREF=\"u\" TITLE=\"t\">x</a>"),
            "<a href=\"u\" title=\"t\">x</a>"
        );
    }
}
