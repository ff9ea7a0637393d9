//! Sanitization policy: what survives, what is pruned, what is rewritten.

use std::collections::{HashMap, HashSet};
use std::fmt;

use markup::Attribute;
use regex::Regex;

/// Attribute whitelist, split into names allowed on every tag and names
/// allowed per tag. Lookups compare the lowercased attribute name against
/// the stored entries verbatim, so entries are expected in lowercase.
#[derive(Debug, Clone, Default)]
pub struct AttrAllow {
    pub wildcard: HashSet<String>,
    pub per_tag: HashMap<String, HashSet<String>>,
}

impl AttrAllow {
    /// Flat form: one list of names allowed on every tag.
    pub fn flat<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttrAllow {
            wildcard: names.into_iter().map(Into::into).collect(),
            per_tag: HashMap::new(),
        }
    }

    /// Mapping form: per-tag lists, with a `*` key feeding the wildcard set.
    pub fn by_tag<T, A, S>(entries: T) -> Self
    where
        T: IntoIterator<Item = (S, A)>,
        A: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allow = AttrAllow::default();
        for (tag, names) in entries {
            let tag = tag.into();
            let names = names.into_iter().map(Into::into);
            if tag == "*" {
                allow.wildcard.extend(names);
            } else {
                allow.per_tag.insert(tag, names.collect());
            }
        }
        allow
    }

    /// Is `attr_name` (already lowercased) allowed on `tag`?
    pub fn allows(&self, tag: &str, attr_name: &str) -> bool {
        self.wildcard.contains(attr_name)
            || self
                .per_tag
                .get(tag)
                .is_some_and(|names| names.contains(attr_name))
    }
}

/// Start-tag rewrite hook. When `pattern` matches a tag name that survived
/// the whitelist, `apply` receives the name and attribute list and returns
/// the list to use instead. It runs before attribute filtering, so it may
/// inspect attributes that filtering will drop.
pub struct TagRewrite {
    pub pattern: Regex,
    pub apply: Box<dyn Fn(&str, Vec<Attribute>) -> Vec<Attribute> + Send + Sync>,
}

impl TagRewrite {
    pub fn new<F>(pattern: Regex, apply: F) -> Self
    where
        F: Fn(&str, Vec<Attribute>) -> Vec<Attribute> + Send + Sync + 'static,
    {
        TagRewrite {
            pattern,
            apply: Box::new(apply),
        }
    }
}

impl fmt::Debug for TagRewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRewrite")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// One sanitization policy, immutable for the duration of a call.
///
/// Tag and style names are matched lowercase. `prune` beats `tags`: a tag
/// in both sets is pruned.
#[derive(Debug)]
pub struct Policy {
    /// Tags kept in the output. Everything else is escaped or stripped.
    pub tags: HashSet<String>,
    /// Tags whose entire subtree is dropped silently.
    pub prune: HashSet<String>,
    pub attributes: AttrAllow,
    /// CSS property names allowed in `style` attributes and `<style>` bodies.
    pub styles: HashSet<String>,
    /// Discard disallowed tags instead of escaping them into visible text.
    pub strip: bool,
    pub strip_comments: bool,
    pub rewrite: Option<TagRewrite>,
}

const DEFAULT_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "blockquote", "code", "em", "i", "li", "ol", "strong", "ul",
];

impl Default for Policy {
    fn default() -> Self {
        Policy {
            tags: DEFAULT_TAGS.iter().map(|s| s.to_string()).collect(),
            prune: HashSet::new(),
            attributes: AttrAllow::by_tag([
                ("a", vec!["href", "title"]),
                ("abbr", vec!["title"]),
                ("acronym", vec!["title"]),
            ]),
            styles: HashSet::new(),
            strip: false,
            strip_comments: true,
            rewrite: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_conservative() {
        let policy = Policy::default();
        assert!(policy.tags.contains("a"));
        assert!(policy.tags.contains("blockquote"));
        assert!(!policy.tags.contains("script"));
        assert!(!policy.tags.contains("style"));
        assert!(policy.prune.is_empty());
        assert!(policy.styles.is_empty());
        assert!(!policy.strip);
        assert!(policy.strip_comments);
        assert!(policy.rewrite.is_none());
    }

    #[test]
    fn flat_attributes_apply_to_every_tag() {
        let allow = AttrAllow::flat(["title", "class"]);
        assert!(allow.allows("a", "title"));
        assert!(allow.allows("span", "class"));
        assert!(!allow.allows("a", "href"));
    }

    #[test]
    fn by_tag_routes_star_into_wildcard() {
        let allow = AttrAllow::by_tag([("*", vec!["class"]), ("a", vec!["href"])]);
        assert!(allow.allows("a", "class"));
        assert!(allow.allows("em", "class"));
        assert!(allow.allows("a", "href"));
        assert!(!allow.allows("em", "href"));
    }

    #[test]
    fn lookups_match_entries_verbatim() {
        // Entries are taken as given; an uppercase entry can never match a
        // lowercased attribute name.
        let allow = AttrAllow::flat(["Style"]);
        assert!(!allow.allows("p", "style"));
        assert!(allow.wildcard.contains("Style"));
    }

    #[test]
    fn default_per_tag_whitelist() {
        let policy = Policy::default();
        assert!(policy.attributes.allows("a", "href"));
        assert!(policy.attributes.allows("abbr", "title"));
        assert!(!policy.attributes.allows("abbr", "href"));
        assert!(!policy.attributes.allows("b", "title"));
    }
}
