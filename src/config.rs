//! TOML policy files for the command line.
//!
//! A policy file overrides the default policy field by field: a key that is
//! absent keeps the built-in default, a key that is present replaces it
//! entirely. The rewrite hook is code, not configuration, and has no file
//! form.
//!
//! ```toml
//! tags = ["a", "em", "strong", "p"]
//! prune = ["script", "style"]
//! styles = ["color", "font-weight"]
//! strip = true
//! strip-comments = false
//!
//! [attributes]
//! "*" = ["class", "title"]
//! a = ["href"]
//! ```
//!
//! `attributes` also takes the flat form, one list applied to every tag:
//!
//! ```toml
//! attributes = ["href", "title"]
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use sanitize::{AttrAllow, Policy};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFile {
    tags: Option<Vec<String>>,
    prune: Option<Vec<String>>,
    attributes: Option<AttrSpec>,
    styles: Option<Vec<String>>,
    strip: Option<bool>,
    #[serde(rename = "strip-comments")]
    strip_comments: Option<bool>,
}

/// The two accepted shapes of the `attributes` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AttrSpec {
    Flat(Vec<String>),
    ByTag(BTreeMap<String, Vec<String>>),
}

impl PolicyFile {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn into_policy(self) -> Policy {
        let mut policy = Policy::default();
        if let Some(tags) = self.tags {
            policy.tags = tags.into_iter().collect();
        }
        if let Some(prune) = self.prune {
            policy.prune = prune.into_iter().collect();
        }
        if let Some(attributes) = self.attributes {
            policy.attributes = match attributes {
                AttrSpec::Flat(names) => AttrAllow::flat(names),
                AttrSpec::ByTag(map) => AttrAllow::by_tag(map),
            };
        }
        if let Some(styles) = self.styles {
            policy.styles = styles.into_iter().collect();
        }
        if let Some(strip) = self.strip {
            policy.strip = strip;
        }
        if let Some(strip_comments) = self.strip_comments {
            policy.strip_comments = strip_comments;
        }
        policy
    }
}
