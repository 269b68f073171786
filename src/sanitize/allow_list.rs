//! Allow-list table for pasted content.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::dom::{Tag, TagKind};
use crate::error::Result;

/// Tags that survive sanitization, with the attributes kept on each.
///
/// Keys may be HTML names (`strong`, `a`) or tag kind names (`paragraph`,
/// `link`). A semantic tag and its presentational counterpart share an
/// entry, so allowing `strong` also lets pasted `<b>` through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList {
    tags: BTreeMap<String, BTreeSet<String>>,
}

impl Default for AllowList {
    fn default() -> Self {
        let mut list = AllowList::empty();
        for tag in ["p", "ul", "ol", "li", "strong", "code", "em", "b", "i"] {
            list.allow(tag, std::iter::empty::<&str>());
        }
        list.allow("a", ["href"]);
        list
    }
}

impl AllowList {
    /// A table that allows nothing: every element is unwrapped.
    pub fn empty() -> Self {
        Self {
            tags: BTreeMap::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Allow `tag` with the given attributes (added to any already allowed).
    pub fn allow<I, S>(&mut self, tag: &str, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.tags.entry(tag.to_ascii_lowercase()).or_default();
        entry.extend(attributes.into_iter().map(|a| a.into().to_ascii_lowercase()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Attributes kept on `tag`, or `None` when the tag is not allowed.
    pub fn attributes(&self, tag: &Tag) -> Option<&BTreeSet<String>> {
        match tag {
            Tag::Known(kind) => lookup_names(*kind)
                .into_iter()
                .find_map(|name| self.tags.get(name)),
            Tag::Unknown(name) => self.tags.get(name.as_str()),
        }
    }

    pub fn allows(&self, tag: &Tag) -> bool {
        self.attributes(tag).is_some()
    }
}

/// Names an element of `kind` is looked up under, own names first.
///
/// Only inline annotations borrow their counterpart's entry; a `div` is not
/// a paragraph until the semantifier says so.
fn lookup_names(kind: TagKind) -> Vec<&'static str> {
    let mut names = vec![kind.html_name(), kind.name()];
    if kind.annotation().is_none() {
        return names;
    }
    for counterpart in [kind.semantic(), kind.presentational()] {
        if counterpart != kind {
            names.push(counterpart.html_name());
            names.push(counterpart.name());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let list = AllowList::default();
        assert!(list.allows(&Tag::Known(TagKind::Paragraph)));
        assert!(list.allows(&Tag::Known(TagKind::Bold)));
        assert!(!list.allows(&Tag::Known(TagKind::Heading1)));
        assert!(!list.allows(&Tag::Known(TagKind::Div)));
        assert!(!list.allows(&Tag::Unknown("script".into())));

        let link = list.attributes(&Tag::Known(TagKind::Link)).unwrap();
        assert!(link.contains("href"));
        assert_eq!(link.len(), 1);
    }

    #[test]
    fn test_counterparts_share_entries() {
        let list = AllowList::from_json_str(r#"{"strong": [], "link": ["HREF"]}"#).unwrap();
        assert!(list.allows(&Tag::Known(TagKind::Bold)));
        assert!(!list.allows(&Tag::Known(TagKind::Italic)));
        assert!(!AllowList::default().allows(&Tag::Known(TagKind::Div)));
        assert!(
            list.attributes(&Tag::Known(TagKind::Link))
                .is_some_and(|a| a.contains("href"))
        );
    }

    #[test]
    fn test_json_shape() {
        let mut list = AllowList::empty();
        list.allow("a", ["href"]);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"{"a":["href"]}"#);
    }
}
