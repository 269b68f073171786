//! Element vocabularies.
//!
//! Both trees are built from one closed set of tags. The presentational
//! vocabulary is what a native editing surface produces; the semantic
//! vocabulary is the persisted form. Anything else that shows up in
//! untrusted input is carried as [`Tag::Unknown`] until it is sanitized away.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Class that marks a presentational element as a monospace (code) carrier.
pub const MONOSPACE_CLASS: &str = "markwell-code";

/// Known element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKind {
    // Shared by both vocabularies
    Paragraph,
    UnorderedList,
    OrderedList,
    ListItem,
    Link,

    // Semantic only
    Heading1,
    Heading2,
    Heading3,
    Emphasis,
    Strong,
    Code,

    // Presentational only
    Div,
    Italic,
    Bold,
    MonospaceSpan,
    LineBreak,
    Span,
}

/// Inline annotation kinds.
///
/// Presentational and semantic tags that mean the same thing map to the same
/// annotation, so `<b>` inside `<strong>` counts as a double annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Annotation {
    Emphasis,
    Strong,
    Code,
    Link,
}

impl TagKind {
    pub const ALL: [TagKind; 17] = [
        TagKind::Paragraph,
        TagKind::UnorderedList,
        TagKind::OrderedList,
        TagKind::ListItem,
        TagKind::Link,
        TagKind::Heading1,
        TagKind::Heading2,
        TagKind::Heading3,
        TagKind::Emphasis,
        TagKind::Strong,
        TagKind::Code,
        TagKind::Div,
        TagKind::Italic,
        TagKind::Bold,
        TagKind::MonospaceSpan,
        TagKind::LineBreak,
        TagKind::Span,
    ];

    /// Map an HTML element name to a known kind.
    ///
    /// `font` only counts as a monospace carrier when it has the marker class;
    /// a bare `font` is foreign markup.
    pub fn from_html(local_name: &str, classes: &str) -> Option<TagKind> {
        let kind = match local_name.to_ascii_lowercase().as_str() {
            "p" => TagKind::Paragraph,
            "ul" => TagKind::UnorderedList,
            "ol" => TagKind::OrderedList,
            "li" => TagKind::ListItem,
            "a" => TagKind::Link,
            "h1" => TagKind::Heading1,
            "h2" => TagKind::Heading2,
            "h3" => TagKind::Heading3,
            "em" => TagKind::Emphasis,
            "strong" => TagKind::Strong,
            "code" => TagKind::Code,
            "div" => TagKind::Div,
            "i" => TagKind::Italic,
            "b" => TagKind::Bold,
            "br" => TagKind::LineBreak,
            "span" => TagKind::Span,
            "font" if has_class(classes, MONOSPACE_CLASS) => TagKind::MonospaceSpan,
            _ => return None,
        };
        Some(kind)
    }

    /// HTML element name used when serializing.
    pub fn html_name(self) -> &'static str {
        match self {
            TagKind::Paragraph => "p",
            TagKind::UnorderedList => "ul",
            TagKind::OrderedList => "ol",
            TagKind::ListItem => "li",
            TagKind::Link => "a",
            TagKind::Heading1 => "h1",
            TagKind::Heading2 => "h2",
            TagKind::Heading3 => "h3",
            TagKind::Emphasis => "em",
            TagKind::Strong => "strong",
            TagKind::Code => "code",
            TagKind::Div => "div",
            TagKind::Italic => "i",
            TagKind::Bold => "b",
            TagKind::MonospaceSpan => "font",
            TagKind::LineBreak => "br",
            TagKind::Span => "span",
        }
    }

    /// Stable snake_case name used in JSON output.
    pub fn name(self) -> &'static str {
        match self {
            TagKind::Paragraph => "paragraph",
            TagKind::UnorderedList => "unordered_list",
            TagKind::OrderedList => "ordered_list",
            TagKind::ListItem => "list_item",
            TagKind::Link => "link",
            TagKind::Heading1 => "heading1",
            TagKind::Heading2 => "heading2",
            TagKind::Heading3 => "heading3",
            TagKind::Emphasis => "emphasis",
            TagKind::Strong => "strong",
            TagKind::Code => "code",
            TagKind::Div => "div",
            TagKind::Italic => "italic",
            TagKind::Bold => "bold",
            TagKind::MonospaceSpan => "monospace_span",
            TagKind::LineBreak => "line_break",
            TagKind::Span => "span",
        }
    }

    /// Part of the canonical output vocabulary.
    ///
    /// Line breaks are kept inside blocks (only trailing ones are artifacts),
    /// so they are accepted on both sides.
    pub fn is_semantic(self) -> bool {
        !matches!(
            self,
            TagKind::Div
                | TagKind::Italic
                | TagKind::Bold
                | TagKind::MonospaceSpan
                | TagKind::Span
        )
    }

    /// Part of the vocabulary a native editing surface works with.
    ///
    /// Headings are created on the live surface by block replacement, so
    /// they live on this side as well.
    pub fn is_presentational(self) -> bool {
        !matches!(self, TagKind::Emphasis | TagKind::Strong | TagKind::Code)
    }

    /// Block-level tags that may stand at the top level of a semantic document.
    pub fn is_top_level_block(self) -> bool {
        matches!(
            self,
            TagKind::Paragraph
                | TagKind::Heading1
                | TagKind::Heading2
                | TagKind::Heading3
                | TagKind::UnorderedList
                | TagKind::OrderedList
        )
    }

    pub fn is_list(self) -> bool {
        matches!(self, TagKind::UnorderedList | TagKind::OrderedList)
    }

    pub fn is_heading(self) -> bool {
        matches!(self, TagKind::Heading1 | TagKind::Heading2 | TagKind::Heading3)
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            TagKind::Heading1 => Some(1),
            TagKind::Heading2 => Some(2),
            TagKind::Heading3 => Some(3),
            _ => None,
        }
    }

    pub fn heading(level: u8) -> Option<TagKind> {
        match level {
            1 => Some(TagKind::Heading1),
            2 => Some(TagKind::Heading2),
            3 => Some(TagKind::Heading3),
            _ => None,
        }
    }

    /// Elements without children (`<br>`).
    pub fn is_void(self) -> bool {
        self == TagKind::LineBreak
    }

    pub fn annotation(self) -> Option<Annotation> {
        match self {
            TagKind::Emphasis | TagKind::Italic => Some(Annotation::Emphasis),
            TagKind::Strong | TagKind::Bold => Some(Annotation::Strong),
            TagKind::Code | TagKind::MonospaceSpan => Some(Annotation::Code),
            TagKind::Link => Some(Annotation::Link),
            _ => None,
        }
    }

    /// Member of the formatting exclusivity group.
    ///
    /// Emphasis, strong, code and heading levels may not stack on one run of
    /// text. Links are annotations but not part of this group.
    pub fn is_exclusive_format(self) -> bool {
        self.is_heading()
            || matches!(
                self.annotation(),
                Some(Annotation::Emphasis | Annotation::Strong | Annotation::Code)
            )
    }

    /// Presentational -> semantic substitution.
    pub fn semantic(self) -> TagKind {
        match self {
            TagKind::Italic => TagKind::Emphasis,
            TagKind::Bold => TagKind::Strong,
            TagKind::MonospaceSpan => TagKind::Code,
            TagKind::Div => TagKind::Paragraph,
            other => other,
        }
    }

    /// Semantic -> presentational substitution.
    pub fn presentational(self) -> TagKind {
        match self {
            TagKind::Emphasis => TagKind::Italic,
            TagKind::Strong => TagKind::Bold,
            TagKind::Code => TagKind::MonospaceSpan,
            other => other,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TagKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or(())
    }
}

/// Element tag as stored in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Known(TagKind),
    /// Foreign element from untrusted input, by lowercase local name.
    Unknown(String),
}

impl Tag {
    pub fn from_html(local_name: &str, classes: &str) -> Tag {
        match TagKind::from_html(local_name, classes) {
            Some(kind) => Tag::Known(kind),
            None => Tag::Unknown(local_name.to_ascii_lowercase()),
        }
    }

    pub fn kind(&self) -> Option<TagKind> {
        match self {
            Tag::Known(kind) => Some(*kind),
            Tag::Unknown(_) => None,
        }
    }

    pub fn html_name(&self) -> &str {
        match self {
            Tag::Known(kind) => kind.html_name(),
            Tag::Unknown(name) => name,
        }
    }
}

impl From<TagKind> for Tag {
    fn from(kind: TagKind) -> Self {
        Tag::Known(kind)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tag::Known(kind) => serializer.serialize_str(kind.name()),
            Tag::Unknown(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(match name.parse::<TagKind>() {
            Ok(kind) => Tag::Known(kind),
            Err(()) => Tag::Unknown(name),
        })
    }
}

/// Check a whitespace-separated class list for one class.
pub fn has_class(classes: &str, class: &str) -> bool {
    classes.split_whitespace().any(|c| c == class)
}
