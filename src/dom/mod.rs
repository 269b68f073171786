//! Document tree model.
//!
//! This module provides the arena tree both document forms are built from,
//! the closed tag vocabularies, HTML parsing of (untrusted) fragments via
//! html5ever, and HTML serialization.
//!
//! # Example
//!
//! ```
//! use markwell::dom::{parse_fragment, to_html};
//!
//! let tree = parse_fragment("<p>Hello <b>World</b></p>");
//! assert_eq!(to_html(&tree, tree.root()), "<p>Hello <b>World</b></p>");
//! ```

mod arena;
mod node;
mod serialize;
mod tag;
mod tree_sink;

pub use arena::{ArenaNode, Attribute, ChildrenIter, Descendants, NodeData, NodeId, Tree};
pub use node::Node;
pub use serialize::{block_text, escape_attr, escape_text, outer_html, to_html};
pub use tag::{Annotation, MONOSPACE_CLASS, Tag, TagKind, has_class};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::{TreeBuilderSink, find_by_html_name};

/// Parse an HTML fragment into a tree.
///
/// The fragment is parsed as the body of a document; the children of
/// `<body>` become the children of the returned tree's root. Comments and
/// unknown elements are kept so that callers can decide what to do with
/// them.
pub fn parse_fragment(html: &str) -> Tree {
    let sink = TreeBuilderSink::new();
    let result = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    let mut tree = result.into_tree();

    let root = tree.root();
    let Some(body) = find_by_html_name(&tree, root, "body") else {
        return tree;
    };

    // Hoist body content to the root and drop the html/head scaffolding.
    let scaffolding = tree.child_ids(root);
    if tree.move_children(body, root).is_ok() {
        for node in scaffolding {
            let _ = tree.detach(node);
        }
    }
    tree
}

/// Parse an HTML fragment given as bytes.
///
/// Handles byte-to-string conversion with encoding detection: UTF-8, then
/// the declared charset, then Windows-1252.
pub fn parse_fragment_bytes(html: &[u8]) -> Tree {
    let hint = crate::util::extract_charset(html);
    let text = crate::util::decode_text(html, hint);
    parse_fragment(&text)
}
