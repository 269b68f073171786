//! # markwell
//!
//! A rich-text editing engine that keeps WYSIWYG output clean.
//!
//! Editing surfaces manipulate presentational markup (`<b>`, `<i>`, a
//! monospace `<font>`); documents are stored as semantic markup (`<strong>`,
//! `<em>`, `<code>`). markwell converts between the two, sanitizes pasted
//! content, keeps emphasis, strong, code and headings mutually exclusive and
//! preserves the user's selection across every structural rewrite.
//!
//! ## Features
//!
//! - Semantify / desemantify between the two tag vocabularies
//! - Allow-list paste sanitizer
//! - Formatting commands with exclusivity and state queries
//! - Editing sessions with debounced change notifications
//!
//! ## Quick Start
//!
//! ```
//! use markwell::{AllowList, parse_fragment, sanitize_html, semantify, to_html};
//!
//! let live = parse_fragment("<div>hello <b>world</b></div>");
//! let output = semantify(&live);
//! assert_eq!(to_html(&output, output.root()), "<p>hello <strong>world</strong></p>");
//!
//! let pasted = sanitize_html(r#"<p style="color:red">hi<script>x()</script></p>"#, &AllowList::default());
//! assert_eq!(to_html(&pasted, pasted.root()), "<p>hi</p>");
//! ```
//!
//! ## Sessions
//!
//! An [`Editor`] drives a host [`Surface`]. [`MemorySurface`] is an
//! in-memory host for tests and tools:
//!
//! ```
//! use markwell::{Command, Editor, EditorConfig, MemorySurface};
//!
//! let mut editor = Editor::new();
//! editor.activate(MemorySurface::from_html("<p>make this loud</p>"), EditorConfig::default()).unwrap();
//! editor.surface_mut().unwrap().select_text("loud");
//! editor.invoke_command(Command::Strong, 0).unwrap();
//!
//! assert_eq!(editor.content(), "<p>make this <strong>loud</strong></p>");
//! assert!(editor.command_state(Command::Strong));
//! ```

pub mod command;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod normalize;
pub mod sanitize;
pub mod schedule;
pub mod selection;
pub mod session;
pub mod surface;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use command::{Command, CommandKind, CommandRegistry};
pub use config::EditorConfig;
pub use dom::{Node, NodeId, Tag, TagKind, Tree, parse_fragment, parse_fragment_bytes, to_html};
pub use error::{Error, Result};
pub use events::{Event, EventBus, SubscriptionId};
pub use normalize::{desemantify, semantify};
pub use sanitize::{AllowList, sanitize, sanitize_html, strip_annotations};
pub use schedule::{Debouncer, Scheduler, Time, TimerToken};
pub use selection::{Position, Selection, preserve};
pub use session::{Editor, Key, KeyDisposition};
pub use surface::{MemorySurface, NativeCommand, Surface};
