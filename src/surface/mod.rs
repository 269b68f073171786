//! Live editing surface.
//!
//! The engine never owns the surface it edits: a host supplies the mutable
//! presentational tree, the current selection and the native editing
//! primitives through [`Surface`]. [`MemorySurface`] is an in-memory host
//! used by the tests and the command line tool.

mod memory;
pub mod range;

pub use memory::MemorySurface;

use crate::dom::Tree;
use crate::error::Result;
use crate::selection::Selection;

/// Native editing primitives a surface provides.
///
/// Inline formats and lists toggle: applying one where it is already fully
/// present removes it, like the corresponding browser editing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCommand {
    Bold,
    Italic,
    /// Monospace carrier with the given font family.
    Monospace(String),
    InsertUnorderedList,
    InsertOrderedList,
    CreateLink(String),
    /// Strip every inline format (links excepted) from the selected text.
    RemoveFormat,
}

/// A host editing surface.
pub trait Surface {
    /// The presentational tree being edited.
    fn tree(&self) -> &Tree;

    fn tree_mut(&mut self) -> &mut Tree;

    /// Current selection, if the surface has one.
    fn selection(&self) -> Option<Selection>;

    fn set_selection(&mut self, selection: Option<Selection>);

    fn set_editable(&mut self, editable: bool);

    fn focus(&mut self);

    /// Run a native editing primitive on the current selection.
    fn exec(&mut self, command: NativeCommand) -> Result<()>;

    /// Replace the selection with the children of `fragment`'s root.
    fn insert_fragment(&mut self, fragment: &Tree) -> Result<()>;

    /// Ask the user for a value. `None` means the prompt was dismissed.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}
