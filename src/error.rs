//! Error types for markwell operations.

use thiserror::Error;

use crate::dom::NodeId;

/// Errors that can occur while transforming or editing a document.
///
/// Only [`Error::InvalidReference`] escapes the tree operations. The other
/// editing failures are recovered where they are detected and only show up
/// in logs.
#[derive(Error, Debug)]
pub enum Error {
    #[error("node {0:?} is not part of this tree")]
    InvalidReference(NodeId),

    #[error("selection refers to a detached node")]
    StaleSelection,

    #[error("cannot classify pasted element <{0}>")]
    UnsupportedPasteContent(String),

    #[error("command state query failed: {0}")]
    CommandQueryFailure(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Build an `InvalidReference` error and report it at error level.
///
/// Passing a foreign node to a tree primitive is a caller bug; it is logged
/// where it is detected so it cannot pass unnoticed.
pub(crate) fn invalid_reference(id: NodeId) -> Error {
    tracing::error!(target: "markwell::dom", node = ?id, "invalid node reference");
    Error::InvalidReference(id)
}
