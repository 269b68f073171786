//! WASM bindings for browser hosts.
//!
//! Exposes the stateless conversions to JavaScript via wasm-bindgen. All
//! functions take and return HTML strings.

use wasm_bindgen::prelude::*;

use crate::config::DEFAULT_CODE_FONT_FAMILY;
use crate::dom::{NodeId, parse_fragment, to_html};
use crate::normalize::{desemantify, semantify};
use crate::sanitize::{self, AllowList};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Presentational HTML (as produced by an editable element) to semantic HTML.
#[wasm_bindgen]
pub fn semantify_html(html: &str) -> String {
    let tree = semantify(&parse_fragment(html));
    to_html(&tree, NodeId::ROOT)
}

/// Semantic HTML to presentational HTML, ready to load into an editable
/// element. `code_font_family` defaults to a generic monospace stack.
#[wasm_bindgen]
pub fn desemantify_html(html: &str, code_font_family: Option<String>) -> String {
    let font = code_font_family.unwrap_or_else(|| DEFAULT_CODE_FONT_FAMILY.to_string());
    let tree = desemantify(&parse_fragment(html), &font);
    to_html(&tree, NodeId::ROOT)
}

/// Sanitize pasted HTML.
///
/// `allow_list_json` is an object of tag name -> allowed attribute names;
/// the default list is used when it is omitted.
#[wasm_bindgen]
pub fn sanitize_html(html: &str, allow_list_json: Option<String>) -> Result<String, JsValue> {
    let allow_list = match allow_list_json {
        Some(json) => AllowList::from_json_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => AllowList::default(),
    };
    let tree = sanitize::sanitize_html(html, &allow_list);
    Ok(to_html(&tree, NodeId::ROOT))
}
