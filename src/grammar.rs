/// Tree-sitter grammar binding for Go sources.
use tree_sitter::{Language, Parser};

use crate::error::Error;

/// The Go tree-sitter language. Inputs are parsed as Go whatever their extension.
pub fn go_language() -> Language {
    return tree_sitter_go::LANGUAGE.into();
}

/// A parser with the Go grammar already loaded.
///
/// # Errors
///
/// Returns `Error::Grammar` if the grammar ABI does not match the linked tree-sitter.
pub fn go_parser() -> Result<Parser, Error> {
    let mut parser = Parser::new();
    parser.set_language(&go_language())?;
    return Ok(parser);
}
