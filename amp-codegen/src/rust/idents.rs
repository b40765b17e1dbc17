//! Identifier and output helpers shared by the emitters.

use crate::error::CodegenError;
use proc_macro2::{Ident, Span, TokenStream};

/// Words that need the raw `r#` prefix to be used as identifiers.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Words that cannot be raw identifiers and get a trailing underscore.
const RESERVED_PATH_WORDS: &[&str] = &["crate", "self", "super", "Self"];

/// Creates an identifier, escaping Rust keywords.
#[must_use]
pub fn ident(name: &str) -> Ident {
    if RESERVED_PATH_WORDS.contains(&name) {
        Ident::new(&format!("{name}_"), Span::call_site())
    } else if RAW_KEYWORDS.contains(&name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

/// Renders tokens as a source file prefixed with the `@generated` banner.
///
/// # Errors
/// Returns `CodegenError::Syntax` if pretty-printing is requested and the
/// tokens do not parse as a Rust file.
pub fn render(
    tokens: TokenStream,
    documents: &[String],
    pretty: bool,
) -> Result<String, CodegenError> {
    let body = if pretty {
        let file: syn::File = syn::parse2(tokens)?;
        prettyplease::unparse(&file)
    } else {
        let mut body = tokens.to_string();
        body.push('\n');
        body
    };

    Ok(format!(
        "// @generated by amp-codegen from: {}\n// Do not edit by hand.\n\n{body}",
        documents.join(", ")
    ))
}
