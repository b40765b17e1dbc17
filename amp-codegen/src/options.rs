//! Generator options.

use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::ToTokens;

/// Default path of the runtime crate generated code refers to.
pub const DEFAULT_RUNTIME: &str = "::amp_types";
/// Default prefix of forwarding constructors.
pub const DEFAULT_FN_PREFIX: &str = "proto_";
/// Default name of the terminator keyword constant.
pub const DEFAULT_TERMINATOR: &str = "KW_END";

/// Options controlling the emitted code.
#[derive(Debug, Clone)]
pub struct CodegenOptions {
    runtime: String,
    fn_prefix: String,
    terminator: String,
    pretty: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CodegenOptions {
    /// Creates options with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime: DEFAULT_RUNTIME.to_string(),
            fn_prefix: DEFAULT_FN_PREFIX.to_string(),
            terminator: DEFAULT_TERMINATOR.to_string(),
            pretty: true,
        }
    }

    /// Sets the path of the runtime crate (e.g. `::amp_types` or
    /// `crate::runtime`).
    #[must_use]
    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime = path.into();
        self
    }

    /// Sets the prefix of forwarding constructors.
    #[must_use]
    pub fn fn_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fn_prefix = prefix.into();
        self
    }

    /// Sets the name of the terminator keyword constant.
    #[must_use]
    pub fn terminator(mut self, name: impl Into<String>) -> Self {
        self.terminator = name.into();
        self
    }

    /// Enables or disables pretty-printing of the output.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Returns the runtime crate path as written.
    #[must_use]
    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    /// Returns the forwarding constructor prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.fn_prefix
    }

    /// Returns the terminator constant name.
    #[must_use]
    pub fn terminator_name(&self) -> &str {
        &self.terminator
    }

    /// Returns true if output is pretty-printed.
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Parses the runtime path into tokens.
    ///
    /// # Errors
    /// Returns `CodegenError::Syntax` if the path is not a valid Rust path.
    pub fn runtime_tokens(&self) -> Result<TokenStream, CodegenError> {
        let path: syn::Path = syn::parse_str(&self.runtime)?;
        Ok(path.into_token_stream())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CodegenOptions::default();
        assert_eq!(options.runtime(), "::amp_types");
        assert_eq!(options.prefix(), "proto_");
        assert_eq!(options.terminator_name(), "KW_END");
        assert!(options.is_pretty());
    }

    #[test]
    fn test_builder() {
        let options = CodegenOptions::new()
            .runtime_path("crate::rt")
            .fn_prefix("amqp_")
            .terminator("END")
            .pretty(false);
        assert_eq!(options.runtime(), "crate::rt");
        assert_eq!(options.prefix(), "amqp_");
        assert_eq!(options.terminator_name(), "END");
        assert!(!options.is_pretty());
        let tokens = options.runtime_tokens().unwrap().to_string();
        assert_eq!(tokens.replace(' ', ""), "crate::rt");
    }

    #[test]
    fn test_invalid_runtime_path() {
        let options = CodegenOptions::new().runtime_path("not a path");
        assert!(matches!(options.runtime_tokens(), Err(CodegenError::Syntax(_))));
    }
}
