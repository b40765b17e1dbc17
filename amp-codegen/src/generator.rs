//! Artifact generation driver.

use crate::error::CodegenError;
use crate::options::CodegenOptions;
use crate::rust::idents::render;
use crate::rust::{ConstructorGenerator, DeclarationGenerator};
use amp_schema::ProtocolIr;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Builder methods a field setter must not shadow.
const BUILDER_METHODS: &[&str] = &["new", "build"];

/// The two generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProtocol {
    /// Constants and forwarding constructors.
    pub declarations: String,
    /// Builders and keyword/value constructors.
    pub implementation: String,
}

impl GeneratedProtocol {
    /// File name the declarations artifact is written to.
    pub const DECLARATIONS_FILE: &'static str = "protocol_decls.rs";
    /// File name the implementation artifact is written to.
    pub const IMPLEMENTATION_FILE: &'static str = "protocol_impl.rs";

    /// Writes both artifacts into `dir`.
    ///
    /// # Returns
    /// Paths of the declarations and implementation files.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if a file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<(PathBuf, PathBuf), CodegenError> {
        let declarations = dir.join(Self::DECLARATIONS_FILE);
        let implementation = dir.join(Self::IMPLEMENTATION_FILE);
        std::fs::write(&declarations, &self.declarations)?;
        std::fs::write(&implementation, &self.implementation)?;
        Ok((declarations, implementation))
    }
}

/// Generates both artifacts from one resolved protocol.
pub struct Generator<'a> {
    ir: &'a ProtocolIr,
    options: CodegenOptions,
}

impl<'a> Generator<'a> {
    /// Creates a generator with default options.
    #[must_use]
    pub fn new(ir: &'a ProtocolIr) -> Self {
        Self::with_options(ir, CodegenOptions::default())
    }

    /// Creates a generator with the given options.
    #[must_use]
    pub fn with_options(ir: &'a ProtocolIr, options: CodegenOptions) -> Self {
        Self { ir, options }
    }

    /// Generates the declarations and implementation artifacts.
    ///
    /// Both are rendered in memory; nothing is returned unless both succeed.
    ///
    /// # Errors
    /// Returns `CodegenError` if a generated name is not a valid identifier,
    /// names clash, or the emitted tokens fail to parse.
    pub fn generate(&self) -> Result<GeneratedProtocol, CodegenError> {
        self.check_names()?;
        let runtime = self.options.runtime_tokens()?;
        let pretty = self.options.is_pretty();

        let declarations =
            DeclarationGenerator::new(self.ir, &self.options, runtime.clone()).generate();
        let implementation = ConstructorGenerator::new(self.ir, &self.options, runtime).generate();

        let generated = GeneratedProtocol {
            declarations: render(declarations, &self.ir.documents, pretty)?,
            implementation: render(implementation, &self.ir.documents, pretty)?,
        };

        tracing::info!(
            documents = ?self.ir.documents,
            composites = self.ir.composites.len(),
            keywords = self.ir.keywords.len(),
            frames = self.ir.frames.len(),
            "generated protocol artifacts"
        );
        Ok(generated)
    }

    /// Checks that every emitted name is a usable, unique identifier.
    fn check_names(&self) -> Result<(), CodegenError> {
        let terminator = self.options.terminator_name();
        require_ident(terminator)?;
        if self.ir.keywords.code(terminator).is_some() {
            return Err(CodegenError::generation(format!(
                "terminator '{terminator}' clashes with a field keyword"
            )));
        }

        let mut builders = HashSet::new();
        let mut functions = HashSet::new();
        let mut indices = HashSet::new();
        let mut frames = HashSet::new();
        for composite in &self.ir.composites {
            let builder = composite.builder_name();
            require_ident(&builder)?;
            if !builders.insert(builder) {
                return Err(CodegenError::generation(format!(
                    "type '{}' maps to an existing builder name",
                    composite.name
                )));
            }

            let forwarder = format!("{}{}", self.options.prefix(), composite.fn_name());
            let kw = format!("{forwarder}_kw");
            require_ident(&forwarder)?;
            for name in [forwarder, kw] {
                if !functions.insert(name.clone()) {
                    return Err(CodegenError::generation(format!(
                        "type '{}' emits function '{name}' which already exists",
                        composite.name
                    )));
                }
            }

            for field in &composite.fields {
                require_ident(&field.keyword)?;
                require_ident(&field.index_name)?;
                if !indices.insert(field.index_name.as_str()) {
                    return Err(CodegenError::generation(format!(
                        "field '{}.{}' maps to an existing index constant '{}'",
                        composite.name, field.name, field.index_name
                    )));
                }
                if BUILDER_METHODS.contains(&field.method_name().as_str()) {
                    return Err(CodegenError::generation(format!(
                        "field '{}.{}' shadows a builder method",
                        composite.name, field.name
                    )));
                }
            }
        }

        for frame in self.ir.frames.iter() {
            require_ident(&frame.const_name)?;
            if !frames.insert(frame.const_name.as_str()) {
                return Err(CodegenError::generation(format!(
                    "frame '{}' maps to an existing constant name",
                    frame.type_name
                )));
            }
        }

        Ok(())
    }
}

fn require_ident(name: &str) -> Result<(), CodegenError> {
    syn::parse_str::<syn::Ident>(name)
        .map(|_| ())
        .map_err(|_| CodegenError::generation(format!("'{name}' is not a valid identifier")))
}
