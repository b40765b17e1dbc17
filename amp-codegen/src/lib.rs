//! # AMP Codegen
//!
//! Code generation from AMQP type XML documents.
//!
//! This crate provides:
//! - The declarations artifact: field index constants, global keyword codes
//!   with their terminator, frame symbols/codes/indices, and forwarding
//!   constructors
//! - The implementation artifact: a builder and a keyword/value constructor
//!   per composite type
//! - Build script integration through [`generate_from_files`]
//!
//! ```no_run
//! use std::path::Path;
//!
//! let generated = amp_codegen::generate_from_files(&[
//!     Path::new("schema/transport.xml"),
//!     Path::new("schema/messaging.xml"),
//! ])?;
//! generated.write_to(Path::new("out"))?;
//! # Ok::<(), amp_codegen::CodegenError>(())
//! ```

pub mod error;
pub mod generator;
pub mod options;
pub mod rust;

pub use error::CodegenError;
pub use generator::{GeneratedProtocol, Generator};
pub use options::CodegenOptions;

use amp_schema::{ProtocolIr, Schema};
use std::path::Path;

/// Generates both artifacts from a parsed (and possibly merged) schema.
///
/// # Errors
/// Returns `CodegenError` if resolution or generation fails.
pub fn generate(schema: &Schema) -> Result<GeneratedProtocol, CodegenError> {
    generate_with_options(schema, CodegenOptions::default())
}

/// Generates both artifacts with explicit options.
///
/// # Errors
/// Returns `CodegenError` if resolution or generation fails.
pub fn generate_with_options(
    schema: &Schema,
    options: CodegenOptions,
) -> Result<GeneratedProtocol, CodegenError> {
    let ir = ProtocolIr::from_schema(schema)?;
    Generator::with_options(&ir, options).generate()
}

/// Generates both artifacts from XML documents, merged in the given order.
///
/// # Arguments
/// * `documents` - AMQP type XML contents (e.g. transport, then messaging)
///
/// # Errors
/// Returns `CodegenError` if parsing, resolution or generation fails.
pub fn generate_from_xml(documents: &[&str]) -> Result<GeneratedProtocol, CodegenError> {
    let schemas = documents
        .iter()
        .map(|xml| amp_schema::parse_schema(xml))
        .collect::<Result<Vec<_>, _>>()?;
    generate(&Schema::merge(schemas))
}

/// Generates both artifacts from XML files, merged in the given order.
///
/// # Arguments
/// * `paths` - Paths of the AMQP type XML files
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, resolution or generation
/// fails.
pub fn generate_from_files(paths: &[&Path]) -> Result<GeneratedProtocol, CodegenError> {
    let contents = paths
        .iter()
        .map(std::fs::read_to_string)
        .collect::<Result<Vec<_>, _>>()?;
    let documents: Vec<&str> = contents.iter().map(String::as_str).collect();
    generate_from_xml(&documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRANSPORT: &str = r#"<amqp name="transport"><section name="s">
    <type name="open" class="composite" source="list" provides="frame">
      <descriptor name="amqp:open:list" code="0x00000000:0x00000010"/>
      <field name="container-id" type="string"/>
    </type>
</section></amqp>"#;

    const MESSAGING: &str = r#"<amqp name="messaging"><section name="s">
    <type name="header" class="composite" source="list">
      <descriptor name="amqp:header:list" code="0x00000000:0x00000070"/>
      <field name="durable" type="boolean"/>
    </type>
    <type name="target" class="composite" source="map" provides="frame">
      <descriptor name="amqp:target:map" code="0x00000000:0x00000029"/>
      <field name="durable" type="terminus-durability"/>
    </type>
    <type name="terminus-durability" class="restricted" source="uint"/>
</section></amqp>"#;

    #[test]
    fn test_generate_from_xml_merges_in_order() {
        let generated = generate_from_xml(&[TRANSPORT, MESSAGING]).unwrap();
        assert!(
            generated
                .declarations
                .starts_with("// @generated by amp-codegen from: transport, messaging")
        );
        assert!(generated.declarations.contains("pub const CONTAINER_ID: u32 = 0;"));
        assert!(generated.declarations.contains("pub const DURABLE: u32 = 1;"));
        assert!(generated.declarations.contains("pub const KW_END: u32 = 2;"));
        assert!(generated.declarations.contains("pub const TARGET: usize = 1;"));
    }

    #[test]
    fn test_collision_does_not_stop_generation() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let schemas = vec![
            amp_schema::parse_schema(TRANSPORT).unwrap(),
            amp_schema::parse_schema(MESSAGING).unwrap(),
        ];
        let ir = ProtocolIr::from_schema(&Schema::merge(schemas)).unwrap();
        assert_eq!(ir.keywords.collisions().len(), 1);
        assert!(Generator::new(&ir).generate().is_ok());
    }

    #[test]
    fn test_generate_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let transport = dir.path().join("transport.xml");
        let messaging = dir.path().join("messaging.xml");
        std::fs::File::create(&transport)
            .unwrap()
            .write_all(TRANSPORT.as_bytes())
            .unwrap();
        std::fs::write(&messaging, MESSAGING).unwrap();

        let from_files = generate_from_files(&[transport.as_path(), messaging.as_path()]).unwrap();
        let from_xml = generate_from_xml(&[TRANSPORT, MESSAGING]).unwrap();
        assert_eq!(from_files, from_xml);
    }

    #[test]
    fn test_missing_file() {
        let result = generate_from_files(&[Path::new("/nonexistent/transport.xml")]);
        assert!(matches!(result, Err(CodegenError::Io(_))));
    }

    #[test]
    fn test_schema_error_propagates() {
        let xml = r#"<amqp name="t"><section name="s">
    <type name="a" class="restricted" source="b"/>
    <type name="b" class="restricted" source="a"/>
    <type name="t" class="composite" source="list"><field name="x" type="a"/></type>
</section></amqp>"#;
        assert!(matches!(
            generate_from_xml(&[xml]),
            Err(CodegenError::Schema(amp_schema::SchemaError::CircularReference { .. }))
        ));
    }
}
