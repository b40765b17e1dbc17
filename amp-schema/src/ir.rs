//! Intermediate representation for code generation.
//!
//! This module provides a flattened, resolved representation of the schema:
//! every composite with classified fields, plus the keyword and frame code
//! tables both emitters number their output from.

use crate::encoding::FieldClass;
use crate::error::SchemaError;
use crate::keywords::{FrameCodeTable, KeywordTable};
use crate::resolver::RestrictionChain;
use crate::types::{CompositeDef, Descriptor, Encoding, Schema};
use crate::validation::validate_schema;

/// Intermediate representation of a protocol for code generation.
#[derive(Debug, Clone)]
pub struct ProtocolIr {
    /// Source documents in traversal order.
    pub documents: Vec<String>,
    /// Composites in traversal order.
    pub composites: Vec<ResolvedComposite>,
    /// Global keyword table.
    pub keywords: KeywordTable,
    /// Frame constants.
    pub frames: FrameCodeTable,
}

impl ProtocolIr {
    /// Validates the schema and resolves every composite field.
    ///
    /// # Errors
    /// Returns `SchemaError` if validation fails, any restriction chain is
    /// circular, or a field type does not resolve to a wire type.
    pub fn from_schema(schema: &Schema) -> Result<Self, SchemaError> {
        validate_schema(schema)?;
        let chain = RestrictionChain::from_schema(schema);
        chain.validate()?;

        let composites = schema
            .composites()
            .map(|c| ResolvedComposite::resolve(c, schema, &chain))
            .collect::<Result<Vec<_>, _>>()?;

        let keywords = KeywordTable::build(&composites)?;
        let frames = FrameCodeTable::build(&composites)?;

        tracing::debug!(
            composites = composites.len(),
            keywords = keywords.len(),
            frames = frames.len(),
            collisions = keywords.collisions().len(),
            "resolved protocol"
        );

        Ok(Self {
            documents: schema.documents.clone(),
            composites,
            keywords,
            frames,
        })
    }

    /// Gets a resolved composite by name.
    #[must_use]
    pub fn get_composite(&self, name: &str) -> Option<&ResolvedComposite> {
        self.composites.iter().find(|c| c.name == name)
    }

    /// Keyword code of a field, as numbered by the global table.
    #[must_use]
    pub fn keyword_code(&self, field: &ResolvedField) -> Option<u32> {
        self.keywords.code(&field.keyword)
    }
}

/// Composite with classified fields.
#[derive(Debug, Clone)]
pub struct ResolvedComposite {
    /// Type name.
    pub name: String,
    /// Container representation.
    pub encoding: Encoding,
    /// Descriptor, if declared.
    pub descriptor: Option<Descriptor>,
    /// Whether the type provides the `frame` capability.
    pub is_frame: bool,
    /// Fields in declaration order.
    pub fields: Vec<ResolvedField>,
}

impl ResolvedComposite {
    /// Classifies every field of a composite.
    ///
    /// # Errors
    /// Returns `SchemaError` if a field type does not resolve.
    pub fn resolve(
        composite: &CompositeDef,
        schema: &Schema,
        chain: &RestrictionChain,
    ) -> Result<Self, SchemaError> {
        let fields = composite
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let class = FieldClass::classify(&composite.name, field, schema, chain)?;
                Ok(ResolvedField::new(
                    &composite.name,
                    &field.name,
                    &field.type_name,
                    index,
                    class,
                ))
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        tracing::debug!(
            name = %composite.name,
            encoding = composite.encoding.as_str(),
            fields = fields.len(),
            frame = composite.is_frame(),
            "resolved composite"
        );

        Ok(Self {
            name: composite.name.clone(),
            encoding: composite.encoding,
            descriptor: composite.descriptor.clone(),
            is_frame: composite.is_frame(),
            fields,
        })
    }

    /// Symbol the built instance is tagged with: the descriptor name, or the
    /// type name when no descriptor is declared.
    #[must_use]
    pub fn tag_symbol(&self) -> &str {
        self.descriptor
            .as_ref()
            .map_or(self.name.as_str(), |d| d.name.as_str())
    }

    /// Upper-cased constant stem (e.g. `OPEN`, `DELETE_ON_CLOSE`).
    #[must_use]
    pub fn const_name(&self) -> String {
        keyword_name(&self.name)
    }

    /// Snake-cased name used for constructor functions.
    #[must_use]
    pub fn fn_name(&self) -> String {
        to_snake_case(&self.name)
    }

    /// Builder struct name (e.g. `OpenBuilder`).
    #[must_use]
    pub fn builder_name(&self) -> String {
        format!("{}Builder", to_pascal_case(&self.name))
    }
}

/// Field with its classification and naming.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// Field name as declared.
    pub name: String,
    /// Declared type name.
    pub type_name: String,
    /// Zero-based position within the owning composite.
    pub index: usize,
    /// Keyword constant name shared across types (e.g. `CONTAINER_ID`).
    pub keyword: String,
    /// Index constant name (e.g. `OPEN_CONTAINER_ID`).
    pub index_name: String,
    /// Wire classification.
    pub class: FieldClass,
}

impl ResolvedField {
    /// Creates a resolved field of `owner`.
    #[must_use]
    pub fn new(owner: &str, name: &str, type_name: &str, index: usize, class: FieldClass) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            index,
            keyword: keyword_name(name),
            index_name: format!("{}_{}", keyword_name(owner), keyword_name(name)),
            class,
        }
    }

    /// Snake-cased setter name.
    #[must_use]
    pub fn method_name(&self) -> String {
        to_snake_case(&self.name)
    }
}

/// Normalizes a schema name into a constant name.
#[must_use]
pub fn keyword_name(s: &str) -> String {
    s.chars()
        .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}

/// Converts a hyphenated or camelCase name to snake_case.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c == '-' {
            result.push('_');
        } else {
            if c.is_uppercase() && i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        }
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::WireKind;
    use crate::parser::parse_schema;

    const XML: &str = r#"<amqp name="transport">
  <section name="performatives">
    <type name="open" class="composite" source="list" provides="frame">
      <descriptor name="amqp:open:list" code="0x00000000:0x00000010"/>
      <field name="container-id" type="string"/>
      <field name="max-frame-size" type="uint"/>
      <field name="channel-max" type="ushort"/>
      <field name="idle-time-out" type="milliseconds"/>
    </type>
    <type name="close" class="composite" source="list" provides="frame">
      <descriptor name="amqp:close:list" code="0x00000000:0x00000018"/>
      <field name="error" type="error"/>
    </type>
  </section>
  <section name="definitions">
    <type name="error" class="composite" source="list">
      <descriptor name="amqp:error:list" code="0x00000000:0x0000001d"/>
      <field name="condition" type="symbol"/>
      <field name="description" type="string"/>
    </type>
    <type name="milliseconds" class="restricted" source="uint"/>
  </section>
</amqp>"#;

    fn ir() -> ProtocolIr {
        let schema = parse_schema(XML).expect("Failed to parse schema");
        ProtocolIr::from_schema(&schema).expect("Failed to resolve schema")
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("container-id"), "container_id");
        assert_eq!(to_snake_case("clOrdId"), "cl_ord_id");
        assert_eq!(to_snake_case("open"), "open");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("delete-on-close"), "DeleteOnClose");
        assert_eq!(to_pascal_case("open"), "Open");
    }

    #[test]
    fn test_keyword_name() {
        assert_eq!(keyword_name("max-frame-size"), "MAX_FRAME_SIZE");
        assert_eq!(keyword_name("open"), "OPEN");
    }

    #[test]
    fn test_field_indices_and_names() {
        let ir = ir();
        let open = ir.get_composite("open").unwrap();

        let indices: Vec<_> = open.fields.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(open.fields[0].index_name, "OPEN_CONTAINER_ID");
        assert_eq!(open.fields[2].keyword, "CHANNEL_MAX");
        assert_eq!(open.fields[2].method_name(), "channel_max");
        assert_eq!(open.builder_name(), "OpenBuilder");
        assert_eq!(open.fields[3].class.wire_kind, WireKind::Uint);
    }

    #[test]
    fn test_nested_composite_field_is_box() {
        let ir = ir();
        let close = ir.get_composite("close").unwrap();
        assert_eq!(close.fields[0].class.wire_kind, WireKind::Box);
        assert!(close.fields[0].class.is_composite);
    }

    #[test]
    fn test_tables() {
        let ir = ir();
        assert_eq!(ir.keywords.len(), 7);
        assert_eq!(ir.keywords.terminator(), 7);
        assert_eq!(ir.keywords.code("ERROR"), Some(4));

        let frames: Vec<_> = ir.frames.iter().map(|f| (f.const_name.as_str(), f.code)).collect();
        assert_eq!(frames, vec![("OPEN", 0x10), ("CLOSE", 0x18)]);

        let open = ir.get_composite("open").unwrap();
        assert_eq!(ir.keyword_code(&open.fields[1]), Some(1));
    }

    #[test]
    fn test_tag_symbol_falls_back_to_name() {
        let ir = ir();
        assert_eq!(ir.get_composite("error").unwrap().tag_symbol(), "amqp:error:list");

        let composite = ResolvedComposite {
            name: "accepted".to_string(),
            encoding: Encoding::List,
            descriptor: None,
            is_frame: false,
            fields: Vec::new(),
        };
        assert_eq!(composite.tag_symbol(), "accepted");
    }

    #[test]
    fn test_unresolved_field_type() {
        let xml = r#"<amqp name="t"><section name="s">
    <type name="t" class="composite" source="list"><field name="x" type="nowhere"/></type>
</section></amqp>"#;
        let schema = parse_schema(xml).unwrap();
        assert!(matches!(
            ProtocolIr::from_schema(&schema),
            Err(SchemaError::UnresolvedType { .. })
        ));
    }

    #[test]
    fn test_circular_restriction() {
        let xml = r#"<amqp name="t"><section name="s">
    <type name="a" class="restricted" source="b"/>
    <type name="b" class="restricted" source="a"/>
    <type name="t" class="composite" source="list"><field name="x" type="a"/></type>
</section></amqp>"#;
        let schema = parse_schema(xml).unwrap();
        assert!(matches!(
            ProtocolIr::from_schema(&schema),
            Err(SchemaError::CircularReference { .. })
        ));
    }

    #[test]
    fn test_unreferenced_circular_restriction() {
        let xml = r#"<amqp name="t"><section name="s">
    <type name="a" class="restricted" source="b"/>
    <type name="b" class="restricted" source="a"/>
    <type name="t" class="composite" source="list"><field name="x" type="uint"/></type>
</section></amqp>"#;
        let schema = parse_schema(xml).unwrap();
        match ProtocolIr::from_schema(&schema) {
            Err(SchemaError::CircularReference { path }) => assert_eq!(path, "a -> b -> a"),
            other => panic!("expected circular reference, got {other:?}"),
        }
    }
}
