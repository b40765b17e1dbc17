//! Restriction chain resolution.
//!
//! Every type that names a `source` restricts that source. Following the
//! chain from a declared field type ends at a wire type: an AMQP primitive,
//! `list`/`map` for composites, or the `*` wildcard.

use crate::error::SchemaError;
use crate::types::Schema;
use std::collections::{HashMap, HashSet};

/// Wildcard type name accepting any value.
pub const WILDCARD: &str = "*";

/// AMQP primitive type names that terminate a restriction chain.
pub const WIRE_PRIMITIVES: &[&str] = &[
    "null",
    "boolean",
    "ubyte",
    "ushort",
    "uint",
    "ulong",
    "byte",
    "short",
    "int",
    "long",
    "float",
    "double",
    "decimal32",
    "decimal64",
    "decimal128",
    "char",
    "timestamp",
    "uuid",
    "binary",
    "string",
    "symbol",
    "list",
    "map",
    "array",
];

/// Returns true if `name` is a wire type or the wildcard.
#[must_use]
pub fn is_wire_type(name: &str) -> bool {
    name == WILDCARD || WIRE_PRIMITIVES.contains(&name)
}

/// Map from each restricting type to its source.
#[derive(Debug, Clone, Default)]
pub struct RestrictionChain {
    sources: HashMap<String, String>,
}

impl RestrictionChain {
    /// Collects `name -> source` for every type that declares a source.
    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        let sources = schema
            .types
            .iter()
            .filter_map(|t| t.source().map(|s| (t.name().to_string(), s.to_string())))
            .collect();
        Self { sources }
    }

    /// Returns the direct source of `name`, if it restricts anything.
    #[must_use]
    pub fn source_of(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    /// Number of restricting types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no type declares a source.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Follows the chain from `name` to its terminal type name.
    ///
    /// A name with no entry is its own terminal. Resolving a terminal name
    /// returns it unchanged.
    ///
    /// # Errors
    /// Returns `SchemaError::CircularReference` if the chain revisits a name.
    pub fn resolve<'a>(&'a self, name: &'a str) -> Result<&'a str, SchemaError> {
        let mut current = name;
        let mut visited = HashSet::new();
        let mut path = vec![name];
        visited.insert(name);

        while let Some(next) = self.source_of(current) {
            path.push(next);
            if !visited.insert(next) {
                return Err(SchemaError::CircularReference {
                    path: path.join(" -> "),
                });
            }
            current = next;
        }

        Ok(current)
    }

    /// Resolves every restricting type, referenced or not.
    ///
    /// # Errors
    /// Returns `SchemaError::CircularReference` for the first cycle found,
    /// walking type names in sorted order.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut names: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        names.sort_unstable();
        for name in names {
            self.resolve(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompositeDef, Encoding, RestrictedDef, TypeDef};

    fn restricted(name: &str, source: &str) -> TypeDef {
        TypeDef::Restricted(RestrictedDef {
            name: name.to_string(),
            source: Some(source.to_string()),
        })
    }

    fn schema(types: Vec<TypeDef>) -> Schema {
        let mut schema = Schema::new("test");
        for t in types {
            schema.add_type(t);
        }
        schema
    }

    #[test]
    fn test_resolve_multi_step_chain() {
        let s = schema(vec![
            restricted("delivery-number", "sequence-no"),
            restricted("sequence-no", "uint"),
        ]);
        let chain = RestrictionChain::from_schema(&s);
        assert_eq!(chain.resolve("delivery-number").unwrap(), "uint");
        assert_eq!(chain.resolve("sequence-no").unwrap(), "uint");
    }

    #[test]
    fn test_resolve_terminal_is_identity() {
        let chain = RestrictionChain::default();
        assert_eq!(chain.resolve("uint").unwrap(), "uint");
        assert_eq!(chain.resolve("*").unwrap(), "*");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let s = schema(vec![restricted("handle", "uint")]);
        let chain = RestrictionChain::from_schema(&s);
        let once = chain.resolve("handle").unwrap();
        assert_eq!(chain.resolve(once).unwrap(), once);
    }

    #[test]
    fn test_composite_resolves_to_encoding() {
        let s = schema(vec![TypeDef::Composite(CompositeDef::new(
            "source".to_string(),
            Encoding::Map,
        ))]);
        let chain = RestrictionChain::from_schema(&s);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.resolve("source").unwrap(), "map");
    }

    #[test]
    fn test_cycle_is_reported() {
        let s = schema(vec![restricted("a", "b"), restricted("b", "a")]);
        let chain = RestrictionChain::from_schema(&s);
        match chain.resolve("a") {
            Err(SchemaError::CircularReference { path }) => assert_eq!(path, "a -> b -> a"),
            other => panic!("expected circular reference, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_finds_cycle_nothing_references() {
        let s = schema(vec![
            restricted("handle", "uint"),
            restricted("b", "a"),
            restricted("a", "b"),
        ]);
        let chain = RestrictionChain::from_schema(&s);
        assert_eq!(chain.resolve("handle").unwrap(), "uint");
        match chain.validate() {
            Err(SchemaError::CircularReference { path }) => assert_eq!(path, "a -> b -> a"),
            other => panic!("expected circular reference, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_acyclic_chain() {
        let s = schema(vec![
            restricted("delivery-number", "sequence-no"),
            restricted("sequence-no", "uint"),
        ]);
        assert!(RestrictionChain::from_schema(&s).validate().is_ok());
    }

    #[test]
    fn test_is_wire_type() {
        assert!(is_wire_type("symbol"));
        assert!(is_wire_type("*"));
        assert!(!is_wire_type("handle"));
    }
}
