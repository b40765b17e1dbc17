//! Schema type definitions.
//!
//! This module contains the data structures representing AMQP type
//! declarations: primitive, restricted and composite types, composite fields
//! and descriptors.

use std::collections::HashMap;

/// Capability tag marking a composite as a top-level protocol frame.
pub const FRAME_CAPABILITY: &str = "frame";

/// Ordered collection of type declarations from one or more documents.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Names of the documents merged into this schema, in traversal order.
    pub documents: Vec<String>,
    /// Type definitions in traversal order.
    pub types: Vec<TypeDef>,
    /// Type lookup map (built during parsing).
    type_map: HashMap<String, usize>,
}

impl Schema {
    /// Creates a new empty schema for the named document.
    #[must_use]
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            documents: vec![document.into()],
            types: Vec::new(),
            type_map: HashMap::new(),
        }
    }

    /// Concatenates schemas in the given order.
    ///
    /// Types of earlier schemas are traversed before types of later ones.
    #[must_use]
    pub fn merge(schemas: impl IntoIterator<Item = Schema>) -> Self {
        let mut merged = Self::default();
        for schema in schemas {
            merged.documents.extend(schema.documents);
            for type_def in schema.types {
                merged.add_type(type_def);
            }
        }
        merged
    }

    /// Adds a type definition to the schema.
    ///
    /// A later definition with the same name shadows the earlier one in
    /// lookups; validation reports it as a duplicate.
    pub fn add_type(&mut self, type_def: TypeDef) {
        let name = type_def.name().to_string();
        let index = self.types.len();
        self.types.push(type_def);
        self.type_map.insert(name, index);
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.type_map.get(name).map(|&idx| &self.types[idx])
    }

    /// Returns true if a type with the given name exists.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// Returns true if `name` is a declared composite type.
    #[must_use]
    pub fn is_composite(&self, name: &str) -> bool {
        self.get_type(name).is_some_and(TypeDef::is_composite)
    }

    /// Iterates over composite types in traversal order.
    pub fn composites(&self) -> impl Iterator<Item = &CompositeDef> {
        self.types.iter().filter_map(|t| match t {
            TypeDef::Composite(c) => Some(c),
            _ => None,
        })
    }
}

/// Type definition variants.
#[derive(Debug, Clone)]
pub enum TypeDef {
    /// Primitive wire type declaration.
    Primitive(PrimitiveDef),
    /// Restriction of another named type.
    Restricted(RestrictedDef),
    /// Composite type with fields.
    Composite(CompositeDef),
}

impl TypeDef {
    /// Returns the name of the type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(p) => &p.name,
            Self::Restricted(r) => &r.name,
            Self::Composite(c) => &c.name,
        }
    }

    /// Returns the name of the type this one restricts, if any.
    ///
    /// Composites report their encoding (`list` or `map`).
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Primitive(_) => None,
            Self::Restricted(r) => r.source.as_deref(),
            Self::Composite(c) => Some(c.encoding.as_str()),
        }
    }

    /// Returns true if this is a composite type.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }
}

/// Primitive type declaration.
#[derive(Debug, Clone)]
pub struct PrimitiveDef {
    /// Type name.
    pub name: String,
}

/// Restricted type declaration.
#[derive(Debug, Clone)]
pub struct RestrictedDef {
    /// Type name.
    pub name: String,
    /// Restricted type name (absent for open unions such as `*`-typed
    /// archetypes).
    pub source: Option<String>,
}

/// Container representation of a composite type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Fields occupy positional slots of an ordered list.
    List,
    /// Fields are stored under symbol keys of a map.
    Map,
}

impl Encoding {
    /// Parses an encoding from a `source` attribute.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "list" => Some(Self::List),
            "map" => Some(Self::Map),
            _ => None,
        }
    }

    /// Returns the schema spelling of the encoding.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

/// Composite descriptor: symbolic name and 64-bit numeric code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Descriptor symbol (e.g. `amqp:open:list`).
    pub name: String,
    /// Numeric code assembled as `(high << 32) + low`.
    pub code: u64,
}

impl Descriptor {
    /// Creates a descriptor from its two 32-bit halves.
    #[must_use]
    pub fn new(name: impl Into<String>, high: u32, low: u32) -> Self {
        Self {
            name: name.into(),
            code: (u64::from(high) << 32) + u64::from(low),
        }
    }

    /// Returns the upper 32 bits of the code (the domain id).
    #[must_use]
    pub const fn high(&self) -> u32 {
        (self.code >> 32) as u32
    }

    /// Returns the lower 32 bits of the code.
    #[must_use]
    pub const fn low(&self) -> u32 {
        self.code as u32
    }
}

/// Composite type definition.
#[derive(Debug, Clone)]
pub struct CompositeDef {
    /// Type name.
    pub name: String,
    /// Container representation.
    pub encoding: Encoding,
    /// Descriptor, if declared.
    pub descriptor: Option<Descriptor>,
    /// Capability tags (e.g. `frame`).
    pub provides: Vec<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

impl CompositeDef {
    /// Creates a new composite type definition.
    #[must_use]
    pub fn new(name: String, encoding: Encoding) -> Self {
        Self {
            name,
            encoding,
            descriptor: None,
            provides: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Adds a field to the composite.
    pub fn add_field(&mut self, field: FieldDef) {
        self.fields.push(field);
    }

    /// Returns true if the composite provides the `frame` capability.
    #[must_use]
    pub fn is_frame(&self) -> bool {
        self.provides.iter().any(|p| p == FRAME_CAPABILITY)
    }
}

/// Field within a composite type.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Declared type name (primitive, restricted or composite).
    pub type_name: String,
    /// Whether the field holds repeated values.
    pub multiple: bool,
}

impl FieldDef {
    /// Creates a new single-valued field.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            multiple: false,
        }
    }

    /// Marks the field as repeated.
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.multiple = true;
        self
    }
}
