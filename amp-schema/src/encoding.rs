//! Field encoding rules.
//!
//! Maps a field to its effective wire representation: repeated fields are
//! lists, fields naming a composite are boxes, everything else follows the
//! restriction chain to a primitive.

use crate::error::SchemaError;
use crate::resolver::RestrictionChain;
use crate::types::{FieldDef, Schema};

/// Effective wire representation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// `boolean`.
    Boolean,
    /// `ubyte`.
    Ubyte,
    /// `ushort`.
    Ushort,
    /// `uint`.
    Uint,
    /// `ulong`.
    Ulong,
    /// `timestamp` (stored as `ulong`).
    Timestamp,
    /// `binary`.
    Binary,
    /// `string`.
    String,
    /// `symbol`.
    Symbol,
    /// Ordered list, also used for repeated fields.
    List,
    /// Associative map.
    Map,
    /// Nested composite instance.
    Box,
    /// Any other value.
    Object,
}

impl WireKind {
    /// Maps a terminal wire type name to its kind.
    ///
    /// Primitives without a dedicated representation fall back to
    /// [`WireKind::Object`].
    #[must_use]
    pub fn from_wire_name(name: &str) -> Self {
        match name {
            "boolean" => Self::Boolean,
            "ubyte" => Self::Ubyte,
            "ushort" => Self::Ushort,
            "uint" => Self::Uint,
            "ulong" => Self::Ulong,
            "timestamp" => Self::Timestamp,
            "binary" => Self::Binary,
            "string" => Self::String,
            "symbol" => Self::Symbol,
            "list" => Self::List,
            "map" => Self::Map,
            _ => Self::Object,
        }
    }

    /// Returns the schema-level name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Ubyte => "ubyte",
            Self::Ushort => "ushort",
            Self::Uint => "uint",
            Self::Ulong => "ulong",
            Self::Timestamp => "timestamp",
            Self::Binary => "binary",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::List => "list",
            Self::Map => "map",
            Self::Box => "box",
            Self::Object => "*",
        }
    }

    /// Returns true if the representation is held by reference rather than
    /// as a fixed-width scalar.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        !matches!(
            self,
            Self::Boolean | Self::Ubyte | Self::Ushort | Self::Uint | Self::Ulong | Self::Timestamp
        )
    }

    /// Returns true if a null or empty input stores a null value.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::String | Self::Symbol)
    }

    /// Returns true if the kind has a scalar value constructor; other kinds
    /// are stored as supplied.
    #[must_use]
    pub const fn has_constructor(&self) -> bool {
        matches!(
            self,
            Self::Boolean
                | Self::Ubyte
                | Self::Ushort
                | Self::Uint
                | Self::Ulong
                | Self::Timestamp
                | Self::String
                | Self::Symbol
        )
    }

    /// Width at which the value travels through the keyword/value channel.
    #[must_use]
    pub fn promoted(&self) -> Promotion {
        PROMOTIONS
            .iter()
            .find(|(kind, _)| kind == self)
            .map_or(Promotion::Native, |&(_, p)| p)
    }
}

impl std::fmt::Display for WireKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argument width used when reading a value back from the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    /// Read at the representation width.
    Native,
    /// Read at `int` width and narrowed on store.
    Int,
}

/// Narrow kinds that travel at `int` width.
pub const PROMOTIONS: &[(WireKind, Promotion)] = &[
    (WireKind::Boolean, Promotion::Int),
    (WireKind::Ubyte, Promotion::Int),
    (WireKind::Ushort, Promotion::Int),
];

/// Classification of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldClass {
    /// Effective wire kind.
    pub wire_kind: WireKind,
    /// Whether the declared type is a composite.
    pub is_composite: bool,
    /// Whether the field holds repeated values.
    pub is_multiple: bool,
}

impl FieldClass {
    /// Classifies a field of `owner`.
    ///
    /// # Errors
    /// Returns `SchemaError::CircularReference` if the declared type's chain
    /// loops, or `SchemaError::UnresolvedType` if it ends at a name that is
    /// not a wire type.
    pub fn classify(
        owner: &str,
        field: &FieldDef,
        schema: &Schema,
        chain: &RestrictionChain,
    ) -> Result<Self, SchemaError> {
        let is_composite = schema.is_composite(&field.type_name);
        let terminal = chain.resolve(&field.type_name)?;
        if !crate::resolver::is_wire_type(terminal) {
            return Err(SchemaError::UnresolvedType {
                type_name: terminal.to_string(),
                field: format!("{owner}.{}", field.name),
            });
        }

        let wire_kind = if field.multiple {
            WireKind::List
        } else if is_composite {
            WireKind::Box
        } else {
            WireKind::from_wire_name(terminal)
        };

        Ok(Self {
            wire_kind,
            is_composite,
            is_multiple: field.multiple,
        })
    }
}
