//! # AMP Schema
//!
//! AMQP type schema parsing and resolution.
//!
//! This crate provides:
//! - XML parsing of AMQP type documents (transport, messaging, ...)
//! - Type definitions for schema elements
//! - Restriction-chain resolution down to primitive wire types
//! - Field encoding rules (representation, construction, nullability)
//! - The global keyword table and frame code table shared by both
//!   generated artifacts
//! - Schema validation

pub mod encoding;
pub mod error;
pub mod ir;
pub mod keywords;
pub mod parser;
pub mod resolver;
pub mod types;
pub mod validation;

pub use encoding::{FieldClass, PROMOTIONS, Promotion, WireKind};
pub use error::{ParseError, SchemaError};
pub use ir::{
    ProtocolIr, ResolvedComposite, ResolvedField, keyword_name, to_pascal_case, to_snake_case,
};
pub use keywords::{FrameCodeTable, FrameEntry, KeywordCollision, KeywordTable};
pub use parser::parse_schema;
pub use resolver::{RestrictionChain, WILDCARD, WIRE_PRIMITIVES, is_wire_type};
pub use types::{
    CompositeDef, Descriptor, Encoding, FRAME_CAPABILITY, FieldDef, PrimitiveDef, RestrictedDef,
    Schema, TypeDef,
};
pub use validation::validate_schema;
