//! Schema validation utilities.
//!
//! Checks the structural rules generation depends on: unique type names
//! across merged documents, unique field keywords within a composite, and a
//! descriptor on every frame type.

use crate::error::SchemaError;
use crate::ir::keyword_name;
use crate::types::{CompositeDef, Schema};
use std::collections::HashSet;

/// Validates a parsed (possibly merged) schema.
///
/// # Arguments
/// * `schema` - The schema to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_schema(schema: &Schema) -> Result<(), SchemaError> {
    validate_type_names(schema)?;
    for composite in schema.composites() {
        validate_composite(composite)?;
    }
    Ok(())
}

/// Validates that no type name is declared twice.
fn validate_type_names(schema: &Schema) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for type_def in &schema.types {
        if !seen.insert(type_def.name()) {
            return Err(SchemaError::duplicate("type", type_def.name()));
        }
    }
    Ok(())
}

/// Validates a composite type definition.
fn validate_composite(composite: &CompositeDef) -> Result<(), SchemaError> {
    if composite.is_frame() && composite.descriptor.is_none() {
        return Err(SchemaError::MissingDescriptor {
            name: composite.name.clone(),
        });
    }

    let mut seen_names = HashSet::new();
    let mut seen_keywords = HashSet::new();

    for field in &composite.fields {
        if !seen_names.insert(field.name.as_str()) {
            return Err(SchemaError::duplicate(
                "field",
                format!("{}.{}", composite.name, field.name),
            ));
        }
        if !seen_keywords.insert(keyword_name(&field.name)) {
            return Err(SchemaError::Validation {
                message: format!(
                    "field '{}' of type '{}' normalizes to an existing keyword",
                    field.name, composite.name
                ),
            });
        }
    }

    Ok(())
}
