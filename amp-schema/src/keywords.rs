//! Keyword and frame code tables.
//!
//! Both generated artifacts read their numbering from these tables, so the
//! tables are built once, in traversal order, and never mutated afterwards.

use crate::encoding::FieldClass;
use crate::error::SchemaError;
use crate::ir::ResolvedComposite;
use std::collections::HashMap;

/// First use of a keyword, kept to detect incompatible reuse.
#[derive(Debug, Clone)]
struct KeywordOrigin {
    path: String,
    class: FieldClass,
}

/// Two fields sharing a keyword code with different representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCollision {
    /// Shared keyword constant name.
    pub keyword: String,
    /// `type.field` that first claimed the keyword.
    pub first: String,
    /// Representation of the first field.
    pub first_class: FieldClass,
    /// `type.field` reusing the keyword.
    pub second: String,
    /// Representation of the reusing field.
    pub second_class: FieldClass,
}

/// Global, append-only table of field keyword codes.
///
/// Codes are assigned in first-seen order across all composites in
/// traversal order. The terminator code equals the table size.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    keywords: Vec<String>,
    codes: HashMap<String, u32>,
    origins: HashMap<String, KeywordOrigin>,
    collisions: Vec<KeywordCollision>,
}

impl KeywordTable {
    /// Builds the table from resolved composites in traversal order.
    ///
    /// # Errors
    /// Returns `SchemaError::Validation` if the keywords and the terminator
    /// do not fit in `u32` codes.
    pub fn build(composites: &[ResolvedComposite]) -> Result<Self, SchemaError> {
        let mut table = Self::default();
        for composite in composites {
            for field in &composite.fields {
                table.intern(&field.keyword, &composite.name, &field.name, field.class)?;
            }
        }
        // The terminator takes the next code, so it must fit as well.
        code_for(table.keywords.len())?;
        Ok(table)
    }

    /// Returns the code of `keyword`, assigning the next code on first use.
    fn intern(
        &mut self,
        keyword: &str,
        owner: &str,
        field: &str,
        class: FieldClass,
    ) -> Result<u32, SchemaError> {
        let path = format!("{owner}.{field}");

        if let Some(&code) = self.codes.get(keyword) {
            let origin = self
                .origins
                .get(keyword)
                .filter(|o| {
                    o.class.wire_kind != class.wire_kind || o.class.is_multiple != class.is_multiple
                })
                .cloned();
            if let Some(origin) = origin {
                tracing::warn!(
                    keyword,
                    first = %origin.path,
                    first_kind = %origin.class.wire_kind,
                    second = %path,
                    second_kind = %class.wire_kind,
                    "keyword shared by fields with different representations"
                );
                self.collisions.push(KeywordCollision {
                    keyword: keyword.to_string(),
                    first: origin.path,
                    first_class: origin.class,
                    second: path,
                    second_class: class,
                });
            }
            return Ok(code);
        }

        let code = code_for(self.keywords.len())?;
        self.keywords.push(keyword.to_string());
        self.codes.insert(keyword.to_string(), code);
        self.origins
            .insert(keyword.to_string(), KeywordOrigin { path, class });
        Ok(code)
    }

    /// Looks up the code of a keyword.
    #[must_use]
    pub fn code(&self, keyword: &str) -> Option<u32> {
        self.codes.get(keyword).copied()
    }

    /// Terminator code (one past the last keyword).
    #[must_use]
    pub fn terminator(&self) -> u32 {
        // build() checked that the table size fits.
        u32::try_from(self.keywords.len()).expect("keyword count checked at build")
    }

    /// Iterates `(keyword, code)` in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.keywords
            .iter()
            .map(|keyword| (keyword.as_str(), self.codes[keyword]))
    }

    /// Number of distinct keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Returns true if no keyword was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keyword reuses whose representations disagree.
    #[must_use]
    pub fn collisions(&self) -> &[KeywordCollision] {
        &self.collisions
    }
}

/// Converts a table position into a keyword code.
fn code_for(position: usize) -> Result<u32, SchemaError> {
    u32::try_from(position).map_err(|_| SchemaError::Validation {
        message: format!("keyword code {position} does not fit in u32"),
    })
}

/// Constants for one frame-capable composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameEntry {
    /// Composite type name.
    pub type_name: String,
    /// Upper-cased constant stem (e.g. `OPEN`).
    pub const_name: String,
    /// Descriptor symbol.
    pub symbol: String,
    /// 64-bit descriptor code.
    pub code: u64,
    /// Zero-based frame index in traversal order.
    pub index: usize,
}

/// Ordered frame constants.
#[derive(Debug, Clone, Default)]
pub struct FrameCodeTable {
    entries: Vec<FrameEntry>,
}

impl FrameCodeTable {
    /// Builds the table from resolved composites in traversal order.
    ///
    /// # Errors
    /// Returns `SchemaError::MissingDescriptor` if a frame type has no
    /// descriptor.
    pub fn build(composites: &[ResolvedComposite]) -> Result<Self, SchemaError> {
        let mut entries = Vec::new();
        for composite in composites.iter().filter(|c| c.is_frame) {
            let descriptor =
                composite
                    .descriptor
                    .as_ref()
                    .ok_or_else(|| SchemaError::MissingDescriptor {
                        name: composite.name.clone(),
                    })?;
            entries.push(FrameEntry {
                type_name: composite.name.clone(),
                const_name: composite.const_name(),
                symbol: descriptor.name.clone(),
                code: descriptor.code,
                index: entries.len(),
            });
        }
        Ok(Self { entries })
    }

    /// Looks up the frame entry of a type.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&FrameEntry> {
        self.entries.iter().find(|e| e.type_name == type_name)
    }

    /// Iterates entries in frame index order.
    pub fn iter(&self) -> impl Iterator<Item = &FrameEntry> {
        self.entries.iter()
    }

    /// Number of frame types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no frame types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
