//! AMQP type XML parser.
//!
//! This module parses AMQP type documents (`<amqp>` root, `<section>`
//! children, `<type>` declarations) into the internal schema representation.
//! Documentation elements (`doc`, `choice`, `error`, ...) are skipped.

use crate::error::ParseError;
use crate::types::{
    CompositeDef, Descriptor, Encoding, FieldDef, PrimitiveDef, RestrictedDef, Schema, TypeDef,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parses an AMQP type document from a string.
///
/// # Arguments
/// * `xml` - XML document content
///
/// # Returns
/// Parsed schema or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or a type declaration is
/// missing required attributes.
pub fn parse_schema(xml: &str) -> Result<Schema, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut schema: Option<Schema> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "amqp" => {
                        schema = Some(parse_root(e)?);
                    }
                    "type" => {
                        let schema = schema.as_mut().ok_or_else(orphan_type)?;
                        schema.add_type(parse_type(&mut reader, e, false)?);
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "amqp" => {
                        schema = Some(parse_root(e)?);
                    }
                    "type" => {
                        let schema = schema.as_mut().ok_or_else(orphan_type)?;
                        schema.add_type(parse_type(&mut reader, e, true)?);
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let schema = schema.ok_or_else(|| ParseError::InvalidStructure {
        message: "No amqp element found".to_string(),
    })?;
    tracing::debug!(
        document = ?schema.documents,
        types = schema.types.len(),
        "parsed type document"
    );
    Ok(schema)
}

fn orphan_type() -> ParseError {
    ParseError::InvalidStructure {
        message: "type element outside of amqp element".to_string(),
    }
}

/// Parses the `amqp` root element attributes.
fn parse_root(e: &BytesStart<'_>) -> Result<Schema, ParseError> {
    let mut name = String::new();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        if key == "name" {
            name = value.to_string();
        }
    }

    Ok(Schema::new(name))
}

/// Parses a type declaration.
///
/// `empty` is true for a self-closing `<type/>` element, which has no
/// children to consume.
fn parse_type(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<TypeDef, ParseError> {
    let mut name: Option<String> = None;
    let mut class: Option<String> = None;
    let mut source: Option<String> = None;
    let mut provides = Vec::new();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "name" => name = Some(value.to_string()),
            "class" => class = Some(value.to_string()),
            "source" => source = Some(value.to_string()),
            "provides" => {
                provides = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("type", "name"))?;
    let class = class.ok_or_else(|| ParseError::missing_attr("type", "class"))?;

    match class.as_str() {
        "composite" => {
            let source = source.ok_or_else(|| ParseError::missing_attr("type", "source"))?;
            let encoding = Encoding::parse(&source)
                .ok_or_else(|| ParseError::invalid_attr("type", "source", source.as_str()))?;
            let mut composite = CompositeDef::new(name, encoding);
            composite.provides = provides;
            if !empty {
                parse_composite_body(reader, &mut composite)?;
            }
            Ok(TypeDef::Composite(composite))
        }
        "restricted" | "union" => {
            if !empty {
                skip_to_end(reader)?;
            }
            Ok(TypeDef::Restricted(RestrictedDef { name, source }))
        }
        "primitive" => {
            if !empty {
                skip_to_end(reader)?;
            }
            Ok(TypeDef::Primitive(PrimitiveDef { name }))
        }
        _ => Err(ParseError::invalid_attr("type", "class", class.as_str())),
    }
}

/// Parses the descriptor and field children of a composite.
fn parse_composite_body(
    reader: &mut Reader<&[u8]>,
    composite: &mut CompositeDef,
) -> Result<(), ParseError> {
    let mut buf = Vec::new();

    loop {
        let (e, empty) = match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => (e.into_owned(), false),
            Ok(Event::Empty(e)) => (e.into_owned(), true),
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {
                buf.clear();
                continue;
            }
        };

        let name_bytes = e.name().as_ref().to_vec();
        let tag_name = std::str::from_utf8(&name_bytes)?;
        match tag_name {
            "descriptor" => composite.descriptor = Some(parse_descriptor(&e)?),
            "field" => composite.add_field(parse_field(&e)?),
            _ => {}
        }
        if !empty {
            skip_to_end(reader)?;
        }
        buf.clear();
    }

    Ok(())
}

/// Parses a descriptor element.
fn parse_descriptor(e: &BytesStart<'_>) -> Result<Descriptor, ParseError> {
    let mut name: Option<String> = None;
    let mut code: Option<String> = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "name" => name = Some(value.to_string()),
            "code" => code = Some(value.to_string()),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("descriptor", "name"))?;
    let code = code.ok_or_else(|| ParseError::missing_attr("descriptor", "code"))?;
    let (high, low) = parse_descriptor_code(&code)
        .ok_or_else(|| ParseError::invalid_attr("descriptor", "code", code.as_str()))?;

    Ok(Descriptor::new(name, high, low))
}

/// Parses a field element.
fn parse_field(e: &BytesStart<'_>) -> Result<FieldDef, ParseError> {
    let mut name: Option<String> = None;
    let mut type_name: Option<String> = None;
    let mut multiple = false;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;

        match key {
            "name" => name = Some(value.to_string()),
            "type" => type_name = Some(value.to_string()),
            "multiple" => multiple = value == "true",
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("field", "name"))?;
    let type_name = type_name.ok_or_else(|| ParseError::missing_attr("field", "type"))?;

    let field = FieldDef::new(name, type_name);
    Ok(if multiple { field.repeated() } else { field })
}

/// Splits a `high:low` descriptor code into its 32-bit halves.
fn parse_descriptor_code(code: &str) -> Option<(u32, u32)> {
    let (high, low) = code.split_once(':')?;
    Some((parse_u32(high)?, parse_u32(low)?))
}

/// Parses an integer literal, detecting the base from its prefix.
///
/// Signs are rejected, and so are decimal literals with a leading zero
/// (`010`) unless every digit is zero.
fn parse_u32(s: &str) -> Option<u32> {
    let s = s.trim();
    let (digits, radix) = if let Some(rest) = s.strip_prefix("0x").or(s.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = s.strip_prefix("0o").or(s.strip_prefix("0O")) {
        (rest, 8)
    } else if let Some(rest) = s.strip_prefix("0b").or(s.strip_prefix("0B")) {
        (rest, 2)
    } else {
        (s, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    if radix == 10 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
