//! Field representation mapping.
//!
//! Translates a field's [`FieldClass`] into the setter parameter type, the
//! value construction expression and the argument read expression used by
//! the implementation artifact. Runtime types are referenced unqualified;
//! the implementation artifact imports them.

use amp_schema::{FieldClass, Promotion, WireKind};
use proc_macro2::{Ident, TokenStream};
use quote::quote;

/// Setter parameter type of a field.
#[must_use]
pub fn setter_type(class: &FieldClass) -> TokenStream {
    match class.wire_kind {
        WireKind::Boolean => quote! { bool },
        WireKind::Ubyte => quote! { u8 },
        WireKind::Ushort => quote! { u16 },
        WireKind::Uint => quote! { u32 },
        WireKind::Ulong | WireKind::Timestamp => quote! { u64 },
        WireKind::String | WireKind::Symbol => quote! { Option<&str> },
        WireKind::Binary => quote! { Binary },
        WireKind::List => quote! { List },
        WireKind::Map => quote! { Map },
        WireKind::Box => quote! { Described },
        WireKind::Object => quote! { Value },
    }
}

/// Expression turning the setter parameter `value` into a stored `Value`.
///
/// Scalars go through their constructor, strings and symbols map a missing
/// or empty input to null, and repeated fields are boxed afterwards with a
/// `true` descriptor.
#[must_use]
pub fn construct(class: &FieldClass, value: &Ident) -> TokenStream {
    let constructed = match class.wire_kind {
        WireKind::Boolean => quote! { Value::Boolean(#value) },
        WireKind::Ubyte => quote! { Value::Ubyte(#value) },
        WireKind::Ushort => quote! { Value::Ushort(#value) },
        WireKind::Uint => quote! { Value::Uint(#value) },
        WireKind::Ulong | WireKind::Timestamp => quote! { Value::Ulong(#value) },
        WireKind::String => nullable(quote! { Value::string }, value),
        WireKind::Symbol => nullable(quote! { Value::symbol }, value),
        WireKind::Binary | WireKind::List | WireKind::Map | WireKind::Box => {
            quote! { Value::from(#value) }
        }
        WireKind::Object => quote! { #value },
    };

    if class.is_multiple {
        quote! { Value::described(Value::Boolean(true), #constructed) }
    } else {
        constructed
    }
}

fn nullable(ctor: TokenStream, value: &Ident) -> TokenStream {
    quote! {
        match #value {
            Some(s) if !s.is_empty() => #ctor(s),
            _ => Value::Null,
        }
    }
}

/// Expression reading the next argument of `ap` at the field's channel
/// width and narrowing it to the setter type.
#[must_use]
pub fn read(class: &FieldClass, ap: &Ident) -> TokenStream {
    if class.wire_kind.promoted() == Promotion::Int {
        let promoted = quote! { #ap.value::<i32>() };
        return match class.wire_kind {
            WireKind::Boolean => quote! { #promoted != 0 },
            WireKind::Ubyte => quote! { #promoted as u8 },
            _ => quote! { #promoted as u16 },
        };
    }

    match class.wire_kind {
        WireKind::String | WireKind::Symbol => quote! { #ap.value::<Option<String>>().as_deref() },
        WireKind::Uint => quote! { #ap.value::<u32>() },
        WireKind::Ulong | WireKind::Timestamp => quote! { #ap.value::<u64>() },
        WireKind::Binary => quote! { #ap.value::<Binary>() },
        WireKind::List => quote! { #ap.value::<List>() },
        WireKind::Map => quote! { #ap.value::<Map>() },
        WireKind::Box => quote! { #ap.value::<Described>() },
        _ => quote! { #ap.value::<Value>() },
    }
}
