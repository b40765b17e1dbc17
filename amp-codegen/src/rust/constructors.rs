//! Implementation artifact generation.
//!
//! For every composite this emits a fluent builder that owns the backing
//! container, and a `*_kw` constructor that drives the builder from a
//! keyword/value argument queue until the terminator keyword.

use crate::options::CodegenOptions;
use crate::rust::idents::ident;
use crate::rust::types;
use amp_schema::{Encoding, ProtocolIr, ResolvedComposite, ResolvedField};
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

/// Generator for the implementation artifact.
pub struct ConstructorGenerator<'a> {
    ir: &'a ProtocolIr,
    options: &'a CodegenOptions,
    runtime: TokenStream,
}

impl<'a> ConstructorGenerator<'a> {
    /// Creates a new constructor generator.
    #[must_use]
    pub fn new(ir: &'a ProtocolIr, options: &'a CodegenOptions, runtime: TokenStream) -> Self {
        Self {
            ir,
            options,
            runtime,
        }
    }

    /// Generates the full implementation artifact.
    #[must_use]
    pub fn generate(&self) -> TokenStream {
        let rt = &self.runtime;
        let composites = self.ir.composites.iter().map(|c| {
            let builder = self.generate_builder(c);
            let kw_fn = self.generate_kw_constructor(c);
            tracing::debug!(name = %c.name, fields = c.fields.len(), "generated constructor");
            quote! {
                #builder
                #kw_fn
            }
        });

        quote! {
            #[allow(unused_imports)]
            use #rt::{Arg, Binary, Described, List, Map, Value, VarArgs, unrecognized_keyword};

            #(#composites)*
        }
    }

    /// Builder struct with one setter per field.
    fn generate_builder(&self, composite: &ResolvedComposite) -> TokenStream {
        let builder = format_ident!("{}", composite.builder_name());
        let count = Literal::usize_unsuffixed(composite.fields.len());
        let tag = composite.tag_symbol();
        let doc = format!(" Builder for `{}` instances, tagged `{}`.", composite.name, tag);

        let (slot, slot_ty, init) = match composite.encoding {
            Encoding::List => (
                format_ident!("list"),
                quote! { List },
                quote! {
                    let mut list = List::with_capacity(#count);
                    list.fill(Value::Null, #count);
                    Self { list }
                },
            ),
            Encoding::Map => (
                format_ident!("map"),
                quote! { Map },
                quote! {
                    Self { map: Map::with_capacity(#count) }
                },
            ),
        };

        let setters = composite
            .fields
            .iter()
            .map(|f| self.generate_setter(composite, f));

        quote! {
            #[doc = #doc]
            #[derive(Debug, Clone)]
            pub struct #builder {
                #slot: #slot_ty,
            }

            impl Default for #builder {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl #builder {
                /// Creates a builder with every field unset.
                #[must_use]
                pub fn new() -> Self {
                    #init
                }

                #(#setters)*

                /// Finishes the instance as a described value.
                #[must_use]
                pub fn build(self) -> Value {
                    Value::described(Value::symbol(#tag), Value::from(self.#slot))
                }
            }
        }
    }

    /// Setter storing one field at its list slot or under its symbol key.
    fn generate_setter(
        &self,
        composite: &ResolvedComposite,
        field: &ResolvedField,
    ) -> TokenStream {
        let method = ident(&field.method_name());
        let param_ty = types::setter_type(&field.class);
        let value = format_ident!("value");
        let construct = types::construct(&field.class, &value);
        let doc = format!(" Sets `{}` ({}).", field.name, field.type_name);

        let store = match composite.encoding {
            Encoding::List => {
                let index = format_ident!("{}", field.index_name);
                quote! { self.list.set(field::#index, value); }
            }
            Encoding::Map => {
                let key = &field.name;
                quote! { self.map.insert(Value::symbol(#key), value); }
            }
        };

        quote! {
            #[doc = #doc]
            #[must_use]
            pub fn #method(mut self, #value: #param_ty) -> Self {
                let #value = #construct;
                #store
                self
            }
        }
    }

    /// Keyword/value constructor driving the builder.
    fn generate_kw_constructor(&self, composite: &ResolvedComposite) -> TokenStream {
        let builder = format_ident!("{}", composite.builder_name());
        let kw_fn = format_ident!("{}{}_kw", self.options.prefix(), composite.fn_name());
        let terminator = format_ident!("{}", self.options.terminator_name());
        let ap = format_ident!("ap");
        let doc = format!(
            " Builds a `{}` instance from keyword/value pairs ending with `{}`.",
            composite.name,
            self.options.terminator_name()
        );

        let arms = composite.fields.iter().map(|f| {
            let keyword = format_ident!("{}", f.keyword);
            let method = ident(&f.method_name());
            let read = types::read(&f.class, &ap);
            quote! {
                keyword::#keyword => builder = builder.#method(#read),
            }
        });

        let binding = if composite.fields.is_empty() {
            quote! { let builder }
        } else {
            quote! { let mut builder }
        };

        quote! {
            #[doc = #doc]
            ///
            /// # Panics
            /// Panics on a keyword that is not a field of this type.
            pub fn #kw_fn(#ap: &mut VarArgs) -> Value {
                #binding = #builder::new();
                loop {
                    match #ap.keyword() {
                        #(#arms)*
                        keyword::#terminator => break,
                        code => unrecognized_keyword(code),
                    }
                }
                builder.build()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amp_schema::parse_schema;

    const XML: &str = r#"<amqp name="messaging"><section name="s">
    <type name="header" class="composite" source="list" provides="section">
      <descriptor name="amqp:header:list" code="0x00000000:0x00000070"/>
      <field name="durable" type="boolean"/>
      <field name="priority" type="ubyte"/>
      <field name="delivery-count" type="uint"/>
    </type>
    <type name="source" class="composite" source="map">
      <descriptor name="amqp:source:map" code="0x00000000:0x00000028"/>
      <field name="address" type="string"/>
      <field name="capabilities" type="symbol" multiple="true"/>
    </type>
    <type name="accepted" class="composite" source="list"/>
</section></amqp>"#;

    fn generate() -> String {
        let schema = parse_schema(XML).unwrap();
        let ir = ProtocolIr::from_schema(&schema).unwrap();
        let options = CodegenOptions::default();
        let runtime = options.runtime_tokens().unwrap();
        let tokens = ConstructorGenerator::new(&ir, &options, runtime).generate();
        let file: syn::File = syn::parse2(tokens).unwrap();
        prettyplease::unparse(&file)
    }

    #[test]
    fn test_list_builder_prefills_slots() {
        let out = generate();
        assert!(out.contains("pub struct HeaderBuilder"));
        assert!(out.contains("let mut list = List::with_capacity(3);"));
        assert!(out.contains("list.fill(Value::Null, 3);"));
        assert!(out.contains("self.list.set(field::HEADER_PRIORITY, value);"));
    }

    #[test]
    fn test_map_builder_uses_symbol_keys() {
        let out = generate();
        assert!(out.contains("Map::with_capacity(2)"));
        assert!(out.contains("self.map.insert(Value::symbol(\"address\"), value);"));
    }

    #[test]
    fn test_kw_constructor_arms() {
        let out = generate();
        assert!(out.contains("pub fn proto_header_kw(ap: &mut VarArgs) -> Value"));
        assert!(out.contains("keyword::DURABLE =>"));
        assert!(out.contains("builder.durable(ap.value::<i32>() != 0)"));
        assert!(out.contains("builder.priority(ap.value::<i32>() as u8)"));
        assert!(out.contains("builder.delivery_count(ap.value::<u32>())"));
        assert!(out.contains("keyword::KW_END => break"));
        assert!(out.contains("code => unrecognized_keyword(code)"));
    }

    #[test]
    fn test_descriptor_tag_and_fallback() {
        let out = generate();
        assert!(out.contains("Value::symbol(\"amqp:header:list\")"));
        assert!(out.contains("Value::symbol(\"accepted\")"));
    }

    #[test]
    fn test_fieldless_type_has_immutable_builder() {
        let out = generate();
        assert!(out.contains("let builder = AcceptedBuilder::new();"));
    }
}
