//! Declarations artifact generation.
//!
//! Emits the constants both sides of the constructor protocol agree on:
//! per-type field indices, the global keyword codes with their terminator,
//! frame symbols, codes and indices, descriptor symbols and codes of every
//! described composite, and one forwarding constructor per composite that
//! appends the terminator on the caller's behalf.

use crate::options::CodegenOptions;
use crate::rust::idents::ident;
use amp_schema::{ProtocolIr, ResolvedComposite};
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

/// Generator for the declarations artifact.
pub struct DeclarationGenerator<'a> {
    ir: &'a ProtocolIr,
    options: &'a CodegenOptions,
    runtime: TokenStream,
}

impl<'a> DeclarationGenerator<'a> {
    /// Creates a new declaration generator.
    #[must_use]
    pub fn new(ir: &'a ProtocolIr, options: &'a CodegenOptions, runtime: TokenStream) -> Self {
        Self {
            ir,
            options,
            runtime,
        }
    }

    /// Generates the full declarations artifact.
    #[must_use]
    pub fn generate(&self) -> TokenStream {
        let fields = self.generate_field_indices();
        let keywords = self.generate_keywords();
        let frames = self.generate_frames();
        let descriptors = self.generate_descriptors();
        let constructors = self
            .ir
            .composites
            .iter()
            .map(|c| self.generate_forwarder(c));

        quote! {
            #fields
            #keywords
            #frames
            #descriptors
            #(#constructors)*
        }
    }

    /// Positional index of every field within its own type.
    fn generate_field_indices(&self) -> TokenStream {
        let consts = self.ir.composites.iter().flat_map(|c| {
            c.fields.iter().map(|f| {
                let name = format_ident!("{}", f.index_name);
                let index = Literal::usize_unsuffixed(f.index);
                quote! { pub const #name: usize = #index; }
            })
        });

        quote! {
            /// Positional slot of each field within its composite.
            pub mod field {
                #(#consts)*
            }
        }
    }

    /// Global keyword codes in assignment order, then the terminator.
    fn generate_keywords(&self) -> TokenStream {
        let consts = self.ir.keywords.iter().map(|(keyword, code)| {
            let name = format_ident!("{}", keyword);
            let code = Literal::u32_unsuffixed(code);
            quote! { pub const #name: u32 = #code; }
        });
        let terminator = format_ident!("{}", self.options.terminator_name());
        let end = Literal::u32_unsuffixed(self.ir.keywords.terminator());

        quote! {
            /// Field keyword codes shared by every constructor.
            pub mod keyword {
                #(#consts)*
                /// Marks the end of a keyword/value argument list.
                pub const #terminator: u32 = #end;
            }
        }
    }

    /// Symbol, code and index of every frame type.
    fn generate_frames(&self) -> TokenStream {
        let consts = self.ir.frames.iter().map(|frame| {
            let sym = format_ident!("{}_SYM", frame.const_name);
            let code_name = format_ident!("{}_CODE", frame.const_name);
            let index_name = format_ident!("{}", frame.const_name);
            let symbol = &frame.symbol;
            let code = Literal::u64_unsuffixed(frame.code);
            let index = Literal::usize_unsuffixed(frame.index);
            quote! {
                pub const #sym: &str = #symbol;
                pub const #code_name: u64 = #code;
                pub const #index_name: usize = #index;
            }
        });

        let arms = self.ir.frames.iter().map(|frame| {
            let code_name = format_ident!("{}_CODE", frame.const_name);
            let index_name = format_ident!("{}", frame.const_name);
            quote! { #code_name => Some(#index_name), }
        });

        quote! {
            /// Descriptor symbols, codes and indices of frame types.
            pub mod frame {
                #(#consts)*

                /// Maps a frame descriptor code to its frame index.
                #[must_use]
                pub const fn index_of(code: u64) -> Option<usize> {
                    match code {
                        #(#arms)*
                        _ => None,
                    }
                }
            }
        }
    }

    /// Symbol and code of every composite that declares a descriptor.
    fn generate_descriptors(&self) -> TokenStream {
        let consts = self.ir.composites.iter().filter_map(|c| {
            let descriptor = c.descriptor.as_ref()?;
            let sym = format_ident!("{}_SYM", c.const_name());
            let code_name = format_ident!("{}_CODE", c.const_name());
            let symbol = &descriptor.name;
            let code = Literal::u64_unsuffixed(descriptor.code);
            Some(quote! {
                pub const #sym: &str = #symbol;
                pub const #code_name: u64 = #code;
            })
        });

        quote! {
            /// Descriptor symbols and codes of described composites.
            pub mod descriptor {
                #(#consts)*
            }
        }
    }

    /// Forwarding constructor taking keyword/value pairs without the
    /// terminator.
    fn generate_forwarder(&self, composite: &ResolvedComposite) -> TokenStream {
        let rt = &self.runtime;
        let fn_name = ident(&format!("{}{}", self.options.prefix(), composite.fn_name()));
        let kw_fn = format_ident!("{}{}_kw", self.options.prefix(), composite.fn_name());
        let terminator = format_ident!("{}", self.options.terminator_name());
        let doc = format!(
            " Builds a `{}` instance from `(keyword, value)` pairs in any order.",
            composite.name
        );

        quote! {
            #[doc = #doc]
            pub fn #fn_name<I>(args: I) -> #rt::Value
            where
                I: IntoIterator<Item = (u32, #rt::Arg)>,
            {
                #kw_fn(&mut #rt::VarArgs::terminated(args, keyword::#terminator))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amp_schema::parse_schema;

    const XML: &str = r#"<amqp name="transport"><section name="s">
    <type name="open" class="composite" source="list" provides="frame">
      <descriptor name="amqp:open:list" code="0x00000000:0x00000010"/>
      <field name="container-id" type="string"/>
      <field name="channel-max" type="ushort"/>
    </type>
    <type name="close" class="composite" source="list" provides="frame">
      <descriptor name="amqp:close:list" code="0x00000000:0x00000018"/>
    </type>
</section></amqp>"#;

    fn generate(options: &CodegenOptions) -> String {
        let schema = parse_schema(XML).unwrap();
        let ir = ProtocolIr::from_schema(&schema).unwrap();
        let runtime = options.runtime_tokens().unwrap();
        let tokens = DeclarationGenerator::new(&ir, options, runtime).generate();
        let file: syn::File = syn::parse2(tokens).unwrap();
        prettyplease::unparse(&file)
    }

    #[test]
    fn test_field_and_keyword_constants() {
        let out = generate(&CodegenOptions::default());
        assert!(out.contains("pub const OPEN_CONTAINER_ID: usize = 0;"));
        assert!(out.contains("pub const OPEN_CHANNEL_MAX: usize = 1;"));
        assert!(out.contains("pub const CONTAINER_ID: u32 = 0;"));
        assert!(out.contains("pub const CHANNEL_MAX: u32 = 1;"));
        assert!(out.contains("pub const KW_END: u32 = 2;"));
    }

    #[test]
    fn test_frame_constants() {
        let out = generate(&CodegenOptions::default());
        assert!(out.contains("pub const OPEN_SYM: &str = \"amqp:open:list\";"));
        assert!(out.contains("pub const OPEN_CODE: u64 = 16;"));
        assert!(out.contains("pub const OPEN: usize = 0;"));
        assert!(out.contains("pub const CLOSE_CODE: u64 = 24;"));
        assert!(out.contains("pub const CLOSE: usize = 1;"));
        assert!(out.contains("pub const fn index_of(code: u64) -> Option<usize>"));
        assert!(out.contains("OPEN_CODE => Some(OPEN)"));
    }

    #[test]
    fn test_descriptor_constants_cover_non_frames() {
        let xml = r#"<amqp name="messaging"><section name="s">
    <type name="accepted" class="composite" source="list" provides="outcome">
      <descriptor name="amqp:accepted:list" code="0x00000000:0x00000024"/>
    </type>
    <type name="plain" class="composite" source="list"/>
</section></amqp>"#;
        let schema = parse_schema(xml).unwrap();
        let ir = ProtocolIr::from_schema(&schema).unwrap();
        let options = CodegenOptions::default();
        let tokens =
            DeclarationGenerator::new(&ir, &options, options.runtime_tokens().unwrap()).generate();
        let out = prettyplease::unparse(&syn::parse2(tokens).unwrap());

        assert!(out.contains("pub const ACCEPTED_SYM: &str = \"amqp:accepted:list\";"));
        assert!(out.contains("pub const ACCEPTED_CODE: u64 = 36;"));
        assert!(!out.contains("PLAIN_CODE"));
        assert!(!out.contains("pub const ACCEPTED: usize"));
    }

    #[test]
    fn test_forwarder_uses_options() {
        let options = CodegenOptions::new()
            .runtime_path("crate::rt")
            .fn_prefix("amqp_")
            .terminator("END");
        let out = generate(&options);
        assert!(out.contains("pub fn amqp_open<I>(args: I) -> crate::rt::Value"));
        assert!(out.contains("amqp_open_kw(&mut crate::rt::VarArgs::terminated(args, keyword::END))"));
        assert!(out.contains("pub const END: u32 = 2;"));
    }
}
