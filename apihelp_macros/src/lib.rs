use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{
    parenthesized, parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Expr, Fields,
    GenericParam, LitStr, Meta, Result as SynResult, Token,
};

/// How a struct field is exposed in the generated metadata.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum MemberMode {
    #[default]
    Field,
    Property,
    ReadOnly,
}

#[derive(Default)]
struct Attrs {
    markers: Vec<TokenStream2>,
    summary: Option<String>,
    localized: Vec<(String, String)>,
    construction: Option<TokenStream2>,
    internal: bool,
    member: MemberMode,
    rename_all: Option<String>,
    renamed: bool,
}

impl Attrs {
    fn marker(&mut self, marker: TokenStream2) {
        self.markers.push(quote! { ::apihelp::reflect::Marker::#marker });
    }

    fn constraint(&mut self, constraint: TokenStream2) {
        self.marker(quote! { Constraint(::apihelp::reflect::Constraint::#constraint) });
    }

    fn parse(attrs: &[Attribute]) -> SynResult<Self> {
        let mut parsed = Attrs::default();
        let mut doc_lines = Vec::new();
        for attr in attrs {
            if attr.path().is_ident("doc") {
                if let Meta::NameValue(name_value) = &attr.meta {
                    if let Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(line),
                        ..
                    }) = &name_value.value
                    {
                        doc_lines.push(line.value().trim().to_string());
                    }
                }
            } else if attr.path().is_ident("describe") {
                let mut pending_lang: Option<LitStr> = None;
                attr.parse_nested_meta(|meta| parsed.describe_key(&meta, &mut pending_lang))?;
                if let Some(lang) = pending_lang {
                    return Err(syn::Error::new(lang.span(), "`lang` must be followed by `doc`"));
                }
            } else if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| parsed.serde_key(&meta))?;
            }
        }
        let doc = doc_lines.join("\n").trim().to_string();
        if parsed.summary.is_none() && !doc.is_empty() {
            parsed.summary = Some(doc);
        }
        Ok(parsed)
    }

    fn describe_key(
        &mut self,
        meta: &ParseNestedMeta,
        pending_lang: &mut Option<LitStr>,
    ) -> SynResult<()> {
        let key = meta
            .path
            .get_ident()
            .map(|ident| ident.to_string())
            .unwrap_or_default();
        match key.as_str() {
            "display_name" => {
                let name: LitStr = meta.value()?.parse()?;
                self.marker(quote! { DisplayName(#name.into()) });
            }
            "ignore" => self.marker(quote! { ApiExplorerIgnore }),
            "json_ignore" => self.marker(quote! { JsonIgnore }),
            "xml_ignore" => self.marker(quote! { XmlIgnore }),
            "ignore_data_member" => self.marker(quote! { IgnoreDataMember }),
            "non_serialized" => self.marker(quote! { NonSerialized }),
            "data_contract" => self.marker(quote! { DataContract }),
            "data_member" => {
                if meta.input.peek(Token![=]) {
                    let name: LitStr = meta.value()?.parse()?;
                    self.marker(quote! { DataMember { name: ::std::option::Option::Some(#name.into()) } });
                } else {
                    self.marker(quote! { DataMember { name: ::std::option::Option::None } });
                }
            }
            "enum_member" => self.marker(quote! { EnumMember }),
            "required" => self.constraint(quote! { Required }),
            "range" => {
                let (min, max) = parse_bounds(meta)?;
                self.constraint(quote! { Range { min: (#min) as f64, max: (#max) as f64 } });
            }
            "min_length" => {
                let length: Expr = meta.value()?.parse()?;
                self.constraint(quote! { MinLength((#length) as usize) });
            }
            "max_length" => {
                let length: Expr = meta.value()?.parse()?;
                self.constraint(quote! { MaxLength((#length) as usize) });
            }
            "string_length" => {
                let (min, max) = parse_bounds(meta)?;
                self.constraint(
                    quote! { StringLength { min: (#min) as usize, max: (#max) as usize } },
                );
            }
            "data_type" => {
                let hint: LitStr = meta.value()?.parse()?;
                self.constraint(quote! { DataType(#hint.into()) });
            }
            "pattern" => {
                let pattern: LitStr = meta.value()?.parse()?;
                self.constraint(quote! { RegularExpression(#pattern.into()) });
            }
            "no_default" => {
                self.construction = Some(quote! { ::apihelp::reflect::Construction::NoDefault });
            }
            "interface" => {
                self.construction = Some(quote! { ::apihelp::reflect::Construction::Abstract });
            }
            "internal" => self.internal = true,
            "property" => self.member = MemberMode::Property,
            "read_only" => self.member = MemberMode::ReadOnly,
            "lang" => {
                let lang: LitStr = meta.value()?.parse()?;
                if pending_lang.replace(lang).is_some() {
                    return Err(meta.error("`lang` must be followed by `doc`"));
                }
            }
            "doc" => {
                let text: LitStr = meta.value()?.parse()?;
                match pending_lang.take() {
                    Some(lang) => self.localized.push((lang.value(), text.value())),
                    None => self.summary = Some(text.value()),
                }
            }
            _ => return Err(meta.error("unknown describe attribute")),
        }
        Ok(())
    }

    fn serde_key(&mut self, meta: &ParseNestedMeta) -> SynResult<()> {
        if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
            self.marker(quote! { JsonIgnore });
        } else if meta.path.is_ident("rename") {
            if meta.input.peek(Token![=]) {
                let name: LitStr = meta.value()?.parse()?;
                self.json_property(&name);
            } else {
                meta.parse_nested_meta(|nested| {
                    let name: LitStr = nested.value()?.parse()?;
                    if nested.path.is_ident("serialize") {
                        self.json_property(&name);
                    }
                    Ok(())
                })?;
            }
        } else if meta.path.is_ident("rename_all") {
            if meta.input.peek(Token![=]) {
                let rule: LitStr = meta.value()?.parse()?;
                self.rename_all = Some(rule.value());
            } else {
                meta.parse_nested_meta(|nested| {
                    let rule: LitStr = nested.value()?.parse()?;
                    if nested.path.is_ident("serialize") {
                        self.rename_all = Some(rule.value());
                    }
                    Ok(())
                })?;
            }
        } else {
            skip_meta(meta)?;
        }
        Ok(())
    }

    fn json_property(&mut self, name: &LitStr) {
        self.renamed = true;
        self.marker(quote! { JsonProperty { name: #name.into() } });
    }

    fn docs(&self, builder_doc: &str, builder_localized: &str) -> TokenStream2 {
        let doc_method = syn::Ident::new(builder_doc, Span::call_site());
        let localized_method = syn::Ident::new(builder_localized, Span::call_site());
        let summary = self.summary.iter();
        let langs = self.localized.iter().map(|(lang, _)| lang);
        let texts = self.localized.iter().map(|(_, text)| text);
        quote! {
            #(.#doc_method(#summary))*
            #(.#localized_method(#langs, #texts))*
        }
    }
}

/// Consumes the value of a serde key this derive does not interpret.
fn skip_meta(meta: &ParseNestedMeta) -> SynResult<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        let _: TokenStream2 = content.parse()?;
    }
    Ok(())
}

/// Parses `(min, max)`.
fn parse_bounds(meta: &ParseNestedMeta) -> SynResult<(Expr, Expr)> {
    let content;
    parenthesized!(content in meta.input);
    let bounds = Punctuated::<Expr, Token![,]>::parse_terminated(&content)?;
    let mut bounds = bounds.into_iter();
    match (bounds.next(), bounds.next(), bounds.next()) {
        (Some(min), Some(max), None) => Ok((min, max)),
        _ => Err(meta.error("expected `(min, max)`")),
    }
}

/// Applies a serde `rename_all` rule to a snake_case field name.
fn apply_rename_rule(rule: &str, field: &str) -> Option<String> {
    let words = field.split('_').filter(|word| !word.is_empty());
    let capitalized = |word: &str| {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    };
    let renamed = match rule {
        "lowercase" => field.to_lowercase(),
        "UPPERCASE" => field.to_uppercase(),
        "PascalCase" => words.map(capitalized).collect(),
        "camelCase" => words
            .enumerate()
            .map(|(index, word)| {
                if index == 0 {
                    word.to_string()
                } else {
                    capitalized(word)
                }
            })
            .collect(),
        "snake_case" => field.to_string(),
        "SCREAMING_SNAKE_CASE" => field.to_uppercase(),
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.to_uppercase().replace('_', "-"),
        _ => return None,
    };
    Some(renamed)
}

fn expand(input: DeriveInput) -> SynResult<TokenStream2> {
    let ident = &input.ident;
    let type_attrs = Attrs::parse(&input.attrs)?;

    let mut generics = input.generics.clone();
    let mut type_params = Vec::new();
    for param in &mut generics.params {
        match param {
            GenericParam::Type(param) => {
                param.bounds.push(parse_quote!(::apihelp::reflect::Reflect));
                type_params.push(param.ident.clone());
            }
            GenericParam::Lifetime(lifetime) => {
                return Err(syn::Error::new_spanned(
                    lifetime,
                    "Describe does not support lifetime parameters",
                ));
            }
            GenericParam::Const(_) => {}
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let (kind, members) = match &input.data {
        Data::Struct(data) => {
            let fields = match &data.fields {
                Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
                Fields::Unit => Vec::new(),
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new_spanned(
                        ident,
                        "Describe supports structs with named fields, unit structs and field-less enums",
                    ));
                }
            };
            let mut members = Vec::new();
            for field in fields {
                let attrs = Attrs::parse(&field.attrs)?;
                let declared = field
                    .ident
                    .as_ref()
                    .map(|ident| ident.unraw().to_string())
                    .unwrap_or_default();
                let mut markers = attrs.markers.clone();
                if !attrs.renamed {
                    if let Some(renamed) = type_attrs
                        .rename_all
                        .as_deref()
                        .and_then(|rule| apply_rename_rule(rule, &declared))
                    {
                        markers.push(quote! {
                            ::apihelp::reflect::Marker::JsonProperty { name: #renamed.into() }
                        });
                    }
                }
                let ty = &field.ty;
                let type_ref = quote! { ::apihelp::reflect::TypeRef::of::<#ty>() };
                let constructor = match attrs.member {
                    MemberMode::Field => {
                        quote! { ::apihelp::reflect::MemberInfo::field(#declared, #type_ref) }
                    }
                    MemberMode::Property => {
                        quote! { ::apihelp::reflect::MemberInfo::property(#declared, #type_ref, true) }
                    }
                    MemberMode::ReadOnly => {
                        quote! { ::apihelp::reflect::MemberInfo::property(#declared, #type_ref, false) }
                    }
                };
                let docs = attrs.docs("with_doc", "with_localized_doc");
                members.push(quote! {
                    #constructor
                        #(.with_marker(#markers))*
                        #docs
                });
            }
            (quote! { ::apihelp::reflect::TypeKind::Struct }, members)
        }
        Data::Enum(data) => {
            let mut enumerators = Vec::new();
            for variant in &data.variants {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "Describe supports only field-less enum variants",
                    ));
                }
                let attrs = Attrs::parse(&variant.attrs)?;
                let variant_ident = &variant.ident;
                let name = variant_ident.unraw().to_string();
                let markers = &attrs.markers;
                let docs = attrs.docs("with_doc", "with_localized_doc");
                enumerators.push(quote! {
                    ::apihelp::reflect::EnumeratorInfo::new(#name, Self::#variant_ident as i64)
                        #(.with_marker(#markers))*
                        #docs
                });
            }
            (
                quote! { ::apihelp::reflect::TypeKind::Enum(::std::vec![#(#enumerators),*]) },
                Vec::new(),
            )
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "Describe does not support unions",
            ));
        }
    };

    let name = ident.unraw().to_string();
    let type_markers = &type_attrs.markers;
    let type_docs = type_attrs.docs("doc", "localized_doc");
    let construction = type_attrs
        .construction
        .as_ref()
        .map(|construction| quote! { .construction(#construction) });
    let visibility = type_attrs
        .internal
        .then(|| quote! { .visibility(::apihelp::reflect::Visibility::Internal) });

    Ok(quote! {
        impl #impl_generics ::apihelp::reflect::Reflect for #ident #ty_generics #where_clause {
            fn type_info() -> ::apihelp::reflect::TypeInfo {
                ::apihelp::reflect::TypeInfoBuilder::new::<Self>(#name, #kind)
                    #(.generic_arg(::apihelp::reflect::TypeRef::of::<#type_params>()))*
                    #(.marker(#type_markers))*
                    #type_docs
                    #(.member(#members))*
                    #construction
                    #visibility
                    .build()
            }
        }
    })
}

/// Derives `apihelp::reflect::Reflect` from a type definition.
///
/// Doc comments become documentation, `#[serde(skip)]`, `#[serde(rename)]`
/// and `#[serde(rename_all)]` are honoured, and `#[describe(..)]` adds the
/// rest of the metadata vocabulary (display names, ignore flags, data
/// contracts, validation constraints, localized docs).
#[proc_macro_derive(Describe, attributes(describe))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_rules() {
        assert_eq!(apply_rename_rule("PascalCase", "total_pages").as_deref(), Some("TotalPages"));
        assert_eq!(apply_rename_rule("camelCase", "total_pages").as_deref(), Some("totalPages"));
        assert_eq!(
            apply_rename_rule("SCREAMING-KEBAB-CASE", "total_pages").as_deref(),
            Some("TOTAL-PAGES")
        );
        assert_eq!(apply_rename_rule("Title Case", "total_pages"), None);
    }

    #[test]
    fn test_rejected_inputs() {
        let tuple: DeriveInput = parse_quote! { struct Meters(f64); };
        assert!(expand(tuple).is_err());

        let borrowed: DeriveInput = parse_quote! { struct View<'a> { name: &'a str } };
        assert!(expand(borrowed).is_err());

        let unknown: DeriveInput = parse_quote! {
            struct Contact {
                #[describe(colour = "red")]
                phone: String,
            }
        };
        assert!(expand(unknown).is_err());

        let dangling: DeriveInput = parse_quote! {
            #[describe(lang = "ru")]
            struct Contact;
        };
        assert!(expand(dangling).is_err());
    }

    #[test]
    fn test_expansion_mentions_members() {
        let input: DeriveInput = parse_quote! {
            /// Contact DTO
            #[serde(rename_all = "PascalCase")]
            struct Contact {
                #[describe(required)]
                phone: String,
            }
        };
        let output = expand(input).unwrap().to_string();
        assert!(output.contains("\"Contact DTO\""));
        assert!(output.contains("\"Phone\""));
        assert!(output.contains("Required"));
    }
}
