use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use std::collections::HashSet;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type, parse_macro_input, spanned::Spanned};

/// Implements `modeldao::Model` for a struct with named fields.
///
/// Container attribute: `#[model(table = "...")]` overrides the lowercased type name.
/// Field attributes: `#[primary_key]` (or `#[model(primary_key)]`) and
/// `#[model(column = "...")]` to rename the column.
#[proc_macro_derive(Model, attributes(model, primary_key))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_model(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct ModelField {
    ident: Ident,
    ty: Type,
    column: String,
    primary_key: bool,
}

#[derive(Default)]
struct FieldOptions {
    column: Option<String>,
    primary_key: bool,
}

fn expand_model(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            input.generics,
            "Model cannot be derived for generic structs",
        ));
    }

    let table_name = parse_model_options(&input.attrs)?;

    let data_struct = match input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Model can only be derived for structs",
            ));
        }
    };

    let named_fields = match data_struct.fields {
        Fields::Named(fields) => fields,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Model requires named fields",
            ));
        }
    };

    let mut fields = Vec::<ModelField>::new();
    let mut seen = HashSet::<String>::new();

    for field in named_fields.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "Model requires named fields"))?;
        let options = parse_field_options(&field.attrs)?;
        let column = options
            .column
            .unwrap_or_else(|| ident.unraw().to_string());

        if !seen.insert(column.clone()) {
            return Err(syn::Error::new(
                field.span(),
                format!("Duplicate column name '{}'", column),
            ));
        }

        fields.push(ModelField {
            ident,
            ty: field.ty,
            column,
            primary_key: options.primary_key,
        });
    }

    if fields.is_empty() {
        return Err(syn::Error::new(
            struct_name.span(),
            "Model requires at least one field",
        ));
    }

    let field_count = fields.len();
    let descriptors = fields.iter().map(|field| {
        let column = &field.column;
        let ty = &field.ty;
        let primary_key = field.primary_key;
        quote! {
            ::modeldao::FieldDescriptor::new(
                #column,
                <#ty as ::modeldao::FieldType>::KIND,
                #primary_key,
            )
            .with_nullable(<#ty as ::modeldao::FieldType>::NULLABLE)
        }
    });

    let get_arms = fields.iter().enumerate().map(|(idx, field)| {
        let ident = &field.ident;
        quote! {
            #idx => Some(::modeldao::FieldType::to_value(&self.#ident)),
        }
    });

    let set_arms = fields.iter().enumerate().map(|(idx, field)| {
        let ident = &field.ident;
        let ty = &field.ty;
        quote! {
            #idx => {
                self.#ident = <#ty as ::modeldao::FieldType>::from_value(value)?;
                Ok(())
            }
        }
    });

    let table_override = table_name.map(|table| {
        quote! {
            fn table_name() -> String {
                #table.to_string()
            }
        }
    });

    Ok(quote! {
        impl ::modeldao::Model for #struct_name {
            fn model_name() -> &'static str {
                stringify!(#struct_name)
            }

            #table_override

            fn fields() -> &'static [::modeldao::FieldDescriptor] {
                static FIELDS: [::modeldao::FieldDescriptor; #field_count] = [
                    #(#descriptors),*
                ];
                &FIELDS
            }

            fn get(&self, index: usize) -> Option<::modeldao::Value> {
                match index {
                    #(#get_arms)*
                    _ => None,
                }
            }

            fn set(&mut self, index: usize, value: ::modeldao::Value) -> ::modeldao::Result<()> {
                match index {
                    #(#set_arms)*
                    _ => Err(::modeldao::DaoError::InputError(format!(
                        "{} has no field at index {}",
                        stringify!(#struct_name),
                        index
                    ))),
                }
            }
        }
    })
}

fn parse_model_options(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut table_name = None;

    for attr in attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                if lit.value().trim().is_empty() {
                    return Err(syn::Error::new(lit.span(), "Table name cannot be empty"));
                }
                table_name = Some(lit.value());
                return Ok(());
            }

            Err(meta.error("Unsupported model attribute. Supported: table = \"...\""))
        })?;
    }

    Ok(table_name)
}

fn parse_field_options(attrs: &[syn::Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs {
        if attr.path().is_ident("primary_key") {
            if !matches!(attr.meta, syn::Meta::Path(_)) {
                return Err(syn::Error::new(
                    attr.span(),
                    "#[primary_key] does not accept arguments",
                ));
            }
            options.primary_key = true;
            continue;
        }

        if !attr.path().is_ident("model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") {
                options.primary_key = true;
                return Ok(());
            }

            if meta.path.is_ident("column") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                if lit.value().trim().is_empty() {
                    return Err(syn::Error::new(lit.span(), "Column name cannot be empty"));
                }
                options.column = Some(lit.value());
                return Ok(());
            }

            Err(meta.error(
                "Unsupported #[model(...)] field option. Supported: primary_key, column = \"...\"",
            ))
        })?;
    }

    Ok(options)
}
