const CONTAINER_ATTR: &str = "uniforms";
const FIELD_ATTR: &str = "uniform";

pub fn expand_uniforms(input: syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ty = &input.ident;

    let syn::Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            ty,
            "Uniforms can only be derived for structs",
        ));
    };
    let syn::Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            ty,
            "Uniforms needs named fields",
        ));
    };

    let mut prefix = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident(CONTAINER_ATTR)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("prefix") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                prefix = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `prefix`"))
            }
        })?;
    }

    let mut writes = Vec::with_capacity(fields.named.len());
    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };

        let mut name = None;
        let mut skip = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident(FIELD_ATTR)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else if meta.path.is_ident("name") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    name = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `name` or `skip`"))
                }
            })?;
        }
        if skip {
            continue;
        }

        let uniform = uniform_name(
            prefix.as_deref(),
            name.as_deref().unwrap_or(&ident.to_string()),
        );
        writes.push(quote::quote! {
            backend.set_uniform(shader, #uniform, ::core::convert::Into::into(self.#ident));
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote::quote! {
        impl #impl_generics novo_core::render::UniformBlock for #ty #ty_generics #where_clause {
            fn write_uniforms(
                &self,
                backend: &mut dyn novo_core::render::RenderBackend,
                shader: novo_core::scene::resource::ShaderId,
            ) {
                #(#writes)*
            }
        }
    })
}

fn uniform_name(prefix: Option<&str>, field: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}.{}", prefix, field),
        _ => field.to_string(),
    }
}
