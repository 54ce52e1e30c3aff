mod uniforms;

#[proc_macro_derive(Uniforms, attributes(uniforms, uniform))]
pub fn derive_uniforms(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    uniforms::expand_uniforms(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
