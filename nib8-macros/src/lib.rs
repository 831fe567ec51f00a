use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, punctuated::Punctuated, token::Comma, FnArg, Ident, ItemFn,
    Pat,
};

const FIELDS: [&str; 5] = ["x", "y", "n", "kk", "nnn"];

/// Turns an instruction handler into the shared handler shape.
///
/// Parameters tagged with a field attribute (`#[x]`, `#[y]`, `#[n]`, `#[kk]`
/// or `#[nnn]`) are taken out of the signature and bound from the decoded
/// instruction instead, converted with `From` into the declared type. An
/// `instruction: crate::Instruction` parameter is appended last.
///
/// ```ignore
/// #[opcode]
/// fn load_immediate(machine: &mut Machine, _io: &mut Peripherals<'_>, #[x] x: u8, #[kk] kk: u8)
///     -> Result<Status, ExecError>
/// {
///     *machine.register_mut(x) = kk;
///     Ok(Status::Advance)
/// }
/// ```
#[proc_macro_attribute]
pub fn opcode(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut function_item = parse_macro_input!(input as ItemFn);

    let instruction = Ident::new("instruction", Span::call_site());

    let mut bindings = vec![];
    let mut kept_inputs: Punctuated<FnArg, Comma> = Punctuated::new();

    for argument in &function_item.sig.inputs {
        if let FnArg::Typed(typed) = argument {
            if let (Pat::Ident(variable_name), Some(attribute)) =
                (typed.pat.as_ref(), typed.attrs.first())
            {
                let Some(field_name) = attribute.path().get_ident() else {
                    return syn::Error::new_spanned(attribute, "expected an instruction field")
                        .to_compile_error()
                        .into();
                };
                if !FIELDS.contains(&field_name.to_string().as_str()) {
                    return syn::Error::new_spanned(
                        field_name,
                        format!("unknown instruction field, expected one of {FIELDS:?}"),
                    )
                    .to_compile_error()
                    .into();
                }

                let variable_name = &variable_name.ident;
                let variable_type = &typed.ty;
                bindings.push(quote! {
                    let #variable_name: #variable_type =
                        ::core::convert::From::from(#instruction.#field_name());
                });
                continue;
            }
        }
        kept_inputs.push(argument.clone());
    }

    kept_inputs.push(parse_quote!(#instruction: crate::Instruction));
    function_item.sig.inputs = kept_inputs;

    let attributes = &function_item.attrs;
    let visibility = &function_item.vis;
    let signature = &function_item.sig;
    let body = &function_item.block;

    quote! {
        #(#attributes)*
        #[allow(unused_variables)]
        #visibility #signature {
            #(#bindings)*

            #body
        }
    }
    .into()
}
