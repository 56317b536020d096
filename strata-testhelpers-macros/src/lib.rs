//! The `#[strata_testhelpers::test]` attribute.

use unsynn::*;

// Everything before the body: attributes, qualifiers, name, arguments and
// return type.
unsynn! {
    struct Signature {
        tokens: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct TestFn {
        signature: Signature,
        body: BraceGroup,
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.tokens.to_tokens(tokens)
    }
}

/// Marks a test that installs the tracing subscriber before its body runs.
///
/// ```ignore
/// #[strata_testhelpers::test]
/// fn decodes_nested_records() {
///     // STRATA_LOG is honoured here
/// }
/// ```
///
/// Another test attribute can be named as the argument, for example
/// `#[strata_testhelpers::test(tokio::test)]`.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let parsed = item.to_token_iter().parse::<TestFn>();
    let Ok(TestFn { signature, body }) = parsed else {
        return quote::quote! {
            ::core::compile_error!("#[strata_testhelpers::test] expects a function with a body");
        }
        .into();
    };

    let test_attr = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote::quote! { #[#attr] }
    };
    let statements = body.0.stream();

    quote::quote! {
        #test_attr
        #signature {
            ::strata_testhelpers::setup();

            #statements
        }
    }
    .into()
}
