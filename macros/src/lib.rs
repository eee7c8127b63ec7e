use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, ItemFn};

/// Test attribute used across rxlite.
///
/// - `#[rxlite_macro::test] fn ...` expands to a plain `#[test]`.
/// - `#[rxlite_macro::test] async fn ...` expands to a current-thread tokio
///   test whose body runs inside a `LocalSet`, so `spawn_local` based
///   schedulers work.
///
/// Both flavors install a `tracing-subscriber` fmt subscriber that writes to
/// the captured test output.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);

  let raw_args = proc_macro2::TokenStream::from(attr);
  if !raw_args.is_empty() {
    return TokenStream::from(
      syn::Error::new(
        raw_args.span(),
        "rxlite_macro::test takes no arguments. Use #[rxlite_macro::test] on a sync or async fn.",
      )
      .to_compile_error(),
    );
  }

  let ItemFn { attrs, vis, sig, block } = input;
  let init_logging = quote! {
    let _ = ::tracing_subscriber::fmt()
      .with_test_writer()
      .with_max_level(::tracing::Level::TRACE)
      .try_init();
  };

  let expanded = if sig.asyncness.is_some() {
    quote! {
      #[::tokio::test(flavor = "current_thread")]
      #(#attrs)*
      #vis #sig {
        #init_logging
        ::tokio::task::LocalSet::new().run_until(async move #block).await
      }
    }
  } else {
    quote! {
      #[test]
      #(#attrs)*
      #vis #sig {
        #init_logging
        #block
      }
    }
  };

  TokenStream::from(expanded)
}
