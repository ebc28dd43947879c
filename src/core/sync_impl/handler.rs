use std::any::type_name;

use crate::core::codec::Codec;
use crate::core::handler::{Binder, HandlerDescriptor, HandlerReturn, Param};
use crate::core::validation::{ParamDescriptor, Signature};

/// Anything that can be registered as a synchronous handler.
///
/// Implemented for functions and closures of up to eight parameters where
/// every parameter is a [`Param`] and the return type is a [`HandlerReturn`].
/// `M` is a marker naming the handler's shape; callers never spell it out.
pub trait IntoHandler<C: Codec, M>: Send + Sync + 'static {
    fn into_descriptor(self) -> HandlerDescriptor<C>;
}

macro_rules! impl_into_handler {
    ($($T:ident),*) => {
        impl<C, F, R, $($T,)*> IntoHandler<C, fn($($T,)*) -> R> for F
        where
            C: Codec,
            F: Fn($($T),*) -> R + Send + Sync + 'static,
            R: HandlerReturn + 'static,
            $($T: Param + 'static,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_descriptor(self) -> HandlerDescriptor<C> {
                let signature = Signature {
                    params: vec![$(ParamDescriptor::new(type_name::<$T>(), $T::KIND)),*],
                    returns: R::descriptor(),
                };
                let handler = self;
                HandlerDescriptor::from_raw(signature, move |ctx, codec, payloads| {
                    let mut binder = Binder::new(ctx, codec, payloads);
                    $(let $T = binder.bind::<$T>()?;)*
                    handler($($T),*).into_outcome()
                })
            }
        }
    };
}

impl_into_handler!();
impl_into_handler!(A1);
impl_into_handler!(A1, A2);
impl_into_handler!(A1, A2, A3);
impl_into_handler!(A1, A2, A3, A4);
impl_into_handler!(A1, A2, A3, A4, A5);
impl_into_handler!(A1, A2, A3, A4, A5, A6);
impl_into_handler!(A1, A2, A3, A4, A5, A6, A7);
impl_into_handler!(A1, A2, A3, A4, A5, A6, A7, A8);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::JsonCodec;
    use crate::core::context::Context;
    use crate::core::handler::Callable;
    use crate::core::validation::ParamKind;

    fn describe<F, M>(f: F) -> HandlerDescriptor<JsonCodec>
    where
        F: IntoHandler<JsonCodec, M>,
    {
        f.into_descriptor()
    }

    #[test]
    fn test_descriptor_captures_signature() {
        let d = describe(|_ctx: Context, _delta: i64| -> Result<i64, std::io::Error> { Ok(1) });
        let sig = d.signature();
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0].kind, ParamKind::Context);
        assert_eq!(sig.params[1].kind, ParamKind::Value);
        assert_eq!(sig.params[1].type_name, "i64");
        assert!(sig.returns.error);
        assert_eq!(sig.arity(), 1);
        assert!(!d.is_async());
    }

    #[test]
    fn test_zero_arg_handler() {
        let d = describe(|| {});
        assert!(d.signature().params.is_empty());
        assert!(!d.signature().returns.error);
    }

    #[test]
    fn test_thunk_binds_and_calls() {
        let d = describe(|a: String, b: u8| -> Result<(), String> {
            if a.len() == usize::from(b) {
                Ok(())
            } else {
                Err(format!("{} has no length {}", a, b))
            }
        });
        let Callable::Sync(thunk) = &d.callable else {
            panic!("expected a sync handler");
        };
        let ctx = Context::background();
        let ok: Vec<&[u8]> = vec![&br#""abc""#[..], &b"3"[..]];
        let bad: Vec<&[u8]> = vec![&br#""abc""#[..], &b"4"[..]];

        assert!(thunk(&ctx, &JsonCodec, &ok).is_ok());
        let err = thunk(&ctx, &JsonCodec, &bad).unwrap_err();
        assert_eq!(err.to_string(), "abc has no length 4");
    }

    fn plain_fn(a: i64, b: i64) -> i64 {
        a + b
    }

    #[test]
    fn test_plain_functions_register() {
        let d = describe(plain_fn);
        assert_eq!(d.signature().arity(), 2);
        assert_eq!(d.signature().returns.value, Some("i64"));
    }
}
