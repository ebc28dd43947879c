use std::any::type_name;
use std::future::Future;

use futures::FutureExt;

use crate::core::codec::Codec;
use crate::core::handler::{Binder, HandlerDescriptor, HandlerReturn, Param};
use crate::core::validation::{ParamDescriptor, Signature};

/// Anything that can be registered as an asynchronous handler.
///
/// Same parameter rules as [`IntoHandler`](crate::IntoHandler), but the
/// handler returns a future whose output is a [`HandlerReturn`]. Arguments
/// are decoded before the handler is called, so a decode failure never
/// creates the future.
pub trait IntoAsyncHandler<C: Codec, M>: Send + Sync + 'static {
    fn into_descriptor(self) -> HandlerDescriptor<C>;
}

macro_rules! impl_into_async_handler {
    ($($T:ident),*) => {
        impl<C, F, Fut, R, $($T,)*> IntoAsyncHandler<C, fn($($T,)*) -> Fut> for F
        where
            C: Codec,
            F: Fn($($T),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
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
                HandlerDescriptor::from_raw_async(signature, move |ctx, codec, payloads| {
                    let mut binder = Binder::new(ctx, codec, payloads);
                    $(let $T = binder.bind::<$T>()?;)*
                    Ok(handler($($T),*).map(HandlerReturn::into_outcome).boxed())
                })
            }
        }
    };
}

impl_into_async_handler!();
impl_into_async_handler!(A1);
impl_into_async_handler!(A1, A2);
impl_into_async_handler!(A1, A2, A3);
impl_into_async_handler!(A1, A2, A3, A4);
impl_into_async_handler!(A1, A2, A3, A4, A5);
impl_into_async_handler!(A1, A2, A3, A4, A5, A6);
impl_into_async_handler!(A1, A2, A3, A4, A5, A6, A7);
impl_into_async_handler!(A1, A2, A3, A4, A5, A6, A7, A8);
