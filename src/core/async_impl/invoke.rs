use std::time::Instant;

use crate::core::async_impl::handler::IntoAsyncHandler;
use crate::core::codec::Codec;
use crate::core::context::Context;
use crate::core::error::Result;
use crate::core::handler::Callable;
use crate::core::invoker::Invoker;

impl<C: Codec> Invoker<C> {
    /// Registers an async `handler` under the durable id `fn_id`.
    ///
    /// Same rules and errors as [`register`](Invoker::register).
    pub fn register_async<F, M>(&self, fn_id: &str, handler: F) -> Result<()>
    where
        F: IntoAsyncHandler<C, M>,
    {
        self.register_descriptor(fn_id, handler.into_descriptor())
    }

    /// Registers an async `handler` under a generated single-use id.
    pub fn register_async_temperature<F, M>(&self, handler: F) -> Result<String>
    where
        F: IntoAsyncHandler<C, M>,
    {
        self.register_temperature_descriptor(handler.into_descriptor())
    }

    /// Async counterpart of [`invoke`](Invoker::invoke).
    ///
    /// Lookup, arity check and decoding happen before the first await point;
    /// async handlers are awaited, sync handlers run inline.
    pub async fn invoke_async<P: AsRef<[u8]>>(
        &self,
        ctx: &Context,
        fn_id: &str,
        payloads: &[P],
    ) -> Result<()> {
        let started = Instant::now();
        let payloads: Vec<&[u8]> = payloads.iter().map(AsRef::as_ref).collect();
        let count = payloads.len();
        let result = match self.prepare(fn_id, count) {
            Err(err) => Err(err),
            Ok(descriptor) => match &descriptor.callable {
                Callable::Sync(thunk) => thunk(ctx, &self.codec, &payloads),
                Callable::Async(thunk) => match thunk(ctx, &self.codec, &payloads) {
                    Ok(fut) => fut.await,
                    Err(err) => Err(err),
                },
            },
        };
        self.finish(fn_id, count, started, result)
    }
}
