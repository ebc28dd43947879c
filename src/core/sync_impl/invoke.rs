use std::time::Instant;

use crate::core::codec::Codec;
use crate::core::context::Context;
use crate::core::error::{Error, Result};
use crate::core::handler::Callable;
use crate::core::invoker::Invoker;
use crate::core::sync_impl::handler::IntoHandler;
use crate::core::validation::{Signature, validate};

impl<C: Codec> Invoker<C> {
    /// Registers `handler` under the durable id `fn_id`.
    ///
    /// # Errors
    /// * `InvalidFunction` if a `Context` parameter appears anywhere but first
    /// * `DuplicatedFunction` if `fn_id` is already registered; the existing
    ///   handler stays in place
    pub fn register<F, M>(&self, fn_id: &str, handler: F) -> Result<()>
    where
        F: IntoHandler<C, M>,
    {
        self.register_descriptor(fn_id, handler.into_descriptor())
    }

    /// Registers `handler` under a freshly generated temperature id and returns it.
    ///
    /// The first invocation of that id removes it; later ones fail with
    /// `NotExisted`.
    pub fn register_temperature<F, M>(&self, handler: F) -> Result<String>
    where
        F: IntoHandler<C, M>,
    {
        self.register_temperature_descriptor(handler.into_descriptor())
    }

    /// Checks whether `handler` could be registered, without registering it.
    pub fn validate_handler<F, M>(handler: F) -> Result<Signature>
    where
        F: IntoHandler<C, M>,
    {
        let descriptor = handler.into_descriptor();
        validate(&descriptor.signature)?;
        Ok(descriptor.signature)
    }

    /// Invokes the handler registered under `fn_id`.
    ///
    /// `ctx` fills a leading `Context` parameter; every other parameter is
    /// decoded, in order, from the matching entry of `payloads`. The call runs
    /// on the current thread and blocks until the handler returns.
    ///
    /// Only sync handlers run here. Blocking on an async handler could stall
    /// the runtime its futures depend on, so those are refused and left
    /// registered, temperature ids included; use
    /// [`invoke_async`](Invoker::invoke_async) for them.
    ///
    /// Returns the handler's own error unchanged if it fails, `Ok(())` if it
    /// succeeds or declares no error. Any other return value is dropped.
    ///
    /// # Errors
    /// * `NotExisted` if nothing is registered under `fn_id`, including a
    ///   temperature id that was already invoked
    /// * `ArgsNotMatch` if the payload count is wrong or a payload fails to
    ///   decode; the handler is not called
    /// * `AsyncHandler` if `fn_id` names an async handler
    pub fn invoke<P: AsRef<[u8]>>(&self, ctx: &Context, fn_id: &str, payloads: &[P]) -> Result<()> {
        let started = Instant::now();
        let payloads: Vec<&[u8]> = payloads.iter().map(AsRef::as_ref).collect();
        let result = self.call(ctx, fn_id, &payloads);
        self.finish(fn_id, payloads.len(), started, result)
    }

    fn call(&self, ctx: &Context, fn_id: &str, payloads: &[&[u8]]) -> Result<()> {
        let descriptor = self.prepare_blocking(fn_id, payloads.len())?;
        match &descriptor.callable {
            Callable::Sync(thunk) => thunk(ctx, &self.codec, payloads),
            Callable::Async(_) => Err(Error::AsyncHandler(fn_id.to_string())),
        }
    }
}
