//! The [`Invoker`]: an owned registry of handlers plus the codec used to
//! decode their arguments.
//!
//! Registration lives here; the invocation paths are split between
//! `sync_impl` and `async_impl`.

#[cfg(feature = "telemetry")]
use std::sync::Arc;
use std::time::Instant;

use crate::core::codec::{Codec, JsonCodec};
use crate::core::error::{Error, Result};
use crate::core::handler::{ArgList, HandlerDescriptor};
use crate::core::ident::is_temperature_id;
use crate::core::registry::FunctionRegistry;
#[cfg(feature = "telemetry")]
use crate::core::telemetry::{InvocationTrace, Telemetry};
use crate::core::validation::{Signature, validate};

/// Empty payload list, for invoking handlers that take no encoded arguments.
pub const NO_PAYLOADS: &[&[u8]] = &[];

/// Registers handlers under string ids and invokes them with encoded arguments.
///
/// Handlers registered under a durable id can be invoked any number of times,
/// concurrently. Handlers registered with
/// [`register_temperature`](Invoker::register_temperature) get a generated id
/// and can be invoked once.
pub struct Invoker<C = JsonCodec> {
    pub(crate) registry: FunctionRegistry<C>,
    pub(crate) codec: C,
    #[cfg(feature = "telemetry")]
    pub(crate) telemetry: Option<Arc<dyn Telemetry>>,
}

impl<C: Codec> Invoker<C> {
    pub fn new(codec: C) -> Self {
        Self {
            registry: FunctionRegistry::new(),
            codec,
            #[cfg(feature = "telemetry")]
            telemetry: None,
        }
    }

    /// Records one [`InvocationTrace`] per invocation into `telemetry`.
    #[cfg(feature = "telemetry")]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Registers a handler descriptor under a durable id.
    ///
    /// Fails with `InvalidFunction` if the signature cannot be dispatched and
    /// with `DuplicatedFunction` if the id is taken.
    pub fn register_descriptor(&self, fn_id: &str, descriptor: HandlerDescriptor<C>) -> Result<()> {
        validate(&descriptor.signature)?;
        let signature = descriptor.signature.to_string();
        if !self.registry.insert_if_absent(fn_id, descriptor) {
            return Err(Error::DuplicatedFunction(fn_id.to_string()));
        }
        log::debug!("registered {} as {}", fn_id, signature);
        Ok(())
    }

    /// Registers a handler descriptor under a generated single-use id.
    pub fn register_temperature_descriptor(&self, descriptor: HandlerDescriptor<C>) -> Result<String> {
        validate(&descriptor.signature)?;
        let signature = descriptor.signature.to_string();
        let fn_id = self.registry.insert_temperature(descriptor);
        log::debug!("registered temperature {} as {}", fn_id, signature);
        Ok(fn_id)
    }

    /// Encodes `args` into the payload list `invoke` expects.
    ///
    /// A leading [`Context`](crate::Context) is skipped, so the argument list can mirror the
    /// handler's own parameter list.
    pub fn marshal_args<A: ArgList + ?Sized>(&self, args: &A) -> Result<Vec<Vec<u8>>> {
        args.encode_all(&self.codec)
    }

    /// True if `fn_id` is currently registered. Never consumes a temperature id.
    pub fn contains(&self, fn_id: &str) -> bool {
        self.registry.contains(fn_id)
    }

    /// The registered signature of `fn_id`. Never consumes a temperature id.
    pub fn signature(&self, fn_id: &str) -> Option<Signature> {
        self.registry.peek(fn_id).map(|d| d.signature)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Looks up `fn_id` and checks the payload count against its arity.
    ///
    /// A temperature entry is consumed by the lookup even if the count is wrong.
    pub(crate) fn prepare(&self, fn_id: &str, payload_count: usize) -> Result<HandlerDescriptor<C>> {
        let descriptor = self
            .registry
            .resolve(fn_id)
            .ok_or_else(|| Error::NotExisted(fn_id.to_string()))?;
        Self::check_arity(descriptor, payload_count)
    }

    /// [`prepare`](Invoker::prepare) for the blocking path: async handlers are
    /// refused with `AsyncHandler` and stay registered.
    pub(crate) fn prepare_blocking(
        &self,
        fn_id: &str,
        payload_count: usize,
    ) -> Result<HandlerDescriptor<C>> {
        let descriptor = self.registry.resolve_sync(fn_id)?;
        Self::check_arity(descriptor, payload_count)
    }

    fn check_arity(descriptor: HandlerDescriptor<C>, payload_count: usize) -> Result<HandlerDescriptor<C>> {
        let expected = descriptor.signature.arity();
        if expected != payload_count {
            return Err(Error::ArgCountMismatch {
                expected,
                actual: payload_count,
            });
        }
        Ok(descriptor)
    }

    /// Logs the outcome and, with the `telemetry` feature, records a trace.
    pub(crate) fn finish(
        &self,
        fn_id: &str,
        payload_count: usize,
        started: Instant,
        result: Result<()>,
    ) -> Result<()> {
        match &result {
            Ok(()) => log::trace!(
                "invoked {} {} ({:?})",
                Self::temperature(fn_id),
                fn_id,
                started.elapsed()
            ),
            Err(err) => log::trace!(
                "invoked {} {} ({:?}): {}",
                Self::temperature(fn_id),
                fn_id,
                started.elapsed(),
                err
            ),
        }

        #[cfg(feature = "telemetry")]
        if let Some(telemetry) = &self.telemetry {
            telemetry.record(InvocationTrace::new(
                fn_id,
                is_temperature_id(fn_id),
                payload_count,
                started.elapsed(),
                &result,
            ));
        }
        #[cfg(not(feature = "telemetry"))]
        let _ = payload_count;

        result
    }

    pub(crate) fn temperature(fn_id: &str) -> &'static str {
        if is_temperature_id(fn_id) {
            "temperature"
        } else {
            "durable"
        }
    }
}

impl Default for Invoker<JsonCodec> {
    fn default() -> Self {
        Self::new(JsonCodec)
    }
}

impl<C> std::fmt::Debug for Invoker<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("functions", &self.registry.len())
            .finish_non_exhaustive()
    }
}
