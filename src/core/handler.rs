//! Type-erased handlers.
//!
//! Typed handlers are erased into a [`HandlerDescriptor`] when they are
//! registered: the declared [`Signature`] plus a thunk that binds payloads to
//! parameters and calls the handler. Parameter binding goes through [`Param`],
//! return values through [`HandlerReturn`].

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::codec::{Codec, CodecError};
use crate::core::context::Context;
use crate::core::error::{BoxError, Error, Result};
use crate::core::validation::{ParamKind, ReturnDescriptor, Signature};

/// Synchronous erased handler.
pub type SyncThunk<C> = dyn Fn(&Context, &C, &[&[u8]]) -> Result<()> + Send + Sync;

/// Asynchronous erased handler. Binding happens before the future is built,
/// so decode errors surface without polling.
pub type AsyncThunk<C> =
    dyn Fn(&Context, &C, &[&[u8]]) -> Result<BoxFuture<'static, Result<()>>> + Send + Sync;

/// A registered callable.
pub enum Callable<C> {
    Sync(Arc<SyncThunk<C>>),
    Async(Arc<AsyncThunk<C>>),
}

impl<C> Clone for Callable<C> {
    fn clone(&self) -> Self {
        match self {
            Callable::Sync(f) => Callable::Sync(f.clone()),
            Callable::Async(f) => Callable::Async(f.clone()),
        }
    }
}

/// A handler's signature and its bound invocation thunk.
pub struct HandlerDescriptor<C> {
    pub(crate) signature: Signature,
    pub(crate) callable: Callable<C>,
}

impl<C> Clone for HandlerDescriptor<C> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            callable: self.callable.clone(),
        }
    }
}

impl<C> fmt::Debug for HandlerDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("signature", &self.signature.to_string())
            .field("is_async", &self.is_async())
            .finish()
    }
}

impl<C> HandlerDescriptor<C> {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn is_async(&self) -> bool {
        matches!(self.callable, Callable::Async(_))
    }
}

impl<C: Codec> HandlerDescriptor<C> {
    /// Builds a descriptor by hand, for hosts that assemble handlers at runtime.
    ///
    /// The thunk receives exactly `signature.arity()` payloads; the
    /// descriptor goes through the same validation as typed handlers.
    pub fn from_raw<F>(signature: Signature, thunk: F) -> Self
    where
        F: Fn(&Context, &C, &[&[u8]]) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            signature,
            callable: Callable::Sync(Arc::new(thunk)),
        }
    }

    /// Async counterpart of [`HandlerDescriptor::from_raw`].
    pub fn from_raw_async<F>(signature: Signature, thunk: F) -> Self
    where
        F: Fn(&Context, &C, &[&[u8]]) -> Result<BoxFuture<'static, Result<()>>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            signature,
            callable: Callable::Async(Arc::new(thunk)),
        }
    }
}

/// A type that can fill one handler parameter.
///
/// Every `DeserializeOwned` type is decoded from its payload. [`Context`] is
/// injected from the caller instead, and only in the first slot.
pub trait Param: Sized {
    const KIND: ParamKind;

    fn from_context(_ctx: &Context) -> Option<Self> {
        None
    }

    fn decode<C: Codec>(codec: &C, payload: &[u8]) -> std::result::Result<Self, CodecError>;
}

impl<T: DeserializeOwned> Param for T {
    const KIND: ParamKind = ParamKind::Value;

    fn decode<C: Codec>(codec: &C, payload: &[u8]) -> std::result::Result<Self, CodecError> {
        codec.unmarshal(payload)
    }
}

impl Param for Context {
    const KIND: ParamKind = ParamKind::Context;

    fn from_context(ctx: &Context) -> Option<Self> {
        Some(ctx.clone())
    }

    fn decode<C: Codec>(_codec: &C, _payload: &[u8]) -> std::result::Result<Self, CodecError> {
        Err(CodecError::custom("a context is never decoded from a payload"))
    }
}

/// Binds payloads to parameters in declaration order.
///
/// Decode errors carry the parameter's position in the handler's signature,
/// counting an injected context.
pub(crate) struct Binder<'a, C> {
    ctx: &'a Context,
    codec: &'a C,
    payloads: &'a [&'a [u8]],
    slot: usize,
    next_payload: usize,
}

impl<'a, C: Codec> Binder<'a, C> {
    pub(crate) fn new(ctx: &'a Context, codec: &'a C, payloads: &'a [&'a [u8]]) -> Self {
        Self {
            ctx,
            codec,
            payloads,
            slot: 0,
            next_payload: 0,
        }
    }

    pub(crate) fn bind<T: Param>(&mut self) -> Result<T> {
        let slot = self.slot;
        self.slot += 1;

        if slot == 0 && T::KIND == ParamKind::Context {
            return T::from_context(self.ctx).ok_or_else(|| {
                Error::InvalidFunction(format!("{} cannot take a context", type_name::<T>()))
            });
        }

        let next = self.next_payload;
        let payload = self
            .payloads
            .get(next)
            .ok_or(Error::ArgCountMismatch {
                expected: next + 1,
                actual: self.payloads.len(),
            })?;
        self.next_payload += 1;
        T::decode(self.codec, payload).map_err(|source| Error::ArgDecode {
            index: slot,
            source,
        })
    }
}

/// What a handler may return.
///
/// `()` and plain values always succeed; their values are dropped. A
/// `Result` ends in an error slot, and its `Err` becomes the invocation's
/// error unchanged.
///
/// Plain values cover primitives, `String`, `serde_json::Value`, `Option`,
/// `Vec`, `HashMap` and tuples of up to eight elements. A handler producing
/// any other type, such as its own struct, returns it as `Result<T, E>`
/// instead; `Ok` values of every type are accepted and dropped.
pub trait HandlerReturn {
    fn descriptor() -> ReturnDescriptor;

    fn into_outcome(self) -> Result<()>;
}

impl HandlerReturn for () {
    fn descriptor() -> ReturnDescriptor {
        ReturnDescriptor::default()
    }

    fn into_outcome(self) -> Result<()> {
        Ok(())
    }
}

fn value_name<T>() -> Option<&'static str> {
    let name = type_name::<T>();
    (name != "()").then_some(name)
}

impl<T, E> HandlerReturn for std::result::Result<T, E>
where
    E: Into<BoxError>,
{
    fn descriptor() -> ReturnDescriptor {
        ReturnDescriptor {
            value: value_name::<T>(),
            error: true,
        }
    }

    fn into_outcome(self) -> Result<()> {
        self.map(drop).map_err(|err| Error::Handler(err.into()))
    }
}

macro_rules! impl_plain_return {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HandlerReturn for $ty {
                fn descriptor() -> ReturnDescriptor {
                    ReturnDescriptor {
                        value: Some(type_name::<$ty>()),
                        error: false,
                    }
                }

                fn into_outcome(self) -> Result<()> {
                    Ok(())
                }
            }
        )*
    };
}

impl_plain_return!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    serde_json::Value,
);

impl<T> HandlerReturn for Option<T> {
    fn descriptor() -> ReturnDescriptor {
        ReturnDescriptor {
            value: Some(type_name::<Option<T>>()),
            error: false,
        }
    }

    fn into_outcome(self) -> Result<()> {
        Ok(())
    }
}

impl<T> HandlerReturn for Vec<T> {
    fn descriptor() -> ReturnDescriptor {
        ReturnDescriptor {
            value: Some(type_name::<Vec<T>>()),
            error: false,
        }
    }

    fn into_outcome(self) -> Result<()> {
        Ok(())
    }
}

impl<K, V, S> HandlerReturn for HashMap<K, V, S> {
    fn descriptor() -> ReturnDescriptor {
        ReturnDescriptor {
            value: Some(type_name::<HashMap<K, V, S>>()),
            error: false,
        }
    }

    fn into_outcome(self) -> Result<()> {
        Ok(())
    }
}

macro_rules! impl_tuple_return {
    ($($T:ident),+) => {
        impl<$($T),+> HandlerReturn for ($($T,)+) {
            fn descriptor() -> ReturnDescriptor {
                ReturnDescriptor {
                    value: Some(type_name::<($($T,)+)>()),
                    error: false,
                }
            }

            fn into_outcome(self) -> Result<()> {
                Ok(())
            }
        }
    };
}

impl_tuple_return!(A1);
impl_tuple_return!(A1, A2);
impl_tuple_return!(A1, A2, A3);
impl_tuple_return!(A1, A2, A3, A4);
impl_tuple_return!(A1, A2, A3, A4, A5);
impl_tuple_return!(A1, A2, A3, A4, A5, A6);
impl_tuple_return!(A1, A2, A3, A4, A5, A6, A7);
impl_tuple_return!(A1, A2, A3, A4, A5, A6, A7, A8);

/// One value passed to `marshal_args`.
pub trait Arg {
    const IS_CONTEXT: bool = false;

    fn encode<C: Codec>(&self, codec: &C) -> std::result::Result<Vec<u8>, CodecError>;
}

impl<T: Serialize + ?Sized> Arg for T {
    fn encode<C: Codec>(&self, codec: &C) -> std::result::Result<Vec<u8>, CodecError> {
        codec.marshal(self)
    }
}

impl Arg for Context {
    const IS_CONTEXT: bool = true;

    fn encode<C: Codec>(&self, _codec: &C) -> std::result::Result<Vec<u8>, CodecError> {
        Err(CodecError::custom(
            "a context can only lead the argument list",
        ))
    }
}

/// An ordered list of arguments, encoded into payloads by `marshal_args`.
///
/// A [`Context`] in the first position is skipped, mirroring how the invoker
/// injects it instead of decoding it.
pub trait ArgList {
    fn encode_all<C: Codec>(&self, codec: &C) -> Result<Vec<Vec<u8>>>;
}

fn encode_at<T: Arg + ?Sized, C: Codec>(
    index: usize,
    arg: &T,
    codec: &C,
    out: &mut Vec<Vec<u8>>,
) -> Result<()> {
    if index == 0 && T::IS_CONTEXT {
        return Ok(());
    }
    let payload = arg
        .encode(codec)
        .map_err(|source| Error::ArgEncode { index, source })?;
    out.push(payload);
    Ok(())
}

impl ArgList for () {
    fn encode_all<C: Codec>(&self, _codec: &C) -> Result<Vec<Vec<u8>>> {
        Ok(Vec::new())
    }
}

impl<T: Arg> ArgList for [T] {
    fn encode_all<C: Codec>(&self, codec: &C) -> Result<Vec<Vec<u8>>> {
        let mut out = Vec::with_capacity(self.len());
        for (index, arg) in self.iter().enumerate() {
            encode_at(index, arg, codec, &mut out)?;
        }
        Ok(out)
    }
}

impl<T: Arg> ArgList for Vec<T> {
    fn encode_all<C: Codec>(&self, codec: &C) -> Result<Vec<Vec<u8>>> {
        self.as_slice().encode_all(codec)
    }
}

macro_rules! impl_arg_list {
    ($($T:ident),+) => {
        impl<$($T: Arg),+> ArgList for ($($T,)+) {
            #[allow(non_snake_case)]
            fn encode_all<C: Codec>(&self, codec: &C) -> Result<Vec<Vec<u8>>> {
                let ($($T,)+) = self;
                let mut out = Vec::new();
                let mut index = 0;
                $(
                    encode_at(index, $T, codec, &mut out)?;
                    index += 1;
                )+
                let _ = index;
                Ok(out)
            }
        }
    };
}

impl_arg_list!(A1);
impl_arg_list!(A1, A2);
impl_arg_list!(A1, A2, A3);
impl_arg_list!(A1, A2, A3, A4);
impl_arg_list!(A1, A2, A3, A4, A5);
impl_arg_list!(A1, A2, A3, A4, A5, A6);
impl_arg_list!(A1, A2, A3, A4, A5, A6, A7);
impl_arg_list!(A1, A2, A3, A4, A5, A6, A7, A8);
