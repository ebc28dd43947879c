//! # Switchboard
//!
//! A typed function dispatch registry: register handlers under string ids,
//! then invoke them by id with arguments supplied as encoded byte payloads.
//!
//! ## Features
//!
//! - **Typed Handlers, Erased Registry**: Plain functions and closures are registered as-is;
//!   argument types are checked by the compiler and captured once, at registration
//! - **Pluggable Codecs**: Payloads are decoded through a [`Codec`]; [`JsonCodec`] is the default
//! - **Context Injection**: A leading [`Context`] parameter receives the caller's context instead of a payload
//! - **Temperature Ids**: Single-use handlers under generated ids, removed by the invocation that consumes them
//! - **Sync & Async Support**: Synchronous handlers and handlers returning futures share one registry
//! - **Optional Telemetry**: Per-invocation traces (feature-gated)
//!
//! ## Quick Start
//!
//! ```rust
//! use switchboard::prelude::*;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("negative delta")]
//! struct NegativeDelta;
//!
//! let invoker = Invoker::new(JsonCodec);
//!
//! invoker
//!     .register("add", |delta: i64| -> Result<i64, NegativeDelta> {
//!         if delta < 0 { Err(NegativeDelta) } else { Ok(delta) }
//!     })
//!     .unwrap();
//!
//! let ctx = Context::background();
//! assert!(invoker.invoke(&ctx, "add", &[b"2"]).is_ok());
//!
//! let err = invoker.invoke(&ctx, "add", &[b"-1"]).unwrap_err();
//! assert!(err.downcast_ref::<NegativeDelta>().is_some());
//!
//! let err = invoker.invoke(&ctx, "add", &[br#""asd""#]).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ArgsNotMatch);
//! ```
//!
//! ## Module Organization
//!
//! - [`codec`]: The [`Codec`] trait and the JSON codec
//! - [`context`]: The [`Context`] handed to handlers
//! - [`ident`]: Temperature id conventions
//! - [`validation`]: Handler signatures and their validation
//! - [`prelude`]: Commonly used types and traits (import with `use switchboard::prelude::*`)

// ============================================================================
// Core Module
// ============================================================================

mod core;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

pub use crate::core::codec;
pub use crate::core::context;
pub use crate::core::ident;
pub use crate::core::validation;

pub use crate::core::codec::{Codec, CodecError, JsonCodec};
pub use crate::core::context::{CancelHandle, Context};
pub use crate::core::error::{BoxError, Error, ErrorKind, Result};
pub use crate::core::handler::{Arg, ArgList, Callable, HandlerDescriptor, HandlerReturn, Param};
pub use crate::core::ident::{TEMPERATURE_PREFIX, TEMPERATURE_PREFIXES, is_temperature_id};
pub use crate::core::invoker::{Invoker, NO_PAYLOADS};
pub use crate::core::registry::FunctionRegistry;
pub use crate::core::validation::{ParamDescriptor, ParamKind, ReturnDescriptor, Signature};

// Synchronous handlers
pub use crate::core::sync_impl::handler::IntoHandler;

// Asynchronous handlers
pub use crate::core::async_impl::handler::IntoAsyncHandler;

// ============================================================================
// Prelude Module - Convenient Bulk Imports
// ============================================================================

/// The main prelude: imports everything needed to register and invoke handlers.
///
/// # Example
/// ```rust
/// use switchboard::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        Codec, Context, Error, ErrorKind, IntoAsyncHandler, IntoHandler, Invoker, JsonCodec,
        NO_PAYLOADS, is_temperature_id,
    };
}

// ============================================================================
// Telemetry Feature
// ============================================================================

#[cfg(feature = "telemetry")]
pub use crate::core::telemetry::{InvocationTrace, MemoryTelemetry, Outcome, Telemetry};

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
