pub mod async_impl;
pub mod codec;
pub mod context;
pub mod error;
pub mod handler;
pub mod ident;
pub mod invoker;
pub mod registry;
pub mod sync_impl;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod validation;
