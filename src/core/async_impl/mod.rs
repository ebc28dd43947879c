//! Asynchronous handlers.
//!
//! - [`IntoAsyncHandler`](handler::IntoAsyncHandler) erases closures that
//!   return futures
//! - `Invoker::register_async`, `Invoker::register_async_temperature` and
//!   `Invoker::invoke_async` register and await them

pub mod handler;
mod invoke;
