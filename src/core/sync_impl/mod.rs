//! Synchronous handlers.
//!
//! - [`IntoHandler`](handler::IntoHandler) erases plain functions and closures
//!   into handler descriptors
//! - `Invoker::register`, `Invoker::register_temperature` and
//!   `Invoker::invoke` run them on the caller's thread

pub mod handler;
mod invoke;
