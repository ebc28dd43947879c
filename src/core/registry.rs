//! Concurrent id → handler map.
//!
//! Backed by a [`DashMap`] so registration and lookup never take a global
//! lock. Insert-if-absent goes through the entry API and destructive lookup
//! through `remove`, each a single step on one shard. Lookups hand out a clone
//! of the entry, so no shard lock is held while a handler runs.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::core::error::{Error, Result};
use crate::core::handler::HandlerDescriptor;
use crate::core::ident::{is_temperature_id, new_temperature_id};

pub struct FunctionRegistry<C> {
    entries: DashMap<String, HandlerDescriptor<C>>,
}

impl<C> FunctionRegistry<C> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Inserts `descriptor` only if `fn_id` is free.
    ///
    /// Returns false, leaving the existing entry untouched, if it is taken.
    pub fn insert_if_absent(&self, fn_id: &str, descriptor: HandlerDescriptor<C>) -> bool {
        match self.entries.entry(fn_id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
                true
            }
        }
    }

    /// Inserts under a freshly generated temperature id, retrying on collision.
    pub fn insert_temperature(&self, descriptor: HandlerDescriptor<C>) -> String {
        loop {
            let fn_id = new_temperature_id();
            match self.entries.entry(fn_id) {
                Entry::Occupied(slot) => {
                    log::warn!("temperature id {} collided, generating another", slot.key());
                }
                Entry::Vacant(slot) => {
                    let fn_id = slot.key().clone();
                    slot.insert(descriptor);
                    return fn_id;
                }
            }
        }
    }

    /// Resolves `fn_id` for an invocation.
    ///
    /// Durable ids stay registered; temperature ids are removed by the lookup,
    /// so at most one caller ever gets a given temperature entry.
    pub fn resolve(&self, fn_id: &str) -> Option<HandlerDescriptor<C>> {
        if is_temperature_id(fn_id) {
            self.entries.remove(fn_id).map(|(_, descriptor)| descriptor)
        } else {
            self.entries.get(fn_id).map(|entry| entry.value().clone())
        }
    }

    /// Resolves `fn_id` for a blocking invocation, which only runs sync handlers.
    ///
    /// An async entry is never removed, temperature id or not, and is reported
    /// as `AsyncHandler` so the caller can retry with `invoke_async`.
    pub fn resolve_sync(&self, fn_id: &str) -> Result<HandlerDescriptor<C>> {
        let found = if is_temperature_id(fn_id) {
            self.entries
                .remove_if(fn_id, |_, descriptor| !descriptor.is_async())
                .map(|(_, descriptor)| descriptor)
        } else {
            self.entries
                .get(fn_id)
                .filter(|entry| !entry.value().is_async())
                .map(|entry| entry.value().clone())
        };
        match found {
            Some(descriptor) => Ok(descriptor),
            None if self.contains(fn_id) => Err(Error::AsyncHandler(fn_id.to_string())),
            None => Err(Error::NotExisted(fn_id.to_string())),
        }
    }

    /// Non-destructive lookup for either kind of id.
    pub fn peek(&self, fn_id: &str) -> Option<HandlerDescriptor<C>> {
        self.entries.get(fn_id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, fn_id: &str) -> bool {
        self.entries.contains_key(fn_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C> Default for FunctionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec::JsonCodec;
    use crate::core::ident::TEMPERATURE_PREFIX;
    use crate::core::validation::Signature;
    use futures::future::BoxFuture;

    fn noop() -> HandlerDescriptor<JsonCodec> {
        HandlerDescriptor::from_raw(Signature::default(), |_, _, _| Ok(()))
    }

    #[test]
    fn test_insert_if_absent() {
        let registry = FunctionRegistry::new();
        assert!(registry.insert_if_absent("fn1", noop()));
        assert!(!registry.insert_if_absent("fn1", noop()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_durable_lookup_is_repeatable() {
        let registry = FunctionRegistry::new();
        registry.insert_if_absent("fn1", noop());
        assert!(registry.resolve("fn1").is_some());
        assert!(registry.resolve("fn1").is_some());
        assert!(registry.contains("fn1"));
    }

    #[test]
    fn test_temperature_lookup_consumes() {
        let registry = FunctionRegistry::new();
        let fn_id = registry.insert_temperature(noop());
        assert!(fn_id.starts_with(TEMPERATURE_PREFIX));

        assert!(registry.peek(&fn_id).is_some());
        assert!(registry.resolve(&fn_id).is_some());
        assert!(registry.resolve(&fn_id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_sync_leaves_async_entries() {
        let registry = FunctionRegistry::new();
        let asynchronous = || -> HandlerDescriptor<JsonCodec> {
            HandlerDescriptor::from_raw_async(Signature::default(), |_, _, _| {
                let fut: BoxFuture<'static, Result<()>> = Box::pin(async { Ok::<(), Error>(()) });
                Ok(fut)
            })
        };
        registry.insert_if_absent("job", asynchronous());
        let fn_id = registry.insert_temperature(asynchronous());

        let err = registry.resolve_sync(&fn_id).unwrap_err();
        assert!(matches!(err, Error::AsyncHandler(ref id) if *id == fn_id));
        assert!(registry.contains(&fn_id));
        assert!(matches!(registry.resolve_sync("job"), Err(Error::AsyncHandler(_))));
        assert!(matches!(registry.resolve_sync("nope"), Err(Error::NotExisted(_))));

        let sync_id = registry.insert_temperature(noop());
        assert!(registry.resolve_sync(&sync_id).is_ok());
        assert!(!registry.contains(&sync_id));
        assert!(registry.resolve(&fn_id).is_some());
    }

    #[test]
    fn test_caller_chosen_temperature_id_is_single_use() {
        let registry = FunctionRegistry::new();
        registry.insert_if_absent("temp-job-42", noop());
        assert!(registry.resolve("temp-job-42").is_some());
        assert!(registry.resolve("temp-job-42").is_none());
    }

    #[test]
    fn test_missing_id() {
        let registry: FunctionRegistry<JsonCodec> = FunctionRegistry::new();
        assert!(registry.resolve("nope").is_none());
        assert!(registry.resolve("tmp-nope").is_none());
    }
}
