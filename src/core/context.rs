//! Invocation context.
//!
//! A [`Context`] is handed to a handler directly when the handler's first
//! parameter is a `Context`; it is never decoded from a payload. It carries
//! type-keyed values and a cancellation signal, both inherited by children.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

type ValueMap = anymap::Map<dyn anymap::any::Any + Send + Sync>;

struct ContextNode {
    parent: Option<Context>,
    values: ValueMap,
    cancelled: Option<Arc<AtomicBool>>,
}

/// Cheaply clonable, immutable handle passed down to handlers.
#[derive(Clone)]
pub struct Context {
    node: Arc<ContextNode>,
}

impl Context {
    /// The empty root context: no values, never cancelled.
    pub fn background() -> Self {
        Self {
            node: Arc::new(ContextNode {
                parent: None,
                values: ValueMap::new(),
                cancelled: None,
            }),
        }
    }

    /// Returns a child context carrying `value`.
    ///
    /// Values are keyed by type; a child's value shadows one of the same
    /// type further up the chain.
    pub fn with_value<T: Send + Sync + 'static>(&self, value: T) -> Self {
        let mut values = ValueMap::new();
        values.insert(value);
        Self {
            node: Arc::new(ContextNode {
                parent: Some(self.clone()),
                values,
                cancelled: None,
            }),
        }
    }

    /// Returns a cancellable child context and the handle that cancels it.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = Self {
            node: Arc::new(ContextNode {
                parent: Some(self.clone()),
                values: ValueMap::new(),
                cancelled: Some(flag.clone()),
            }),
        };
        (ctx, CancelHandle { flag })
    }

    /// Looks up the nearest value of type `T`.
    pub fn value<T: Send + Sync + 'static>(&self) -> Option<&T> {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if let Some(value) = ctx.node.values.get::<T>() {
                return Some(value);
            }
            current = ctx.node.parent.as_ref();
        }
        None
    }

    /// True once this context or any ancestor has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if let Some(flag) = &ctx.node.cancelled {
                if flag.load(Ordering::Acquire) {
                    return true;
                }
            }
            current = ctx.node.parent.as_ref();
        }
        false
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Cancels the context returned alongside it by [`Context::with_cancel`].
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}
