use crate::core::codec::CodecError;
use thiserror::Error;

/// Boxed error type returned by handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can go wrong while registering or invoking a function.
#[derive(Debug, Error)]
pub enum Error {
    /// The handler's declared signature cannot be dispatched.
    #[error("invalid function: {0}")]
    InvalidFunction(String),

    /// A durable id is already taken; the existing entry is left untouched.
    #[error("function `{0}` is already registered")]
    DuplicatedFunction(String),

    /// No function under this id (never registered, or a consumed temperature id).
    #[error("function `{0}` does not exist")]
    NotExisted(String),

    #[error("args not match: want {expected} args, got {actual}")]
    ArgCountMismatch { expected: usize, actual: usize },

    /// `index` is the parameter's position in the handler's signature; a
    /// leading context counts as position 0.
    #[error("args not match: failed to decode arg no.{index}: {source}")]
    ArgDecode {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// Encoding an argument in `marshal_args` failed.
    #[error("failed to encode arg no.{index}: {source}")]
    ArgEncode {
        index: usize,
        #[source]
        source: CodecError,
    },

    /// A blocking `invoke` reached an async handler. The entry stays
    /// registered; call it through `invoke_async`.
    #[error("function `{0}` is async and must be called with invoke_async")]
    AsyncHandler(String),

    /// The error returned by the handler itself, passed through unchanged.
    #[error(transparent)]
    Handler(BoxError),
}

/// Flat classification of [`Error`], handy for matching in callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFunction,
    DuplicatedFunction,
    NotExisted,
    ArgsNotMatch,
    ArgEncode,
    AsyncHandler,
    Handler,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidFunction(_) => ErrorKind::InvalidFunction,
            Error::DuplicatedFunction(_) => ErrorKind::DuplicatedFunction,
            Error::NotExisted(_) => ErrorKind::NotExisted,
            Error::ArgCountMismatch { .. } | Error::ArgDecode { .. } => ErrorKind::ArgsNotMatch,
            Error::ArgEncode { .. } => ErrorKind::ArgEncode,
            Error::AsyncHandler(_) => ErrorKind::AsyncHandler,
            Error::Handler(_) => ErrorKind::Handler,
        }
    }

    /// The handler's own error, if this is one.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Handler(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Downcasts the handler's own error to a concrete type.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.handler_error()?.downcast_ref::<E>()
    }

    /// Walks the handler error and its `source()` chain looking for an `E`.
    ///
    /// Lets callers check for a sentinel error that the handler wrapped
    /// before returning it.
    pub fn find_cause<E: std::error::Error + 'static>(&self) -> Option<&E> {
        let first: &(dyn std::error::Error + 'static) = self.handler_error()?;
        let mut current = Some(first);
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn handler<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Handler(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
