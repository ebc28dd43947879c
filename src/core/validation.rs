use crate::core::error::{Error, Result};
use std::fmt;

/// How an argument slot is filled at invocation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Injected from the caller's [`Context`](crate::Context), never decoded.
    Context,
    /// Decoded from the matching payload.
    Value,
    /// A trait-object-like slot whose concrete type is unknown, so it cannot be decoded.
    Opaque,
}

/// One declared parameter of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub type_name: &'static str,
    pub kind: ParamKind,
}

impl ParamDescriptor {
    pub fn new(type_name: &'static str, kind: ParamKind) -> Self {
        Self { type_name, kind }
    }
}

/// What a handler returns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReturnDescriptor {
    /// Type of the (discarded) success value, `None` for `()`.
    pub value: Option<&'static str>,
    /// Whether the handler's result ends in an error slot.
    pub error: bool,
}

/// The declared shape of a handler, captured once at registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<ParamDescriptor>,
    pub returns: ReturnDescriptor,
}

impl Signature {
    /// True if the first parameter takes the invocation context.
    pub fn takes_context(&self) -> bool {
        matches!(self.params.first(), Some(p) if p.kind == ParamKind::Context)
    }

    /// Number of payloads an invocation must supply.
    pub fn arity(&self) -> usize {
        self.params.len() - usize::from(self.takes_context())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.type_name)?;
        }
        write!(f, ")")?;
        match (self.returns.value, self.returns.error) {
            (None, false) => Ok(()),
            (Some(value), false) => write!(f, " -> {}", value),
            (value, true) => write!(f, " -> Result<{}, _>", value.unwrap_or("()")),
        }
    }
}

/// Rejects signatures the invoker cannot dispatch.
///
/// Only the first parameter may take the context; a context anywhere else is
/// treated like any other undecodable slot. Return types are not checked.
pub fn validate(signature: &Signature) -> Result<()> {
    for (i, param) in signature.params.iter().enumerate() {
        match param.kind {
            ParamKind::Value => {}
            ParamKind::Context if i == 0 => {}
            ParamKind::Context | ParamKind::Opaque => {
                return Err(Error::InvalidFunction(format!(
                    "arg no.{} (type = {}) is not supported",
                    i, param.type_name
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn param(kind: ParamKind) -> ParamDescriptor {
        ParamDescriptor::new("T", kind)
    }

    fn sig(kinds: &[ParamKind]) -> Signature {
        Signature {
            params: kinds.iter().copied().map(param).collect(),
            returns: ReturnDescriptor::default(),
        }
    }

    #[test]
    fn test_values_and_leading_context_are_valid() {
        assert!(validate(&sig(&[])).is_ok());
        assert!(validate(&sig(&[ParamKind::Value, ParamKind::Value])).is_ok());
        assert!(validate(&sig(&[ParamKind::Context, ParamKind::Value])).is_ok());
    }

    #[test]
    fn test_opaque_param_is_rejected() {
        let err = validate(&sig(&[ParamKind::Value, ParamKind::Opaque])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFunction);
        assert!(err.to_string().contains("arg no.1"));
    }

    #[test]
    fn test_context_only_allowed_first() {
        let err = validate(&sig(&[ParamKind::Value, ParamKind::Context])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFunction);

        let err = validate(&sig(&[ParamKind::Context, ParamKind::Context])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFunction);
    }

    #[test]
    fn test_arity_excludes_leading_context() {
        assert_eq!(sig(&[]).arity(), 0);
        assert_eq!(sig(&[ParamKind::Context]).arity(), 0);
        assert_eq!(sig(&[ParamKind::Context, ParamKind::Value]).arity(), 1);
        assert_eq!(sig(&[ParamKind::Value, ParamKind::Value]).arity(), 2);
    }

    #[test]
    fn test_display() {
        let mut s = Signature {
            params: vec![
                ParamDescriptor::new("Context", ParamKind::Context),
                ParamDescriptor::new("i64", ParamKind::Value),
            ],
            returns: ReturnDescriptor {
                value: Some("i64"),
                error: true,
            },
        };
        assert_eq!(s.to_string(), "fn(Context, i64) -> Result<i64, _>");
        s.returns = ReturnDescriptor::default();
        assert_eq!(s.to_string(), "fn(Context, i64)");
    }
}
