//! Function id conventions.
//!
//! Ids starting with one of [`TEMPERATURE_PREFIXES`] are temperature ids:
//! generated by the invoker, single use, and removed by the invocation that
//! looks them up. Every other id is durable. Anything that generates or routes
//! ids has to follow the same convention.

/// Prefix used for ids generated by `register_temperature`.
pub const TEMPERATURE_PREFIX: &str = "tmp-";

/// All prefixes recognised as temperature ids.
pub const TEMPERATURE_PREFIXES: [&str; 2] = [TEMPERATURE_PREFIX, "temp-"];

/// Returns true if `fn_id` names a single-use temperature function.
pub fn is_temperature_id(fn_id: &str) -> bool {
    TEMPERATURE_PREFIXES
        .iter()
        .any(|prefix| fn_id.starts_with(prefix))
}

/// Generates a fresh temperature id: the prefix plus 32 hex chars of a v4 UUID.
pub fn new_temperature_id() -> String {
    format!("{}{}", TEMPERATURE_PREFIX, uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_prefixes() {
        assert!(is_temperature_id("tmp-abc"));
        assert!(is_temperature_id("temp-abc"));
        assert!(is_temperature_id("tmp-"));
        assert!(!is_temperature_id("fn1"));
        assert!(!is_temperature_id("tmpfn"));
        assert!(!is_temperature_id("my-tmp-fn"));
        assert!(!is_temperature_id(""));
    }

    #[test]
    fn test_generated_ids_are_temperature_ids() {
        let id = new_temperature_id();
        assert!(is_temperature_id(&id));
        assert_eq!(id.len(), TEMPERATURE_PREFIX.len() + 32);
        assert!(
            id[TEMPERATURE_PREFIX.len()..]
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(new_temperature_id(), new_temperature_id());
    }
}
