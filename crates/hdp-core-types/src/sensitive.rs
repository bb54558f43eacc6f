//! Sensitive data marker for automatic redaction
//!
//! The operator signing key travels through configuration and the ledger
//! boundary wrapped in `Sensitive<T>`, so it can never end up in a log line,
//! an error message, or a serialized config file by accident.

use std::fmt;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use hdp_core_types::Sensitive;
///
/// let key = Sensitive::new("302e020100300506032b657004220420");
/// assert_eq!(format!("{:?}", key), "***REDACTED***");
/// assert_eq!(format!("{}", key), "***REDACTED***");
///
/// assert_eq!(key.expose(), &"302e020100300506032b657004220420");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    ///
    /// Only the ledger client should need this, at signing time.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let key = Sensitive::new("operator-private-key");
        let debug_str = format!("{:?}", key);
        assert_eq!(debug_str, "***REDACTED***");
        assert!(!debug_str.contains("operator-private-key"));
    }

    #[test]
    fn test_display_is_redacted() {
        let key = Sensitive::new(String::from("abc123"));
        assert_eq!(format!("{}", key), "***REDACTED***");
    }

    #[test]
    fn test_expose_and_into_inner() {
        let key = Sensitive::new(String::from("k"));
        assert_eq!(key.expose(), "k");
        assert_eq!(key.into_inner(), "k");
    }

    #[test]
    fn test_redacted_inside_struct_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Operator {
            account: String,
            key: Sensitive<String>,
        }

        let op = Operator {
            account: "0.0.1234".to_string(),
            key: Sensitive::new("secret-key".to_string()),
        };

        let debug_str = format!("{:?}", op);
        assert!(debug_str.contains("0.0.1234"));
        assert!(debug_str.contains("***REDACTED***"));
        assert!(!debug_str.contains("secret-key"));
    }
}
