//! Secure memory handling for sensitive data
//!
//! Passwords and API credentials live in [`SecureString`], which wipes its
//! buffer on drop and never prints its contents.

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string type that zeros its contents on drop
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString {
    inner: String,
}

impl SecureString {
    /// Create a new SecureString
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Get the string contents
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether the value is empty once surrounding whitespace is ignored
    pub fn is_blank(&self) -> bool {
        self.inner.trim().is_empty()
    }

    /// A copy with surrounding whitespace removed
    pub fn trimmed(&self) -> Self {
        Self::new(self.inner.trim())
    }

    /// Show only the first and last few characters, for confirmation output
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.inner.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 2..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl Deref for SecureString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<str> for SecureString {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("len", &self.inner.len())
            .finish()
    }
}

// Don't print the contents in Display output
impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_creation() {
        let s = SecureString::new("test");
        assert_eq!(s.as_str(), "test");
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_secure_string_conversions() {
        let from_string: SecureString = String::from("test").into();
        let from_str: SecureString = "test".into();
        assert_eq!(from_string, from_str);
    }

    #[test]
    fn test_secure_string_debug_and_display() {
        let s = SecureString::new("secret");
        let debug = format!("{:?}", s);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("SecureString"));

        let display = format!("{}", s);
        assert!(!display.contains("secret"));
        assert!(display.contains("REDACTED"));
    }

    #[test]
    fn test_blank_and_trimmed() {
        assert!(SecureString::new("   \n").is_blank());
        assert!(!SecureString::new(" x ").is_blank());
        assert_eq!(SecureString::new("  key \n").trimmed().as_str(), "key");
    }

    #[test]
    fn test_masked() {
        assert_eq!(SecureString::new("short").masked(), "*****");
        assert_eq!(SecureString::new("AIzaSyExample42").masked(), "AIza…42");
    }

    #[test]
    fn test_zeroize_clears_contents() {
        let mut s = SecureString::new("secret");
        s.zeroize();
        assert!(s.is_empty());
    }
}
