//! State parameter for CSRF protection during the authorization flow.
//!
//! The application stores the generated [`StateParam`] before redirecting the
//! user to the authorize URL and compares it with the `state` query parameter
//! of the callback.
//!
//! # Example
//!
//! ```rust
//! use spotify_api::auth::oauth::StateParam;
//!
//! let state = StateParam::new();
//! assert_eq!(state.as_ref().len(), 16);
//! assert!(state.matches(state.as_ref()));
//! assert!(!state.matches("forged"));
//! ```

use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

/// OAuth state parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateParam {
    value: String,
}

// Verify StateParam is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateParam>();
};

impl StateParam {
    /// Length of generated nonces.
    const NONCE_LENGTH: usize = 16;

    /// Creates a state parameter holding a random alphanumeric nonce.
    #[must_use]
    pub fn new() -> Self {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::NONCE_LENGTH)
            .map(char::from)
            .collect();

        Self { value: nonce }
    }

    /// Wraps a state value the application generated itself.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { value: raw.into() }
    }

    /// Returns `true` if the `state` received on the callback equals this one.
    #[must_use]
    pub fn matches(&self, received: &str) -> bool {
        self.value == received
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_16_char_alphanumeric_nonce() {
        let state = StateParam::new();

        assert_eq!(state.as_ref().len(), 16);
        assert!(state.as_ref().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_consecutive_states_differ() {
        assert_ne!(StateParam::new(), StateParam::new());
    }

    #[test]
    fn test_matches_is_exact() {
        let state = StateParam::from_raw("Ab12");
        assert_eq!(state.to_string(), "Ab12");
        assert!(state.matches("Ab12"));
        assert!(!state.matches("ab12"));
        assert!(!state.matches("Ab12 "));
        assert!(!state.matches(""));
    }
}
