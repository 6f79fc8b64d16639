use crate::SessionError;

/// Page location control. The browser implementation wraps
/// `window.location` and `window.history`.
pub trait Navigator {
    /// Current page URL.
    fn href(&self) -> String;

    /// Navigate to `url`, keeping the current page in history.
    fn assign(&self, url: &str) -> Result<(), SessionError>;

    /// Navigate to `url`, replacing the current history entry.
    fn replace(&self, url: &str) -> Result<(), SessionError>;

    /// Rewrite the address bar without loading anything.
    fn replace_state(&self, url: &str) -> Result<(), SessionError>;
}
