//! Password handling.
//!
//! Passwords are kept behind `secrecy` so they never end up in debug
//! output and are zeroized when released. [`PasswordSet`] collects every
//! password entered during a run so decryption can retry each one in
//! order before asking the user again.

use secrecy::{ExposeSecret, SecretBox};

/// A single password, wiped on drop.
pub struct Password {
    inner: SecretBox<Vec<u8>>,
}

impl Password {
    /// Wraps a password string.
    #[must_use]
    pub fn new(password: &str) -> Self {
        Self { inner: SecretBox::new(Box::new(password.as_bytes().to_vec())) }
    }

    /// Exposes the raw password bytes for key derivation.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Password length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// True for a zero-length password.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Password([... {} bytes ...])", self.len())
    }
}

/// The passwords collected over one run, in entry order.
#[derive(Default)]
pub struct PasswordSet {
    passwords: Vec<Password>,
}

impl PasswordSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a password and returns a reference to it.
    pub fn add(&mut self, password: Password) -> &Password {
        self.passwords.push(password);
        self.passwords.last().expect("just pushed")
    }

    /// The first password entered, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Password> {
        self.passwords.first()
    }

    /// Iterates over all known passwords in entry order.
    pub fn iter(&self) -> impl Iterator<Item = &Password> {
        self.passwords.iter()
    }

    /// Number of passwords collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    /// True if no password has been collected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expose_roundtrip() {
        let password = Password::new("testpassword");
        assert_eq!(password.expose(), b"testpassword");
        assert!(!password.is_empty());
    }

    #[test]
    fn test_debug_redacts() {
        let password = Password::new("hunter22");
        assert!(!format!("{password:?}").contains("hunter22"));
    }

    #[test]
    fn test_set_preserves_entry_order() {
        let mut set = PasswordSet::new();
        set.add(Password::new("first"));
        set.add(Password::new("second"));

        let collected: Vec<&[u8]> = set.iter().map(Password::expose).collect();
        assert_eq!(collected, [b"first".as_slice(), b"second".as_slice()]);
        assert_eq!(set.first().unwrap().expose(), b"first");
    }
}
