// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Username/password authentication
//!
//! <https://www.rfc-editor.org/rfc/rfc1929>

use core::fmt;

use super::constant::{AUTH_VERSION, METHOD_NO_AUTH, METHOD_USERNAME_PASSWORD};
use crate::error::Error;

/// Method selected during negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiatedMethod {
    /// No authentication required
    NoAuth,
    /// Username/password sub-negotiation
    UsernamePassword,
}

impl NegotiatedMethod {
    /// Wire value
    #[inline]
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::NoAuth => METHOD_NO_AUTH,
            Self::UsernamePassword => METHOD_USERNAME_PASSWORD,
        }
    }

    /// Parse a wire value, if supported
    #[inline]
    pub fn from_u8(method: u8) -> Option<Self> {
        match method {
            METHOD_NO_AUTH => Some(Self::NoAuth),
            METHOD_USERNAME_PASSWORD => Some(Self::UsernamePassword),
            _ => None,
        }
    }
}

/// Username and password
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    /// New credentials
    pub fn new<U, P>(username: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Username
    #[inline]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password
    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Both fields must be non-empty and fit a one-byte length prefix
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(Error::InvalidCredentials(
                "username and password can't be empty when authentication is enabled",
            ));
        }

        if self.username.len() > u8::MAX as usize {
            return Err(Error::InvalidCredentials(
                "username is longer than 255 bytes",
            ));
        }

        if self.password.len() > u8::MAX as usize {
            return Err(Error::InvalidCredentials(
                "password is longer than 255 bytes",
            ));
        }

        Ok(())
    }

    /// Build the sub-negotiation request:
    /// `01 <ulen:u8> <user> <plen:u8> <pass>`
    pub(crate) fn encode(&self) -> Result<Vec<u8>, Error> {
        self.validate()?;

        let mut buf: Vec<u8> = Vec::with_capacity(3 + self.username.len() + self.password.len());
        buf.push(AUTH_VERSION);
        buf.push(self.username.len() as u8);
        buf.extend_from_slice(self.username.as_bytes());
        buf.push(self.password.len() as u8);
        buf.extend_from_slice(self.password.as_bytes());
        Ok(buf)
    }
}

/// Supplies credentials when a handshake starts
pub trait CredentialsProvider: Send + Sync {
    /// Get credentials
    fn credentials(&self) -> Credentials;
}

impl CredentialsProvider for Credentials {
    fn credentials(&self) -> Credentials {
        self.clone()
    }
}

impl<F> CredentialsProvider for F
where
    F: Fn() -> Credentials + Send + Sync,
{
    fn credentials(&self) -> Credentials {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_auth_request() {
        let creds = Credentials::new("user", "secret");
        assert_eq!(
            creds.encode().unwrap(),
            vec![0x01, 4, b'u', b's', b'e', b'r', 6, b's', b'e', b'c', b'r', b'e', b't']
        );
    }

    #[test]
    fn test_invalid_credentials() {
        assert!(matches!(
            Credentials::new("", "secret").validate(),
            Err(Error::InvalidCredentials(..))
        ));
        assert!(matches!(
            Credentials::new("user", "").validate(),
            Err(Error::InvalidCredentials(..))
        ));
        assert!(matches!(
            Credentials::new("u".repeat(256), "secret").validate(),
            Err(Error::InvalidCredentials(..))
        ));
        assert!(matches!(
            Credentials::new("user", "p".repeat(256)).validate(),
            Err(Error::InvalidCredentials(..))
        ));
        assert!(Credentials::new("u".repeat(255), "p".repeat(255))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_closure_provider() {
        let provider = || Credentials::new("alice", "hunter2");
        let creds = CredentialsProvider::credentials(&provider);
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), "hunter2");
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_method_wire_values() {
        assert_eq!(NegotiatedMethod::NoAuth.as_u8(), 0x00);
        assert_eq!(NegotiatedMethod::UsernamePassword.as_u8(), 0x02);
        assert_eq!(NegotiatedMethod::from_u8(0x01), None);
        assert_eq!(NegotiatedMethod::from_u8(0xFF), None);
    }
}
