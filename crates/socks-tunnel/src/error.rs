// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Error

use core::fmt;
use core::ops::Deref;
use std::io;

use thiserror::Error;

use crate::addr::AddrKind;
use crate::stream::ProxyStream;
use crate::transport::TransportError;

/// Handshake error
#[derive(Debug, Error)]
pub enum Error {
    /// Proxy host is not usable by the protocol (SOCKS4 requires an IPv4 literal)
    #[error("invalid proxy address: {0}")]
    InvalidProxyAddress(String),
    /// Host kind can't be encoded by the protocol
    #[error("unsupported address kind `{kind}` for host `{host}`")]
    UnsupportedAddressKind {
        /// Host, as given by the caller
        host: String,
        /// Classification result
        kind: AddrKind,
    },
    /// Empty or oversized username/password
    #[error("invalid credentials: {0}")]
    InvalidCredentials(&'static str),
    /// Domain resolution failed
    #[error("impossible to resolve `{domain}`: {source}")]
    ResolutionFailed {
        /// Domain that was looked up
        domain: String,
        /// Resolver error
        source: TransportError,
    },
    /// Stream to the proxy can't be opened
    #[error("impossible to connect to proxy `{proxy}`: {source}")]
    ConnectFailure {
        /// Proxy endpoint
        proxy: String,
        /// Transport error
        source: TransportError,
    },
    /// Deadline exceeded
    #[error("timeout")]
    Timeout,
    /// Read or write failed mid-handshake
    #[error("transport failure: {0}")]
    TransportFailure(#[source] io::Error),
    /// Malformed or unexpected reply field
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
    /// Proxy selected a method this client doesn't support
    #[error("unsupported SOCKS5 method 0x{method:02x}: {message}")]
    UnsupportedMethod {
        /// Selected method
        method: u8,
        /// Method name
        message: &'static str,
    },
    /// Username/password sub-negotiation failed
    #[error("authentication rejected by proxy (status 0x{status:02x})")]
    AuthenticationRejected {
        /// Status byte returned by the proxy
        status: u8,
    },
    /// Well-formed rejection from the proxy
    #[error("request to target rejected by proxy: {message} (code 0x{code:02x})")]
    ProxyRejected {
        /// Reply code
        code: u8,
        /// Human readable reply
        message: &'static str,
    },
}

impl Error {
    #[inline]
    pub(crate) fn unsupported(host: &str, kind: AddrKind) -> Self {
        Self::UnsupportedAddressKind {
            host: host.to_string(),
            kind,
        }
    }

    #[inline]
    pub(crate) fn violation<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::ProtocolViolation(msg.into())
    }
}

/// Error returned by a `connect` call.
///
/// If the stream to the proxy was already open when the handshake failed, it's
/// handed back here: the handshake never closes it. Drop it (or call
/// [`ProxyStream::close`]) to release the connection.
pub struct HandshakeError {
    error: Error,
    stream: Option<ProxyStream>,
}

impl HandshakeError {
    #[inline]
    pub(crate) fn with_stream(error: Error, stream: ProxyStream) -> Self {
        Self {
            error,
            stream: Some(stream),
        }
    }

    /// Underlying error
    #[inline]
    pub fn kind(&self) -> &Error {
        &self.error
    }

    /// Check if a live stream came back with the error
    #[inline]
    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Take ownership of the stream, if one was opened
    #[inline]
    pub fn into_stream(self) -> Option<ProxyStream> {
        self.stream
    }

    /// Split into error and stream
    #[inline]
    pub fn into_parts(self) -> (Error, Option<ProxyStream>) {
        (self.error, self.stream)
    }
}

impl Deref for HandshakeError {
    type Target = Error;

    fn deref(&self) -> &Self::Target {
        &self.error
    }
}

impl fmt::Debug for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandshakeError")
            .field("error", &self.error)
            .field("stream", &self.stream.is_some())
            .finish()
    }
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

impl From<Error> for HandshakeError {
    fn from(error: Error) -> Self {
        Self {
            error,
            stream: None,
        }
    }
}

impl From<HandshakeError> for Error {
    fn from(e: HandshakeError) -> Self {
        e.error
    }
}
