// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! SOCKS5 client
//!
//! Three exchanges over one stream:
//!
//! 1. method negotiation (a single method is offered);
//! 2. username/password sub-negotiation, only if credentials are set;
//! 3. CONNECT request and reply.
//!
//! Only the CONNECT command is supported. Domains are sent as-is: the proxy
//! resolves them.
//!
//! <https://www.rfc-editor.org/rfc/rfc1928>

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

mod address;
mod auth;
pub(crate) mod constant;

pub use self::address::BoundAddr;
use self::address::TargetAddr;
pub use self::auth::{Credentials, CredentialsProvider, NegotiatedMethod};
use self::constant::*;
use crate::addr::{ProxyEndpoint, TargetEndpoint};
use crate::deadline::{self, Deadline};
use crate::error::{Error, HandshakeError};
use crate::stream::{Protocol, ProxyStream};
use crate::transport::{AsyncStream, BoxStream, IntoTransport, TcpTransport, Transport};
use crate::DEFAULT_TIMEOUT;

/// SOCKS5 client
///
/// Holds only configuration: cheap to clone and safe to share between tasks.
/// Each [`Socks5Client::connect`] call opens its own stream.
#[derive(Clone)]
pub struct Socks5Client {
    timeout: Duration,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Socks5Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socks5Client")
            .field("timeout", &self.timeout)
            .field("authenticate", &self.authenticate())
            .field("transport", &self.transport)
            .finish()
    }
}

impl Default for Socks5Client {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Socks5Client {
    /// New client without authentication.
    ///
    /// `timeout` is a single budget shared by the stream open and the whole
    /// handshake that follows.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            credentials: None,
            transport: Arc::new(TcpTransport),
        }
    }

    /// Authenticate with username/password.
    ///
    /// The provider is called once per handshake, before any network I/O.
    pub fn credentials<P>(mut self, provider: P) -> Self
    where
        P: CredentialsProvider + 'static,
    {
        self.credentials = Some(Arc::new(provider));
        self
    }

    /// Set a custom transport (default: [`TcpTransport`])
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: IntoTransport,
    {
        self.transport = transport.into_transport();
        self
    }

    /// Handshake timeout
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check if username/password authentication is requested
    #[inline]
    pub fn authenticate(&self) -> bool {
        self.credentials.is_some()
    }

    /// Connect to `target` through `proxy`.
    ///
    /// Invalid credentials and unsupported target addresses are reported
    /// before the proxy is contacted. If the handshake fails after the stream
    /// was opened, the stream is returned inside the [`HandshakeError`].
    pub async fn connect(
        &self,
        proxy: &ProxyEndpoint,
        target: &TargetEndpoint,
    ) -> Result<ProxyStream, HandshakeError> {
        let auth: Option<Vec<u8>> = match &self.credentials {
            Some(provider) => Some(provider.credentials().encode()?),
            None => None,
        };
        let method: NegotiatedMethod = match auth {
            Some(..) => NegotiatedMethod::UsernamePassword,
            None => NegotiatedMethod::NoAuth,
        };
        let request: Vec<u8> = connect_request(target)?;

        tracing::debug!(%proxy, %target, ?method, "Starting SOCKS5 handshake");

        let deadline = Deadline::after(self.timeout);
        let mut stream: BoxStream =
            deadline::open(self.transport.as_ref(), proxy, &deadline).await?;

        let res = handshake(&deadline, &mut *stream, method, auth.as_deref(), &request).await;
        match res {
            Ok(bound) => {
                tracing::debug!(%proxy, %target, %bound, "SOCKS5 tunnel established");
                Ok(ProxyStream::new(stream, Protocol::Socks5).with_bound_addr(bound))
            }
            Err(e) => Err(HandshakeError::with_stream(
                e,
                ProxyStream::new(stream, Protocol::Socks5),
            )),
        }
    }
}

/// Build the CONNECT request:
/// `05 01 00 <atyp> <addr> <port:u16be>`
pub(crate) fn connect_request(target: &TargetEndpoint) -> Result<Vec<u8>, Error> {
    let addr: TargetAddr<'_> = TargetAddr::from_host(target.host())?;

    let mut buf: Vec<u8> = Vec::with_capacity(3 + 1 + 255 + 2);
    buf.extend_from_slice(&[VERSION, CMD_CONNECT, RESERVED]);
    addr.encode(&mut buf);
    buf.extend_from_slice(&target.port().to_be_bytes());
    Ok(buf)
}

async fn handshake(
    deadline: &Deadline,
    stream: &mut dyn AsyncStream,
    method: NegotiatedMethod,
    auth: Option<&[u8]>,
    request: &[u8],
) -> Result<BoundAddr, Error> {
    negotiate(deadline, stream, method).await?;

    if let Some(auth) = auth {
        authenticate(deadline, stream, auth).await?;
    }

    deadline.write_all(stream, request).await?;
    tracing::trace!("SOCKS5 CONNECT request sent");

    read_reply(deadline, stream).await
}

async fn negotiate(
    deadline: &Deadline,
    stream: &mut dyn AsyncStream,
    method: NegotiatedMethod,
) -> Result<(), Error> {
    deadline
        .write_all(stream, &[VERSION, 1, method.as_u8()])
        .await?;

    let mut reply = [0u8; 2];
    deadline.read_exact(stream, &mut reply).await?;
    let [version, selected] = reply;

    if version != VERSION {
        return Err(Error::violation(format!(
            "invalid SOCKS version in method selection reply: 0x{version:02x}"
        )));
    }

    match NegotiatedMethod::from_u8(selected) {
        Some(selected) if selected == method => {
            tracing::trace!(?method, "SOCKS5 method negotiated");
            Ok(())
        }
        Some(..) => Err(Error::violation(format!(
            "proxy selected method 0x{selected:02x}, but only 0x{:02x} was offered",
            method.as_u8()
        ))),
        None => Err(Error::UnsupportedMethod {
            method: selected,
            message: method_name(selected),
        }),
    }
}

async fn authenticate(
    deadline: &Deadline,
    stream: &mut dyn AsyncStream,
    auth: &[u8],
) -> Result<(), Error> {
    deadline.write_all(stream, auth).await?;

    // The version byte isn't checked
    let mut reply = [0u8; 2];
    deadline.read_exact(stream, &mut reply).await?;

    match reply[1] {
        AUTH_SUCCESS => {
            tracing::trace!("SOCKS5 authentication succeeded");
            Ok(())
        }
        status => Err(Error::AuthenticationRejected { status }),
    }
}

/// Read `05 <status> 00 <atyp> <addr> <port:u16be>`.
///
/// The bound address length depends on the reply's own `atyp`.
async fn read_reply(
    deadline: &Deadline,
    stream: &mut dyn AsyncStream,
) -> Result<BoundAddr, Error> {
    let mut header = [0u8; 4];
    deadline.read_exact(stream, &mut header).await?;
    let [version, status, _reserved, atyp] = header;

    if version != VERSION {
        return Err(Error::violation(format!(
            "invalid SOCKS version in CONNECT reply: 0x{version:02x}"
        )));
    }

    if status != REPLY_SUCCEEDED {
        return Err(Error::ProxyRejected {
            code: status,
            message: reply_message(status),
        });
    }

    address::read_bound_addr(deadline, stream, atyp).await
}
