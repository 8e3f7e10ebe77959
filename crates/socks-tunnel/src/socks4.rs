// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! SOCKS4 client
//!
//! Single CONNECT round trip. The proxy must be an IPv4 literal, and domain
//! targets are resolved locally to their first A record. No user ID is sent.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use crate::addr::{self, AddrKind, ProxyEndpoint, TargetEndpoint};
use crate::deadline::{self, Deadline};
use crate::error::{Error, HandshakeError};
use crate::stream::{Protocol, ProxyStream};
use crate::transport::{
    AsyncStream, BoxStream, IntoResolver, IntoTransport, Resolver, SystemResolver, TcpTransport,
    Transport, TransportError,
};
use crate::DEFAULT_TIMEOUT;

const VERSION: u8 = 0x04;
const CMD_CONNECT: u8 = 0x01;
const NULL_USER_ID: u8 = 0x00;
const REQUEST_GRANTED: u8 = 0x5A;

/// Human readable reply
pub fn reply_message(code: u8) -> &'static str {
    match code {
        0x5A => "Request granted",
        0x5B => "Request rejected or failed",
        0x5C => "Request failed because client is not running identd (or not reachable from server)",
        0x5D => "Request failed because client's identd could not confirm the user ID in the request",
        _ => "unknown reply code",
    }
}

/// SOCKS4 client
///
/// Holds only configuration: cheap to clone and safe to share between tasks.
#[derive(Debug, Clone)]
pub struct Socks4Client {
    timeout: Duration,
    transport: Arc<dyn Transport>,
    resolver: Arc<dyn Resolver>,
}

impl Default for Socks4Client {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Socks4Client {
    /// New client.
    ///
    /// `timeout` is a single budget shared by the stream open and the whole
    /// handshake that follows.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            transport: Arc::new(TcpTransport),
            resolver: Arc::new(SystemResolver),
        }
    }

    /// Set a custom transport (default: [`TcpTransport`])
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: IntoTransport,
    {
        self.transport = transport.into_transport();
        self
    }

    /// Set a custom resolver (default: [`SystemResolver`])
    pub fn resolver<R>(mut self, resolver: R) -> Self
    where
        R: IntoResolver,
    {
        self.resolver = resolver.into_resolver();
        self
    }

    /// Handshake timeout
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connect to `target` through `proxy`.
    ///
    /// If the proxy answers with anything but "request granted", the stream is
    /// returned inside the [`HandshakeError`].
    pub async fn connect(
        &self,
        proxy: &ProxyEndpoint,
        target: &TargetEndpoint,
    ) -> Result<ProxyStream, HandshakeError> {
        let proxy_kind: AddrKind = proxy.kind();
        let target_kind: AddrKind = target.kind();

        if proxy_kind == AddrKind::Ipv6 {
            return Err(Error::unsupported(proxy.host(), proxy_kind).into());
        }

        if target_kind == AddrKind::Ipv6 {
            return Err(Error::unsupported(target.host(), target_kind).into());
        }

        // Out-of-range octets would reach the transport as a host name
        if proxy_kind != AddrKind::Ipv4 || addr::ipv4_octets(proxy.host()).is_none() {
            return Err(Error::InvalidProxyAddress(proxy.host().to_string()).into());
        }

        let ip: Ipv4Addr = match target_kind {
            AddrKind::Ipv4 => addr::ipv4_octets(target.host())
                .ok_or_else(|| Error::unsupported(target.host(), target_kind))?,
            AddrKind::Domain => self.resolve(target.host()).await?,
            AddrKind::Ipv6 | AddrKind::Invalid => {
                return Err(Error::unsupported(target.host(), target_kind).into())
            }
        };

        let request: [u8; 9] = connect_request(ip, target.port());

        tracing::debug!(%proxy, %target, %ip, "Starting SOCKS4 handshake");

        let deadline = Deadline::after(self.timeout);
        let mut stream: BoxStream =
            deadline::open(self.transport.as_ref(), proxy, &deadline).await?;

        let res = handshake(&deadline, &mut *stream, &request).await;
        match res {
            Ok(()) => {
                tracing::debug!(%proxy, %target, "SOCKS4 tunnel established");
                Ok(ProxyStream::new(stream, Protocol::Socks4))
            }
            Err(e) => Err(HandshakeError::with_stream(
                e,
                ProxyStream::new(stream, Protocol::Socks4),
            )),
        }
    }

    async fn resolve(&self, domain: &str) -> Result<Ipv4Addr, Error> {
        let ips: Vec<Ipv4Addr> =
            self.resolver
                .resolve_ipv4(domain)
                .await
                .map_err(|source| Error::ResolutionFailed {
                    domain: domain.to_string(),
                    source,
                })?;

        // Resolver order is kept: take the first
        match ips.first() {
            Some(ip) => {
                tracing::trace!(domain, %ip, "Resolved SOCKS4 target");
                Ok(*ip)
            }
            None => Err(Error::ResolutionFailed {
                domain: domain.to_string(),
                source: TransportError::NoIpv4Address,
            }),
        }
    }
}

/// Build the CONNECT request:
/// `04 01 <port:u16be> <ipv4:4B> 00`
pub(crate) fn connect_request(ip: Ipv4Addr, port: u16) -> [u8; 9] {
    let [p0, p1] = port.to_be_bytes();
    let [a, b, c, d] = ip.octets();
    [VERSION, CMD_CONNECT, p0, p1, a, b, c, d, NULL_USER_ID]
}

async fn handshake(
    deadline: &Deadline,
    stream: &mut dyn AsyncStream,
    request: &[u8],
) -> Result<(), Error> {
    deadline.write_all(stream, request).await?;

    // `<vn> <status>`: the version echo isn't checked
    let mut reply = [0u8; 2];
    deadline.read_exact(stream, &mut reply).await?;

    match reply[1] {
        REQUEST_GRANTED => Ok(()),
        code => Err(Error::ProxyRejected {
            code,
            message: reply_message(code),
        }),
    }
}
