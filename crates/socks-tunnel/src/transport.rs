// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Stream transport and name resolution

use std::fmt;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Boxed future
pub type BoxedFuture<'a, T> = futures_util::future::BoxFuture<'a, T>;

/// Duplex byte stream
pub trait AsyncStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> AsyncStream for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// Boxed duplex byte stream
pub type BoxStream = Box<dyn AsyncStream>;

/// Transport or resolver error
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Socket or system resolver I/O error
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The domain has no IPv4 address
    #[error("no IPv4 address found")]
    NoIpv4Address,
    /// Error from a custom transport or resolver
    #[error("{0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wrap the error of a custom transport or resolver
    #[inline]
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }
}

#[doc(hidden)]
pub trait IntoTransport {
    fn into_transport(self) -> Arc<dyn Transport>;
}

impl IntoTransport for Arc<dyn Transport> {
    fn into_transport(self) -> Arc<dyn Transport> {
        self
    }
}

impl<T> IntoTransport for T
where
    T: Transport + Sized + 'static,
{
    fn into_transport(self) -> Arc<dyn Transport> {
        Arc::new(self)
    }
}

impl<T> IntoTransport for Arc<T>
where
    T: Transport + 'static,
{
    fn into_transport(self) -> Arc<dyn Transport> {
        self
    }
}

/// Opens raw duplex streams to the proxy
pub trait Transport: fmt::Debug + Send + Sync {
    /// Open a stream to `host:port`
    fn open<'a>(
        &'a self,
        host: &'a str,
        port: u16,
    ) -> BoxedFuture<'a, Result<BoxStream, TransportError>>;
}

/// Default TCP transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TcpTransport;

impl Transport for TcpTransport {
    fn open<'a>(
        &'a self,
        host: &'a str,
        port: u16,
    ) -> BoxedFuture<'a, Result<BoxStream, TransportError>> {
        Box::pin(async move {
            let stream: TcpStream = TcpStream::connect((host, port)).await?;
            Ok(Box::new(stream) as BoxStream)
        })
    }
}

#[doc(hidden)]
pub trait IntoResolver {
    fn into_resolver(self) -> Arc<dyn Resolver>;
}

impl IntoResolver for Arc<dyn Resolver> {
    fn into_resolver(self) -> Arc<dyn Resolver> {
        self
    }
}

impl<T> IntoResolver for T
where
    T: Resolver + Sized + 'static,
{
    fn into_resolver(self) -> Arc<dyn Resolver> {
        Arc::new(self)
    }
}

impl<T> IntoResolver for Arc<T>
where
    T: Resolver + 'static,
{
    fn into_resolver(self) -> Arc<dyn Resolver> {
        self
    }
}

/// Resolves domains to IPv4 addresses
pub trait Resolver: fmt::Debug + Send + Sync {
    /// Look up the A records of `domain`, in resolver order
    fn resolve_ipv4<'a>(
        &'a self,
        domain: &'a str,
    ) -> BoxedFuture<'a, Result<Vec<Ipv4Addr>, TransportError>>;
}

/// System resolver, backed by [`tokio::net::lookup_host`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn resolve_ipv4<'a>(
        &'a self,
        domain: &'a str,
    ) -> BoxedFuture<'a, Result<Vec<Ipv4Addr>, TransportError>> {
        Box::pin(async move {
            let addrs = tokio::net::lookup_host((domain, 0)).await?;
            let ips: Vec<Ipv4Addr> = addrs
                .filter_map(|addr| match addr {
                    SocketAddr::V4(addr) => Some(*addr.ip()),
                    SocketAddr::V6(..) => None,
                })
                .collect();

            if ips.is_empty() {
                return Err(TransportError::NoIpv4Address);
            }

            Ok(ips)
        })
    }
}
