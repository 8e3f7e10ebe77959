// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Proxied stream

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};

use crate::socks5::BoundAddr;
use crate::transport::BoxStream;

/// SOCKS protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// SOCKS4
    Socks4,
    /// SOCKS5
    Socks5,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Socks4 => write!(f, "SOCKS4"),
            Self::Socks5 => write!(f, "SOCKS5"),
        }
    }
}

/// Stream tunnelled through a proxy.
///
/// After a successful handshake every byte written goes to the target, and
/// every byte read comes from it. The handshake deadline no longer applies.
///
/// The caller owns the stream and is responsible for closing it.
pub struct ProxyStream {
    inner: BoxStream,
    protocol: Protocol,
    bound_addr: Option<BoundAddr>,
}

impl fmt::Debug for ProxyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyStream")
            .field("protocol", &self.protocol)
            .field("bound_addr", &self.bound_addr)
            .finish()
    }
}

impl ProxyStream {
    #[inline]
    pub(crate) fn new(inner: BoxStream, protocol: Protocol) -> Self {
        Self {
            inner,
            protocol,
            bound_addr: None,
        }
    }

    #[inline]
    pub(crate) fn with_bound_addr(mut self, addr: BoundAddr) -> Self {
        self.bound_addr = Some(addr);
        self
    }

    /// Protocol used for the handshake
    #[inline]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Address the proxy bound for this tunnel.
    ///
    /// Only SOCKS5 reports it, and only on success.
    #[inline]
    pub fn bound_addr(&self) -> Option<&BoundAddr> {
        self.bound_addr.as_ref()
    }

    /// Underlying stream
    #[inline]
    pub fn get_ref(&self) -> &BoxStream {
        &self.inner
    }

    /// Mutable underlying stream
    #[inline]
    pub fn get_mut(&mut self) -> &mut BoxStream {
        &mut self.inner
    }

    /// Consume and return the underlying stream
    #[inline]
    pub fn into_inner(self) -> BoxStream {
        self.inner
    }

    /// Shut down the write half and drop the stream
    pub async fn close(mut self) -> io::Result<()> {
        self.inner.shutdown().await
    }
}

impl AsyncRead for ProxyStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for ProxyStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}
