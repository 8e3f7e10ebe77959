// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Deadline-bounded handshake I/O
//!
//! The deadline is fixed once, when `connect` starts, and covers opening the
//! stream plus every following read and write of the handshake. It's never
//! reset per operation.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{self, Instant};

use crate::addr::ProxyEndpoint;
use crate::error::Error;
use crate::transport::{BoxStream, Transport};

/// Open a stream to the proxy, bounded by `deadline`
pub(crate) async fn open(
    transport: &dyn Transport,
    proxy: &ProxyEndpoint,
    deadline: &Deadline,
) -> Result<BoxStream, Error> {
    match time::timeout_at(deadline.at, transport.open(proxy.host(), proxy.port())).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(source)) => Err(Error::ConnectFailure {
            proxy: proxy.to_string(),
            source,
        }),
        Err(..) => Err(Error::Timeout),
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    at: Instant,
}

impl Deadline {
    #[inline]
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// Write the whole frame and flush
    pub async fn write_all<S>(&self, stream: &mut S, buf: &[u8]) -> Result<(), Error>
    where
        S: AsyncWrite + Unpin + ?Sized,
    {
        let fut = async {
            stream.write_all(buf).await?;
            stream.flush().await
        };

        match time::timeout_at(self.at, fut).await {
            Ok(res) => res.map_err(map_io),
            Err(..) => Err(Error::Timeout),
        }
    }

    /// Fill `buf` completely
    pub async fn read_exact<S>(&self, stream: &mut S, buf: &mut [u8]) -> Result<(), Error>
    where
        S: AsyncRead + Unpin + ?Sized,
    {
        match time::timeout_at(self.at, stream.read_exact(buf)).await {
            Ok(res) => res.map(|_| ()).map_err(map_io),
            Err(..) => Err(Error::Timeout),
        }
    }

    pub async fn read_u8<S>(&self, stream: &mut S) -> Result<u8, Error>
    where
        S: AsyncRead + Unpin + ?Sized,
    {
        let mut buf = [0u8; 1];
        self.read_exact(stream, &mut buf).await?;
        Ok(buf[0])
    }
}

fn map_io(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::TimedOut => Error::Timeout,
        _ => Error::TransportFailure(e),
    }
}
