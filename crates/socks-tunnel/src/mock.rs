// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Scripted mock proxy and spy collaborators for (unit) tests.

use std::collections::VecDeque;
use std::io;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};

use crate::transport::{BoxStream, BoxedFuture, Resolver, Transport, TransportError};

/// One step of the proxy side of a handshake
#[derive(Debug, Clone)]
pub(crate) enum Step {
    /// Read exactly `n` bytes and record them
    Read(usize),
    /// Write these bytes
    Write(Vec<u8>),
    /// Never answer again
    Stall,
    /// Close the pipe
    Close,
    /// Echo everything back, until EOF
    Echo,
}

/// Mock proxy running a script on the server half of an in-memory pipe
#[derive(Debug, Clone, Default)]
pub(crate) struct MockProxy {
    received: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockProxy {
    /// Spawn the script and return the client half
    pub fn spawn(script: Vec<Step>) -> (Self, DuplexStream) {
        let (client, mut server) = duplex(1024);
        let proxy = Self::default();
        let received = proxy.received.clone();

        tokio::spawn(async move {
            for step in script.into_iter() {
                match step {
                    Step::Read(n) => {
                        let mut buf = vec![0u8; n];
                        if server.read_exact(&mut buf).await.is_err() {
                            return;
                        }
                        received.lock().unwrap().push(buf);
                    }
                    Step::Write(bytes) => {
                        if server.write_all(&bytes).await.is_err() {
                            return;
                        }
                    }
                    Step::Stall => {
                        futures_util::future::pending::<()>().await;
                    }
                    Step::Close => return,
                    Step::Echo => {
                        let (mut rx, mut tx) = tokio::io::split(server);
                        let _ = tokio::io::copy(&mut rx, &mut tx).await;
                        return;
                    }
                }
            }

            // Keep the pipe open until the client goes away
            let mut sink = [0u8; 64];
            while let Ok(n) = server.read(&mut sink).await {
                if n == 0 {
                    break;
                }
            }
        });

        (proxy, client)
    }

    /// Frames read by the proxy, in order
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().unwrap().clone()
    }
}

/// Spy transport handing out pre-built streams
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    streams: Mutex<VecDeque<DuplexStream>>,
    opened: Mutex<Vec<(String, u16)>>,
    open_delay: Option<Duration>,
    stall: bool,
}

impl MockTransport {
    pub fn new(streams: Vec<DuplexStream>) -> Arc<Self> {
        Arc::new(Self {
            streams: Mutex::new(streams.into()),
            ..Default::default()
        })
    }

    /// Like [`MockTransport::new`], but every `open` takes `delay`
    pub fn slow(streams: Vec<DuplexStream>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            streams: Mutex::new(streams.into()),
            open_delay: Some(delay),
            ..Default::default()
        })
    }

    /// Transport whose `open` never completes
    pub fn stalling() -> Arc<Self> {
        Arc::new(Self {
            stall: true,
            ..Default::default()
        })
    }

    /// Every `open` call, in order
    pub fn opened(&self) -> Vec<(String, u16)> {
        self.opened.lock().unwrap().clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.opened.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn open<'a>(
        &'a self,
        host: &'a str,
        port: u16,
    ) -> BoxedFuture<'a, Result<BoxStream, TransportError>> {
        Box::pin(async move {
            self.opened.lock().unwrap().push((host.to_string(), port));

            if let Some(delay) = self.open_delay {
                tokio::time::sleep(delay).await;
            }

            if self.stall {
                futures_util::future::pending::<()>().await;
            }

            let stream = self.streams.lock().unwrap().pop_front();
            match stream {
                Some(stream) => Ok(Box::new(stream) as BoxStream),
                None => Err(TransportError::Io(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))),
            }
        })
    }
}

/// Spy resolver with a fixed answer
#[derive(Debug, Default)]
pub(crate) struct MockResolver {
    answer: Vec<Ipv4Addr>,
    lookups: Mutex<Vec<String>>,
}

impl MockResolver {
    pub fn new(answer: Vec<Ipv4Addr>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            lookups: Mutex::new(Vec::new()),
        })
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Resolver for MockResolver {
    fn resolve_ipv4<'a>(
        &'a self,
        domain: &'a str,
    ) -> BoxedFuture<'a, Result<Vec<Ipv4Addr>, TransportError>> {
        Box::pin(async move {
            self.lookups.lock().unwrap().push(domain.to_string());

            if self.answer.is_empty() {
                return Err(TransportError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no such host",
                )));
            }

            Ok(self.answer.clone())
        })
    }
}
