// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! SOCKS4 and SOCKS5 client handshakes
//!
//! Connect to a proxy, run the protocol handshake and get back a
//! [`ProxyStream`]: a transparent byte pipe to the target.
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use socks_tunnel::prelude::*;
//! use tokio::io::AsyncWriteExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Socks5Client::new(Duration::from_secs(10))
//!     .credentials(Credentials::new("user", "password"));
//!
//! let proxy = ProxyEndpoint::new("127.0.0.1", 1080);
//! let target = TargetEndpoint::new("example.com", 80);
//!
//! let mut stream = client.connect(&proxy, &target).await?;
//! stream.write_all(b"GET / HTTP/1.0\r\n\r\n").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

use std::time::Duration;

pub mod addr;
mod deadline;
pub mod error;
#[cfg(test)]
mod mock;
pub mod prelude;
pub mod socks4;
pub mod socks5;
pub mod stream;
pub mod transport;

pub use self::addr::{classify, AddrKind, ProxyEndpoint, TargetEndpoint};
pub use self::error::{Error, HandshakeError};
pub use self::socks4::Socks4Client;
pub use self::socks5::{BoundAddr, Credentials, CredentialsProvider, NegotiatedMethod, Socks5Client};
pub use self::stream::{Protocol, ProxyStream};
pub use self::transport::{Resolver, SystemResolver, TcpTransport, Transport, TransportError};

/// Default handshake timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
