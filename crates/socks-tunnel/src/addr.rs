// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Address classification and endpoints
//!
//! Every handshake picks its wire encoding from [`classify`]. The rules are
//! intentionally loose and textual:
//!
//! * IPv4: four dot-separated groups of 1 to 3 decimal digits. Octet ranges are
//!   **not** checked here (`999.1.1.1` is IPv4), but such a literal can't be
//!   put on the wire and is rejected when the request is built.
//! * IPv6: eight colon-separated groups of 1 to 4 hex digits. The `::`
//!   shorthand is **not** supported and classifies as [`AddrKind::Invalid`].
//! * Domain: lowercase alphanumeric labels, hyphens allowed inside a label.
//!   Uppercase input is [`AddrKind::Invalid`]: lowercase it first.

use core::fmt;
use core::str::FromStr;
use std::net::{Ipv4Addr, Ipv6Addr};

use once_cell::sync::Lazy; // TODO: use `std::sync::LazyLock` when MSRV >= 1.80.0
use regex::Regex;

static IPV4_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:[0-9]{1,3}\.){3}[0-9]{1,3})$").unwrap());
static IPV6_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$").unwrap());
static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").unwrap()
});

/// Endpoint parsing error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Missing `:port` suffix or unbalanced brackets
    InvalidFormat,
    /// Port is not a valid `u16`
    InvalidPort,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid endpoint format, expected host:port"),
            Self::InvalidPort => write!(f, "invalid port"),
        }
    }
}

/// Kind of a textual host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrKind {
    /// IPv4 literal
    Ipv4,
    /// Uncompressed IPv6 literal
    Ipv6,
    /// Domain name
    Domain,
    /// None of the above
    Invalid,
}

impl AddrKind {
    /// Short name, used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Domain => "domain",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for AddrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a host.
///
/// Checked in order IPv4, IPv6, domain: an all-digit dotted quad is IPv4 even
/// though it would also match the domain rules.
pub fn classify(host: &str) -> AddrKind {
    if is_ipv4(host) {
        AddrKind::Ipv4
    } else if is_ipv6(host) {
        AddrKind::Ipv6
    } else if is_domain(host) {
        AddrKind::Domain
    } else {
        AddrKind::Invalid
    }
}

/// Check if `host` is a (loose) IPv4 literal
pub fn is_ipv4(host: &str) -> bool {
    IPV4_PATTERN.is_match(host)
}

/// Check if `host` is an uncompressed IPv6 literal
pub fn is_ipv6(host: &str) -> bool {
    IPV6_PATTERN.is_match(host)
}

/// Check if `host` is a lowercase domain name
pub fn is_domain(host: &str) -> bool {
    DOMAIN_PATTERN.is_match(host)
}

/// Convert a classified IPv4 literal to an address.
///
/// Returns `None` if any octet is greater than 255.
pub(crate) fn ipv4_octets(host: &str) -> Option<Ipv4Addr> {
    if !is_ipv4(host) {
        return None;
    }
    let mut octets = [0u8; 4];
    for (slot, group) in octets.iter_mut().zip(host.split('.')) {
        *slot = group.parse().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}

/// Convert a classified IPv6 literal to an address.
pub(crate) fn ipv6_segments(host: &str) -> Option<Ipv6Addr> {
    if !is_ipv6(host) {
        return None;
    }
    let mut segments = [0u16; 8];
    for (slot, group) in segments.iter_mut().zip(host.split(':')) {
        *slot = u16::from_str_radix(group, 16).ok()?;
    }
    Some(Ipv6Addr::from(segments))
}

fn split_host_port(s: &str) -> Result<(&str, u16), Error> {
    let (host, port) = match s.strip_prefix('[') {
        Some(rest) => rest.split_once("]:").ok_or(Error::InvalidFormat)?,
        None => {
            let (host, port) = s.rsplit_once(':').ok_or(Error::InvalidFormat)?;
            if host.contains(':') {
                return Err(Error::InvalidFormat);
            }
            (host, port)
        }
    };

    if host.is_empty() {
        return Err(Error::InvalidFormat);
    }

    let port: u16 = port.parse().map_err(|_| Error::InvalidPort)?;
    Ok((host, port))
}

fn fmt_host_port(f: &mut fmt::Formatter<'_>, host: &str, port: u16) -> fmt::Result {
    if host.contains(':') {
        write!(f, "[{host}]:{port}")
    } else {
        write!(f, "{host}:{port}")
    }
}

macro_rules! impl_endpoint {
    ($name:ident) => {
        impl $name {
            /// Compose endpoint
            #[inline]
            pub fn new<S>(host: S, port: u16) -> Self
            where
                S: Into<String>,
            {
                Self {
                    host: host.into(),
                    port,
                }
            }

            /// Host, as given by the caller
            #[inline]
            pub fn host(&self) -> &str {
                &self.host
            }

            /// Port
            #[inline]
            pub fn port(&self) -> u16 {
                self.port
            }

            /// Classify the host
            #[inline]
            pub fn kind(&self) -> AddrKind {
                classify(&self.host)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt_host_port(f, &self.host, self.port)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (host, port) = split_host_port(s)?;
                Ok(Self::new(host, port))
            }
        }

        impl<S> From<(S, u16)> for $name
        where
            S: Into<String>,
        {
            fn from((host, port): (S, u16)) -> Self {
                Self::new(host, port)
            }
        }
    };
}

/// Proxy server endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    host: String,
    port: u16,
}

impl_endpoint!(ProxyEndpoint);

/// Final destination, reached through the proxy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetEndpoint {
    host: String,
    port: u16,
}

impl_endpoint!(TargetEndpoint);
