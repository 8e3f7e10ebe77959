// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! SOCKS5 address field
//!
//! `<atyp:u8> <addr> <port:u16be>`, shared by the CONNECT request and reply.

use core::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use super::constant::{ATYP_DOMAIN, ATYP_IPV4, ATYP_IPV6};
use crate::addr::{self, AddrKind};
use crate::deadline::Deadline;
use crate::error::Error;
use crate::transport::AsyncStream;

/// Address the proxy bound for the tunnel, as reported in the CONNECT reply
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoundAddr {
    /// IPv4 or IPv6 address
    Ip(SocketAddr),
    /// Domain name and port
    Domain(String, u16),
}

impl BoundAddr {
    /// Port
    pub fn port(&self) -> u16 {
        match self {
            Self::Ip(addr) => addr.port(),
            Self::Domain(_, port) => *port,
        }
    }
}

impl fmt::Display for BoundAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => write!(f, "{addr}"),
            Self::Domain(domain, port) => write!(f, "{domain}:{port}"),
        }
    }
}

/// Target address, ready to be put on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TargetAddr<'a> {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Domain(&'a str),
}

impl<'a> TargetAddr<'a> {
    /// Pick the encoding from the host classification
    pub fn from_host(host: &'a str) -> Result<Self, Error> {
        let kind: AddrKind = addr::classify(host);
        match kind {
            AddrKind::Ipv4 => addr::ipv4_octets(host)
                .map(Self::Ipv4)
                .ok_or_else(|| Error::unsupported(host, kind)),
            AddrKind::Ipv6 => addr::ipv6_segments(host)
                .map(Self::Ipv6)
                .ok_or_else(|| Error::unsupported(host, kind)),
            AddrKind::Domain if host.len() <= u8::MAX as usize => Ok(Self::Domain(host)),
            AddrKind::Domain | AddrKind::Invalid => Err(Error::unsupported(host, kind)),
        }
    }

    /// Append `<atyp> <addr>` to `buf`
    pub fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Self::Ipv4(ip) => {
                buf.push(ATYP_IPV4);
                buf.extend_from_slice(&ip.octets());
            }
            Self::Ipv6(ip) => {
                buf.push(ATYP_IPV6);
                buf.extend_from_slice(&ip.octets());
            }
            Self::Domain(domain) => {
                buf.push(ATYP_DOMAIN);
                // Length checked in `from_host`
                buf.push(domain.len() as u8);
                buf.extend_from_slice(domain.as_bytes());
            }
        }
    }
}

/// Read `<addr> <port:u16be>` for an already-read `atyp`
pub(crate) async fn read_bound_addr(
    deadline: &Deadline,
    stream: &mut dyn AsyncStream,
    atyp: u8,
) -> Result<BoundAddr, Error> {
    let ip: Option<IpAddr> = match atyp {
        ATYP_IPV4 => {
            let mut octets = [0u8; 4];
            deadline.read_exact(stream, &mut octets).await?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        ATYP_IPV6 => {
            let mut octets = [0u8; 16];
            deadline.read_exact(stream, &mut octets).await?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        ATYP_DOMAIN => None,
        other => {
            return Err(Error::violation(format!(
                "unknown address type 0x{other:02x} in reply"
            )))
        }
    };

    match ip {
        Some(ip) => {
            let port: u16 = read_port(deadline, stream).await?;
            Ok(BoundAddr::Ip(SocketAddr::new(ip, port)))
        }
        None => {
            let len: u8 = deadline.read_u8(stream).await?;
            let mut domain = vec![0u8; len as usize];
            deadline.read_exact(stream, &mut domain).await?;
            let domain: String = String::from_utf8(domain)
                .map_err(|_| Error::violation("bound domain is not valid UTF-8"))?;
            let port: u16 = read_port(deadline, stream).await?;
            Ok(BoundAddr::Domain(domain, port))
        }
    }
}

async fn read_port(deadline: &Deadline, stream: &mut dyn AsyncStream) -> Result<u16, Error> {
    let mut port = [0u8; 2];
    deadline.read_exact(stream, &mut port).await?;
    Ok(u16::from_be_bytes(port))
}
