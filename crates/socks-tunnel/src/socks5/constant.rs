// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! SOCKS5 constants
//!
//! <https://www.rfc-editor.org/rfc/rfc1928>

pub const VERSION: u8 = 0x05;
pub const CMD_CONNECT: u8 = 0x01;
pub const RESERVED: u8 = 0x00;

pub const METHOD_NO_AUTH: u8 = 0x00;
pub const METHOD_USERNAME_PASSWORD: u8 = 0x02;

pub const ATYP_IPV4: u8 = 0x01;
pub const ATYP_DOMAIN: u8 = 0x03;
pub const ATYP_IPV6: u8 = 0x04;

// RFC 1929
pub const AUTH_VERSION: u8 = 0x01;
pub const AUTH_SUCCESS: u8 = 0x00;

pub const REPLY_SUCCEEDED: u8 = 0x00;

/// Human readable CONNECT reply
pub fn reply_message(code: u8) -> &'static str {
    match code {
        0x00 => "succeeded",
        0x01 => "general SOCKS server failure",
        0x02 => "connection not allowed by ruleset",
        0x03 => "network unreachable",
        0x04 => "host unreachable",
        0x05 => "connection refused",
        0x06 => "TTL expired",
        0x07 => "command not supported",
        0x08 => "address type not supported",
        0x09..=0xFF => "unassigned",
    }
}

/// Human readable authentication method
pub fn method_name(method: u8) -> &'static str {
    match method {
        0x00 => "no authentication required",
        0x01 => "GSSAPI",
        0x02 => "username/password",
        0x03..=0x7F => "IANA assigned",
        0x80..=0xFE => "reserved for private methods",
        0xFF => "no acceptable methods",
    }
}
