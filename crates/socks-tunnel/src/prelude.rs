// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Prelude

#![allow(unknown_lints)]
#![allow(ambiguous_glob_reexports)]
#![doc(hidden)]

pub use crate::addr::{
    classify, is_domain, is_ipv4, is_ipv6, AddrKind, ProxyEndpoint, TargetEndpoint,
};
pub use crate::error::*;
pub use crate::socks4::*;
pub use crate::socks5::*;
pub use crate::stream::*;
pub use crate::transport::*;
pub use crate::*;
