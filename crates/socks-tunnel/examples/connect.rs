// Copyright (c) 2022-2023 Yuki Kishimoto
// Copyright (c) 2023-2025 Rust Nostr Developers
// Distributed under the MIT software license

//! Usage: `cargo run --example connect -- <socks4|socks5> <proxy host:port> <target host:port> [user] [password]`

use std::env;
use std::time::Duration;

use socks_tunnel::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: connect <socks4|socks5> <proxy host:port> <target host:port> [user] [password]");
        return Ok(());
    }

    let proxy: ProxyEndpoint = args[1].parse()?;
    let target: TargetEndpoint = args[2].parse()?;
    let timeout = Duration::from_secs(15);

    let mut stream: ProxyStream = match args[0].as_str() {
        "socks4" => Socks4Client::new(timeout).connect(&proxy, &target).await?,
        "socks5" => {
            let mut client = Socks5Client::new(timeout);
            if let (Some(user), Some(password)) = (args.get(3), args.get(4)) {
                client = client.credentials(Credentials::new(user.as_str(), password.as_str()));
            }
            client.connect(&proxy, &target).await?
        }
        other => {
            eprintln!("unknown protocol: {other}");
            return Ok(());
        }
    };

    if let Some(bound) = stream.bound_addr() {
        println!("Proxy bound address: {bound}");
    }

    let request = format!("HEAD / HTTP/1.0\r\nHost: {}\r\n\r\n", target.host());
    stream.write_all(request.as_bytes()).await?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await?;
    println!("{}", String::from_utf8_lossy(&response));

    stream.close().await?;

    Ok(())
}
