mod game;
mod headless;
pub mod net;
mod tui;

use std::net::{SocketAddr, ToSocketAddrs};

use anyhow::Context;
use clap::Parser;

use net::{ClientConfig, NetworkClient};

#[derive(Parser)]
#[command(name = "drift")]
#[command(about = "drift game client")]
struct Args {
    #[arg(
        short,
        long,
        default_value_t = format!("127.0.0.1:{}", drift::DEFAULT_PORT),
        help = "Server address to connect to"
    )]
    server: String,

    #[arg(long, help = "Run without the terminal view, logging state instead")]
    headless: bool,

    #[arg(long, help = "Stop after this many frames (headless only)")]
    frames: Option<u64>,

    #[arg(long, help = "Frames per second")]
    fps: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = ClientConfig::default();
    if let Some(fps) = args.fps {
        config.frame_rate = fps;
    }

    let server_addr = resolve(&args.server)?;
    let mut client = NetworkClient::new(config)?;
    client.connect(server_addr)?;

    let result = if args.headless {
        headless::run(&mut client, args.frames)
    } else {
        tui::run(&mut client)
    };

    client.shutdown();
    result
}

fn resolve(addr: &str) -> anyhow::Result<SocketAddr> {
    addr.to_socket_addrs()
        .with_context(|| format!("invalid server address {addr}"))?
        .find(SocketAddr::is_ipv4)
        .with_context(|| format!("no IPv4 address for {addr}"))
}
