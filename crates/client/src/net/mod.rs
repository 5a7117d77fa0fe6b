pub mod client;
pub mod config;
pub mod session;

pub use client::NetworkClient;
pub use config::ClientConfig;
pub use session::Session;
