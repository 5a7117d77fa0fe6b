use std::io;
use std::net::SocketAddr;

use drift::{ConnectionState, MotionInput, NetworkStats, ServerConnection, ServerLink};

use super::config::ClientConfig;
use super::session::Session;

pub struct NetworkClient {
    connection: ServerConnection,
    session: Session,
    config: ClientConfig,
}

impl NetworkClient {
    pub fn new(config: ClientConfig) -> io::Result<Self> {
        let connection = ServerConnection::bind_any(config.timings())?;

        Ok(Self {
            connection,
            session: Session::new(),
            config,
        })
    }

    pub fn connect(&mut self, server_addr: SocketAddr) -> io::Result<()> {
        self.connection.connect(server_addr)
    }

    pub fn disconnect(&mut self) -> io::Result<()> {
        self.connection.disconnect()
    }

    /// One frame: drain the link, then run prediction and correction for the
    /// controlled entity. A socket error while draining is returned after the
    /// frame has still been simulated.
    pub fn update(&mut self, delta_time: f32, input: MotionInput) -> io::Result<()> {
        let drained = self.connection.poll().map(|events| {
            for event in events {
                self.session.handle_event(event, &mut self.connection);
            }
        });

        self.session.advance(delta_time, input, &mut self.connection);
        drained
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn round_trip_ms(&self) -> u32 {
        self.connection.round_trip_ms()
    }

    pub fn stats(&self) -> &NetworkStats {
        self.connection.stats()
    }

    pub fn shutdown(&mut self) {
        if let Err(e) = self.disconnect() {
            log::warn!("Failed to notify server of disconnect: {}", e);
        }
    }
}
