use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use super::endpoint::NetworkEndpoint;
use super::protocol::{EntityId, Packet, PacketType};
use super::stats::{NetworkStats, RttEstimator};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRY_MS: u64 = 500;
const DEFAULT_PING_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// What the game layer sees of the link, in arrival order.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    Connect,
    Receive(Packet),
    Disconnect,
}

/// Outbound half of the server link as the game layer uses it.
pub trait ServerLink {
    fn round_trip_ms(&self) -> u32;

    fn send_join(&mut self) -> io::Result<()>;

    fn send_entity_input(
        &mut self,
        entity_id: EntityId,
        throttle: f32,
        steer: f32,
        tick: u32,
    ) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct ConnectionTimings {
    pub timeout: Duration,
    pub retry_interval: Duration,
    pub ping_interval: Duration,
}

impl Default for ConnectionTimings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_interval: Duration::from_millis(DEFAULT_RETRY_MS),
            ping_interval: Duration::from_millis(DEFAULT_PING_MS),
        }
    }
}

pub struct ServerConnection {
    endpoint: NetworkEndpoint,
    state: ConnectionState,
    timings: ConnectionTimings,
    rtt: RttEstimator,
    epoch: Instant,
    connect_started: Option<Instant>,
    last_hello: Option<Instant>,
    last_ping: Instant,
}

impl ServerConnection {
    pub fn new(endpoint: NetworkEndpoint, timings: ConnectionTimings) -> Self {
        Self {
            endpoint,
            state: ConnectionState::Disconnected,
            timings,
            rtt: RttEstimator::new(),
            epoch: Instant::now(),
            connect_started: None,
            last_hello: None,
            last_ping: Instant::now(),
        }
    }

    pub fn bind_any(timings: ConnectionTimings) -> io::Result<Self> {
        let endpoint = NetworkEndpoint::bind("0.0.0.0:0")?;
        Ok(Self::new(endpoint, timings))
    }

    pub fn connect(&mut self, server_addr: SocketAddr) -> io::Result<()> {
        log::info!("Connecting to {}", server_addr);

        self.endpoint.reset();
        self.endpoint.set_remote(server_addr);
        self.rtt.reset();
        self.state = ConnectionState::Connecting;

        let now = Instant::now();
        self.connect_started = Some(now);
        self.send_hello(now)
    }

    pub fn disconnect(&mut self) -> io::Result<()> {
        if self.state == ConnectionState::Connected {
            self.send_payload(PacketType::Disconnect)?;
        }
        self.state = ConnectionState::Disconnected;
        self.connect_started = None;
        Ok(())
    }

    /// Drains the socket and runs link housekeeping; game payloads come back
    /// as `Receive` events in the order they arrived.
    pub fn poll(&mut self) -> io::Result<Vec<TransportEvent>> {
        let mut events = Vec::new();
        if self.state == ConnectionState::Disconnected {
            return Ok(events);
        }

        let now = Instant::now();
        let remote = self.endpoint.remote_addr();

        for (packet, addr) in self.endpoint.receive()? {
            if Some(addr) != remote {
                log::debug!("Ignoring packet from unexpected peer {}", addr);
                continue;
            }
            self.handle_packet(packet, now, &mut events);
        }

        match self.state {
            ConnectionState::Connecting => {
                let started = self.connect_started.unwrap_or(now);
                if now.duration_since(started) > self.timings.timeout {
                    log::warn!("Connection attempt timed out");
                    self.state = ConnectionState::Disconnected;
                    events.push(TransportEvent::Disconnect);
                } else if self
                    .last_hello
                    .is_none_or(|at| now.duration_since(at) >= self.timings.retry_interval)
                {
                    if let Err(e) = self.send_hello(now) {
                        log::warn!("Failed to resend hello: {}", e);
                    }
                }
            }
            ConnectionState::Connected => {
                if now.duration_since(self.endpoint.last_receive_time()) > self.timings.timeout {
                    log::warn!("Server connection lost");
                    self.state = ConnectionState::Disconnected;
                    events.push(TransportEvent::Disconnect);
                } else if now.duration_since(self.last_ping) >= self.timings.ping_interval {
                    self.last_ping = now;
                    let timestamp_ms = self.elapsed_ms(now);
                    self.send_or_log(PacketType::Ping { timestamp_ms });
                }
            }
            ConnectionState::Disconnected => {}
        }

        Ok(events)
    }

    fn handle_packet(&mut self, packet: Packet, now: Instant, events: &mut Vec<TransportEvent>) {
        if !packet.payload.is_link_control() {
            if self.state == ConnectionState::Connected {
                events.push(TransportEvent::Receive(packet));
            } else {
                log::debug!("Dropping game packet received before the link was up");
            }
            return;
        }

        match packet.payload {
            PacketType::Welcome => {
                if self.state != ConnectionState::Connecting {
                    return;
                }
                if let Some(sent) = self.connect_started {
                    self.rtt.sample(now.duration_since(sent).as_millis() as u32);
                }
                log::info!("Connection established, rtt {} ms", self.rtt.rtt_ms());
                self.state = ConnectionState::Connected;
                self.last_ping = now;
                events.push(TransportEvent::Connect);
            }
            PacketType::Pong { timestamp_ms } => {
                let sample = self.elapsed_ms(now).saturating_sub(timestamp_ms);
                self.rtt.sample(sample as u32);
                log::debug!("Ping RTT: {} ms (smoothed {} ms)", sample, self.rtt.rtt_ms());
            }
            PacketType::Ping { timestamp_ms } => {
                self.send_or_log(PacketType::Pong { timestamp_ms });
            }
            PacketType::Disconnect => {
                log::info!("Disconnected by server");
                self.state = ConnectionState::Disconnected;
                events.push(TransportEvent::Disconnect);
            }
            _ => {}
        }

        self.endpoint.stats_mut().rtt_ms = self.rtt.rtt_ms();
    }

    /// Housekeeping sends are best effort; a failure must not cost the rest
    /// of the drained batch.
    fn send_or_log(&mut self, payload: PacketType) {
        if let Err(e) = self.send_payload(payload) {
            log::warn!("Link send failed: {}", e);
        }
    }

    fn send_hello(&mut self, now: Instant) -> io::Result<()> {
        self.last_hello = Some(now);
        self.send_payload(PacketType::Hello)
    }

    fn send_payload(&mut self, payload: PacketType) -> io::Result<()> {
        let packet = self.endpoint.create_packet(payload);
        self.endpoint.send(&packet)?;
        Ok(())
    }

    fn elapsed_ms(&self, now: Instant) -> u64 {
        now.duration_since(self.epoch).as_millis() as u64
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.endpoint.local_addr()
    }

    pub fn stats(&self) -> &NetworkStats {
        self.endpoint.stats()
    }
}

impl ServerLink for ServerConnection {
    fn round_trip_ms(&self) -> u32 {
        self.rtt.rtt_ms()
    }

    fn send_join(&mut self) -> io::Result<()> {
        self.send_payload(PacketType::Join)
    }

    fn send_entity_input(
        &mut self,
        entity_id: EntityId,
        throttle: f32,
        steer: f32,
        tick: u32,
    ) -> io::Result<()> {
        self.send_payload(PacketType::EntityInput {
            entity_id,
            throttle,
            steer,
            tick,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::protocol::PacketHeader;

    /// Connected, but with no remote address every send fails.
    fn connection_without_route() -> ServerConnection {
        let endpoint = NetworkEndpoint::bind("127.0.0.1:0").unwrap();
        let mut connection = ServerConnection::new(endpoint, ConnectionTimings::default());
        connection.state = ConnectionState::Connected;
        connection
    }

    fn packet(payload: PacketType) -> Packet {
        Packet::new(PacketHeader::new(0), payload)
    }

    #[test]
    fn failed_pong_keeps_rest_of_batch() {
        let mut connection = connection_without_route();
        let now = Instant::now();
        let mut events = Vec::new();

        connection.handle_packet(packet(PacketType::Ping { timestamp_ms: 5 }), now, &mut events);
        connection.handle_packet(
            packet(PacketType::Snapshot {
                entity_id: 1,
                x: 2.0,
                y: 3.0,
                orientation: 0.0,
                tick: 40,
            }),
            now,
            &mut events,
        );

        assert_eq!(connection.stats().packets_sent, 0);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            TransportEvent::Receive(p) if matches!(p.payload, PacketType::Snapshot { tick: 40, .. })
        ));
    }

    #[test]
    fn failed_ping_does_not_fail_poll() {
        let mut connection = connection_without_route();
        connection.last_ping = Instant::now() - Duration::from_secs(1);

        let events = connection.poll().unwrap();

        assert!(events.is_empty());
        assert!(connection.is_connected());
    }
}
