mod connection;
mod endpoint;
mod protocol;
mod stats;

pub use connection::{
    ConnectionState, ConnectionTimings, ServerConnection, ServerLink, TransportEvent,
};
pub use endpoint::NetworkEndpoint;
pub use protocol::{
    DEFAULT_PORT, EntityId, MAX_PACKET_SIZE, PROTOCOL_MAGIC, PROTOCOL_VERSION,
    Packet, PacketError, PacketHeader, PacketType,
};
pub use stats::{DEFAULT_ROUND_TRIP_MS, NetworkStats, RttEstimator};
