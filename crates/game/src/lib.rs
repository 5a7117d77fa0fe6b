pub mod net;
pub mod simulation;
pub mod snapshot;

pub use net::{
    ConnectionState, ConnectionTimings, DEFAULT_PORT, EntityId, NetworkEndpoint, NetworkStats,
    Packet, PacketError, PacketHeader, PacketType, RttEstimator, ServerConnection, ServerLink,
    TransportEvent,
};
pub use simulation::{ClockSync, FIXED_DT, MotionInput, Pose, TIMEOUT};
pub use snapshot::{Color, Entity, EntityStore, HISTORY_CAPACITY, Snapshot, SnapshotHistory};
