use rkyv::{Archive, Deserialize, Serialize, rancor};

pub const MAX_PACKET_SIZE: usize = 1200;
pub const PROTOCOL_VERSION: u32 = 1;
pub const PROTOCOL_MAGIC: u32 = 0x4452_4654;
pub const DEFAULT_PORT: u16 = 10131;

pub type EntityId = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct PacketHeader {
    pub magic: u32,
    pub version: u32,
    pub sequence: u32,
}

impl PacketHeader {
    pub fn new(sequence: u32) -> Self {
        Self {
            magic: PROTOCOL_MAGIC,
            version: PROTOCOL_VERSION,
            sequence,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == PROTOCOL_MAGIC && self.version == PROTOCOL_VERSION
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum PacketType {
    // Link management, handled by the connection layer.
    Hello,
    Welcome,
    Ping {
        timestamp_ms: u64,
    },
    Pong {
        timestamp_ms: u64,
    },
    Disconnect,

    // Client to server.
    Join,
    EntityInput {
        entity_id: EntityId,
        throttle: f32,
        steer: f32,
        tick: u32,
    },

    // Server to client.
    NewEntity {
        entity_id: EntityId,
        color: u32,
        x: f32,
        y: f32,
        orientation: f32,
    },
    SetControlledEntity {
        entity_id: EntityId,
    },
    Snapshot {
        entity_id: EntityId,
        x: f32,
        y: f32,
        orientation: f32,
        tick: u32,
    },
    TimeSync {
        server_time_ms: u32,
    },
}

impl PacketType {
    /// True for payloads owned by the connection layer rather than the game.
    pub fn is_link_control(&self) -> bool {
        matches!(
            self,
            Self::Hello
                | Self::Welcome
                | Self::Ping { .. }
                | Self::Pong { .. }
                | Self::Disconnect
        )
    }
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct Packet {
    pub header: PacketHeader,
    pub payload: PacketType,
}

#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    #[error("serialization failed: {0}")]
    Serialize(rancor::Error),
    #[error("deserialization failed: {0}")]
    Deserialize(rancor::Error),
}

impl Packet {
    pub fn new(header: PacketHeader, payload: PacketType) -> Self {
        Self { header, payload }
    }

    pub fn serialize(&self) -> Result<Vec<u8>, PacketError> {
        rkyv::to_bytes::<rancor::Error>(self)
            .map(|aligned| aligned.into_vec())
            .map_err(PacketError::Serialize)
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, PacketError> {
        rkyv::from_bytes::<Self, rancor::Error>(data).map_err(PacketError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_payload_survives_codec() {
        let packet = Packet::new(
            PacketHeader::new(7),
            PacketType::Snapshot {
                entity_id: 3,
                x: 12.5,
                y: -4.0,
                orientation: 1.25,
                tick: 901,
            },
        );

        let bytes = packet.serialize().unwrap();
        assert!(bytes.len() <= MAX_PACKET_SIZE);

        let decoded = Packet::deserialize(&bytes).unwrap();
        assert_eq!(decoded.header, packet.header);
        assert_eq!(decoded.payload, packet.payload);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Packet::deserialize(&[0xff; 5]).is_err());
    }

    #[test]
    fn header_validation() {
        let mut header = PacketHeader::new(0);
        assert!(header.is_valid());

        header.version += 1;
        assert!(!header.is_valid());
    }

    #[test]
    fn link_control_split() {
        assert!(PacketType::Welcome.is_link_control());
        assert!(PacketType::Pong { timestamp_ms: 1 }.is_link_control());
        assert!(!PacketType::TimeSync { server_time_ms: 0 }.is_link_control());
        assert!(!PacketType::Join.is_link_control());
    }
}
