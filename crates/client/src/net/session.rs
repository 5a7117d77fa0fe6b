use std::time::Instant;

use glam::Vec2;

use drift::simulation::{self, ClockSync, MotionInput};
use drift::{
    Color, Entity, EntityId, EntityStore, Packet, PacketType, ServerLink, Snapshot,
    SnapshotHistory, TransportEvent,
};

/// Everything the client knows about the match. The dispatcher and the frame
/// step are the only writers.
#[derive(Debug, Default)]
pub struct Session {
    entities: EntityStore,
    controlled: Option<EntityId>,
    history: SnapshotHistory,
    clock: ClockSync,
    connected: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one transport event. Outbound failures are logged and never
    /// interrupt the session.
    pub fn handle_event<L: ServerLink>(&mut self, event: TransportEvent, link: &mut L) {
        match event {
            TransportEvent::Connect => {
                self.connected = true;
                if let Err(e) = link.send_join() {
                    log::warn!("Failed to send join: {}", e);
                }
            }
            TransportEvent::Receive(packet) => {
                self.handle_packet(packet, link.round_trip_ms());
            }
            TransportEvent::Disconnect => {
                self.connected = false;
            }
        }
    }

    /// Consumes `packet`; nothing from it outlives this call.
    fn handle_packet(&mut self, packet: Packet, round_trip_ms: u32) {
        match packet.payload {
            PacketType::NewEntity {
                entity_id,
                color,
                x,
                y,
                orientation,
            } => {
                let entity = Entity::new(entity_id, Color(color), Vec2::new(x, y), orientation);
                if self.entities.upsert(entity) {
                    log::debug!("New entity {}", entity_id);
                }
            }
            PacketType::SetControlledEntity { entity_id } => {
                log::info!("Controlling entity {}", entity_id);
                self.controlled = Some(entity_id);
            }
            PacketType::Snapshot {
                entity_id,
                x,
                y,
                orientation,
                tick,
            } => {
                self.on_snapshot(entity_id, Vec2::new(x, y), orientation, tick);
            }
            PacketType::TimeSync { server_time_ms } => {
                self.clock.on_time_sync(server_time_ms, round_trip_ms);
                log::info!(
                    "Clock synced to {} ms (rtt {} ms), tick {}",
                    self.clock.base_ms(),
                    round_trip_ms,
                    self.clock.sync_tick()
                );
            }
            PacketType::Hello
            | PacketType::Welcome
            | PacketType::Ping { .. }
            | PacketType::Pong { .. }
            | PacketType::Disconnect
            | PacketType::Join
            | PacketType::EntityInput { .. } => {
                log::debug!("Ignoring unexpected {:?}", packet.payload);
            }
        }
    }

    fn on_snapshot(&mut self, entity_id: EntityId, position: Vec2, orientation: f32, tick: u32) {
        let Some(entity) = self.entities.find_mut(entity_id) else {
            log::trace!("Snapshot for unknown entity {} dropped", entity_id);
            return;
        };

        if self.controlled == Some(entity_id) {
            self.history.push(Snapshot::new(position, orientation, tick));
        } else {
            entity.set_pose(position, orientation);
        }
    }

    pub fn advance<L: ServerLink>(&mut self, dt: f32, input: MotionInput, link: &mut L) {
        self.advance_at(dt, input, link, Instant::now());
    }

    /// One frame for the controlled entity: report input upstream, predict
    /// from it, then pull the result onto the delayed server trajectory.
    /// Prediction runs whether or not the input reached the server.
    pub fn advance_at<L: ServerLink>(
        &mut self,
        dt: f32,
        input: MotionInput,
        link: &mut L,
        now: Instant,
    ) {
        let Some(id) = self.controlled else {
            return;
        };
        let Some(entity) = self.entities.find_mut(id) else {
            return;
        };

        let tick = self.clock.now_tick_at(now);
        log::trace!(
            "Input thr {} steer {} at tick {}",
            input.throttle,
            input.steer,
            tick
        );
        if let Err(e) = link.send_entity_input(id, input.throttle, input.steer, tick) {
            log::warn!("Failed to send input for entity {}: {}", id, e);
        }

        simulation::step(entity, dt, input.throttle, input.steer);
        simulation::correct(entity, &self.history, self.clock.interpolation_tick_at(now));
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn controlled_id(&self) -> Option<EntityId> {
        self.controlled
    }

    pub fn controlled_entity(&self) -> Option<&Entity> {
        self.controlled.and_then(|id| self.entities.get(id))
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn clock(&self) -> &ClockSync {
        &self.clock
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
