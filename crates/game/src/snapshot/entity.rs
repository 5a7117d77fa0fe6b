use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::net::EntityId;

/// Packed `0xRRGGBBAA` display color. Opaque to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Color(pub u32);

impl Color {
    pub fn rgba(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        let [r, g, b, _] = self.rgba();
        (r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub color: Color,
    pub position: Vec2,
    pub orientation: f32,
    pub speed: f32,
    pub throttle: f32,
    pub steer: f32,
}

impl Entity {
    pub fn new(id: EntityId, color: Color, position: Vec2, orientation: f32) -> Self {
        Self {
            id,
            color,
            position,
            orientation,
            speed: 0.0,
            throttle: 0.0,
            steer: 0.0,
        }
    }

    pub fn set_pose(&mut self, position: Vec2, orientation: f32) {
        self.position = position;
        self.orientation = orientation;
    }
}
