use glam::Vec2;

use crate::snapshot::Entity;

pub const MAX_SPEED: f32 = 10.0;
pub const MAX_REVERSE_THROTTLE: f32 = -0.3;
pub const ACCELERATION: f32 = 3.0;
pub const BRAKING: f32 = 12.0;
pub const STEER_RATE: f32 = 0.3;
pub const STEER_SPEED_LIMIT: f32 = 2.0;

/// Control axes for one frame, each in `{-1, 0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionInput {
    pub throttle: f32,
    pub steer: f32,
}

impl MotionInput {
    pub fn new(throttle: f32, steer: f32) -> Self {
        Self { throttle, steer }
    }

    /// Opposite keys held together cancel out.
    pub fn from_keys(up: bool, down: bool, left: bool, right: bool) -> Self {
        let axis = |positive: bool, negative: bool| {
            (if positive { 1.0 } else { 0.0 }) + (if negative { -1.0 } else { 0.0 })
        };
        Self {
            throttle: axis(up, down),
            steer: axis(right, left),
        }
    }
}

/// Records the controls on `entity` and integrates it forward by `dt` seconds.
pub fn step(entity: &mut Entity, dt: f32, throttle: f32, steer: f32) {
    entity.throttle = throttle;
    entity.steer = steer;
    simulate_entity(entity, dt);
}

/// Car-like integrator: speed chases the throttle target, turning scales with
/// speed, then the position moves along the new heading.
pub fn simulate_entity(entity: &mut Entity, dt: f32) {
    let braking = sign(entity.throttle) != 0.0 && sign(entity.throttle) != sign(entity.speed);
    let acceleration = if braking { BRAKING } else { ACCELERATION };

    let target_speed = entity.throttle.clamp(MAX_REVERSE_THROTTLE, 1.0) * MAX_SPEED;
    entity.speed = move_to(entity.speed, target_speed, dt, acceleration);

    entity.orientation += entity.steer
        * dt
        * entity.speed.clamp(-STEER_SPEED_LIMIT, STEER_SPEED_LIMIT)
        * STEER_RATE;

    let heading = Vec2::from_angle(entity.orientation);
    entity.position += heading * entity.speed * dt;
}

fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn move_to(from: f32, to: f32, dt: f32, rate: f32) -> f32 {
    if from < to {
        (from + rate * dt).min(to)
    } else {
        (from - rate * dt).max(to)
    }
}
