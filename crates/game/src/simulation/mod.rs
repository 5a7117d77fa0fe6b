mod clock;
mod interpolation;
mod motion;

pub use clock::{ClockSync, FIXED_DT, TIMEOUT};
pub use interpolation::{Pose, correct, is_degenerate, lagrange, sample};
pub use motion::{MotionInput, simulate_entity, step};
