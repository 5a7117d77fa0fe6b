mod input;

pub use input::{DirectionalKeys, KeyTracker};
