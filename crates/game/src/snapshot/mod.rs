mod entity;
mod history;
mod store;

pub use entity::{Color, Entity};
pub use history::{HISTORY_CAPACITY, Snapshot, SnapshotHistory};
pub use store::EntityStore;
