use glam::Vec2;

use crate::snapshot::{Entity, HISTORY_CAPACITY, Snapshot, SnapshotHistory};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub orientation: f32,
}

/// Evaluates the quadratic through `(times[i], values[i])` at `t`.
///
/// The caller guarantees the three times are pairwise distinct. There is no
/// clamping: `t` outside the sampled range extrapolates.
pub fn lagrange(t: f64, times: [f64; 3], values: [f64; 3]) -> f64 {
    let [t0, t1, t2] = times;
    let [v0, v1, v2] = values;

    let l0 = (t - t1) * (t - t2) / ((t0 - t1) * (t0 - t2));
    let l1 = (t - t0) * (t - t2) / ((t1 - t0) * (t1 - t2));
    let l2 = (t - t0) * (t - t1) / ((t2 - t0) * (t2 - t1));

    v0 * l0 + v1 * l1 + v2 * l2
}

/// A window with a repeated tick has no unique quadratic through it.
pub fn is_degenerate(window: &[Snapshot; HISTORY_CAPACITY]) -> bool {
    let [a, b, c] = window;
    a.tick == b.tick || b.tick == c.tick || a.tick == c.tick
}

/// Reconstructs the pose at `tick` from the buffered samples, or `None`
/// when the history is short or degenerate.
pub fn sample(history: &SnapshotHistory, tick: f64) -> Option<Pose> {
    let window = history.window()?;
    if is_degenerate(&window) {
        return None;
    }

    let times = window.map(|s| s.tick as f64);
    let fit = |value: fn(&Snapshot) -> f32| {
        lagrange(tick, times, window.map(|s| value(&s) as f64)) as f32
    };

    Some(Pose {
        position: Vec2::new(fit(|s| s.position.x), fit(|s| s.position.y)),
        orientation: fit(|s| s.orientation),
    })
}

/// Overwrites `entity`'s pose with the reconstruction at `tick`. Leaves it
/// alone and returns `false` if no fit is possible.
pub fn correct(entity: &mut Entity, history: &SnapshotHistory, tick: u32) -> bool {
    match sample(history, tick as f64) {
        Some(pose) => {
            entity.set_pose(pose.position, pose.orientation);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Color;

    fn linear(t: f64) -> f64 {
        2.5 * t - 4.0
    }

    fn history_from(ticks: [u32; 3], value: impl Fn(f64) -> f64) -> SnapshotHistory {
        let mut history = SnapshotHistory::new();
        for tick in ticks {
            let v = value(tick as f64) as f32;
            history.push(Snapshot::new(Vec2::new(v, -v), v * 0.1, tick));
        }
        history
    }

    #[test]
    fn linear_signal_is_reproduced() {
        let times = [10.0, 13.0, 19.0];
        let values = times.map(linear);

        for t in [10.0, 11.5, 16.0, 19.0, 2.0, 40.0] {
            let estimate = lagrange(t, times, values);
            assert!((estimate - linear(t)).abs() < 1e-9, "t = {t}");
        }
    }

    #[test]
    fn quadratic_signal_is_reproduced() {
        let quad = |t: f64| 0.5 * t * t - 3.0 * t + 1.0;
        let times = [0.0, 4.0, 5.0];
        let values = times.map(quad);

        assert!((lagrange(2.0, times, values) - quad(2.0)).abs() < 1e-9);
        assert!((lagrange(8.0, times, values) - quad(8.0)).abs() < 1e-9);
    }

    #[test]
    fn each_axis_fitted_independently() {
        let history = history_from([100, 103, 109], linear);

        let pose = sample(&history, 106.0).unwrap();
        let expected = linear(106.0) as f32;
        assert!((pose.position.x - expected).abs() < 1e-3);
        assert!((pose.position.y + expected).abs() < 1e-3);
        assert!((pose.orientation - expected * 0.1).abs() < 1e-3);
    }

    #[test]
    fn short_history_leaves_entity() {
        let mut history = SnapshotHistory::new();
        history.push(Snapshot::new(Vec2::new(5.0, 5.0), 1.0, 1));
        history.push(Snapshot::new(Vec2::new(6.0, 6.0), 1.0, 2));

        let mut entity = Entity::new(1, Color::default(), Vec2::new(-1.0, -1.0), 0.25);
        let before = entity.clone();

        assert!(!correct(&mut entity, &history, 2));
        assert_eq!(entity, before);
    }

    #[test]
    fn coincident_ends_are_skipped() {
        let history = history_from([10, 12, 10], linear);
        let mut entity = Entity::new(1, Color::default(), Vec2::new(3.0, 4.0), 0.5);
        let before = entity.clone();

        assert!(sample(&history, 11.0).is_none());
        assert!(!correct(&mut entity, &history, 11));
        assert_eq!(entity, before);
    }

    #[test]
    fn coincident_neighbours_are_skipped() {
        let history = history_from([10, 10, 14], linear);
        let mut entity = Entity::new(1, Color::default(), Vec2::new(3.0, 4.0), 0.5);

        assert!(!correct(&mut entity, &history, 12));
        assert_eq!(entity.position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn correction_overwrites_prediction() {
        let history = history_from([20, 21, 23], linear);
        let mut entity = Entity::new(1, Color::default(), Vec2::new(99.0, 99.0), 2.0);
        entity.speed = 4.0;

        assert!(correct(&mut entity, &history, 22));
        let expected = linear(22.0) as f32;
        assert!((entity.position.x - expected).abs() < 1e-3);
        assert_eq!(entity.speed, 4.0);
    }
}
