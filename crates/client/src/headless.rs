use std::thread;
use std::time::{Duration, Instant};

use drift::MotionInput;

use crate::net::NetworkClient;

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the frame loop without a terminal: neutral input, pose logged once a
/// second. Stops after `frames` frames when given.
pub fn run(client: &mut NetworkClient, frames: Option<u64>) -> anyhow::Result<()> {
    let frame_budget = client.config().frame_duration();
    let mut last_frame = Instant::now();
    let mut last_report = last_frame;
    let mut frame_count = 0u64;

    while frames.is_none_or(|limit| frame_count < limit) {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame).as_secs_f32();
        last_frame = frame_start;

        if let Err(e) = client.update(dt, MotionInput::default()) {
            log::error!("Network update error: {}", e);
        }
        frame_count += 1;

        if frame_start.duration_since(last_report) >= REPORT_INTERVAL {
            last_report = frame_start;
            report(client);
        }

        if let Some(remaining) = frame_budget.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    log::info!("Stopping after {} frames", frame_count);
    Ok(())
}

fn report(client: &NetworkClient) {
    let session = client.session();
    match session.controlled_entity() {
        Some(entity) => log::info!(
            "tick {} | entity {} at ({:.2}, {:.2}) ori {:.2} speed {:.2} | history {} | rtt {} ms",
            session.clock().now_tick(),
            entity.id,
            entity.position.x,
            entity.position.y,
            entity.orientation,
            entity.speed,
            session.history().len(),
            client.round_trip_ms(),
        ),
        None => log::info!(
            "{:?}, {} entities known, no controlled entity yet",
            client.state(),
            session.entities().len()
        ),
    }
}
