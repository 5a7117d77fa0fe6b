use std::time::Instant;

/// Milliseconds per simulation tick.
pub const FIXED_DT: u32 = 20;
/// Render delay, in milliseconds, applied before sampling the history.
pub const TIMEOUT: u32 = 100;

/// Local estimate of the server clock, in milliseconds.
///
/// A time-sync exchange pins the clock to `server_time + rtt / 2` at the
/// moment it is applied; from there it runs on the local monotonic clock.
/// Every sync overwrites the previous one. Before the first sync the clock
/// counts from zero at construction, so ticks are not yet meaningful.
#[derive(Debug, Clone)]
pub struct ClockSync {
    base_ms: u32,
    anchor: Instant,
    sync_tick: u32,
    synced: bool,
}

impl Default for ClockSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSync {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(anchor: Instant) -> Self {
        Self {
            base_ms: 0,
            anchor,
            sync_tick: 0,
            synced: false,
        }
    }

    pub fn on_time_sync(&mut self, server_time_ms: u32, round_trip_ms: u32) {
        self.on_time_sync_at(server_time_ms, round_trip_ms, Instant::now());
    }

    pub fn on_time_sync_at(&mut self, server_time_ms: u32, round_trip_ms: u32, now: Instant) {
        self.base_ms = server_time_ms.wrapping_add(round_trip_ms / 2);
        self.anchor = now;
        self.sync_tick = self.base_ms / FIXED_DT;
        self.synced = true;
    }

    pub fn now_ms(&self) -> u32 {
        self.now_ms_at(Instant::now())
    }

    pub fn now_ms_at(&self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.anchor).as_millis() as u32;
        self.base_ms.wrapping_add(elapsed)
    }

    pub fn now_tick(&self) -> u32 {
        self.now_tick_at(Instant::now())
    }

    pub fn now_tick_at(&self, now: Instant) -> u32 {
        self.now_ms_at(now) / FIXED_DT
    }

    /// Tick the correction pass samples, `TIMEOUT` behind the live clock.
    pub fn interpolation_tick_at(&self, now: Instant) -> u32 {
        self.now_ms_at(now).saturating_sub(TIMEOUT) / FIXED_DT
    }

    /// Tick recorded when the last sync was applied.
    pub fn sync_tick(&self) -> u32 {
        self.sync_tick
    }

    pub fn base_ms(&self) -> u32 {
        self.base_ms
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn sync_adds_half_round_trip() {
        let now = Instant::now();
        let mut clock = ClockSync::starting_at(now);
        clock.on_time_sync_at(1000, 40, now);

        assert_eq!(clock.base_ms(), 1020);
        assert_eq!(clock.sync_tick(), 51);
        assert_eq!(clock.now_tick_at(now), 51);
        assert!(clock.is_synced());

        let mut live = ClockSync::new();
        live.on_time_sync(1000, 40);
        assert_eq!(live.now_tick(), 51);
    }

    #[test]
    fn live_clock_advances_past_sync() {
        let now = Instant::now();
        let mut clock = ClockSync::starting_at(now);
        clock.on_time_sync_at(1000, 40, now);

        let later = now + Duration::from_millis(200);
        assert_eq!(clock.now_ms_at(later), 1220);
        assert_eq!(clock.now_tick_at(later), 61);
        assert_eq!(clock.sync_tick(), 51);
        assert_eq!(clock.interpolation_tick_at(later), 56);
    }

    #[test]
    fn resync_overwrites() {
        let now = Instant::now();
        let mut clock = ClockSync::starting_at(now);
        clock.on_time_sync_at(1000, 40, now);
        clock.on_time_sync_at(500, 0, now);

        assert_eq!(clock.now_ms_at(now), 500);
        assert_eq!(clock.sync_tick(), 25);
    }

    #[test]
    fn unsynced_clock_counts_from_construction() {
        let start = Instant::now();
        let clock = ClockSync::starting_at(start);

        assert!(!clock.is_synced());
        assert_eq!(clock.now_ms_at(start + Duration::from_millis(45)), 45);
        assert_eq!(clock.interpolation_tick_at(start), 0);
    }
}
