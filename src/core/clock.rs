use std::time::Instant;

/// Seconds between FPS readout refreshes
pub const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Frame clock - tracks delta time and a once-per-interval FPS average
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
    frame_count: u32,
    fps_timer: f32,
    fps: f32,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            frame_count: 0,
            fps_timer: 0.0,
            fps: 0.0,
        }
    }

    /// Get delta time since last tick and advance clock.
    /// Returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.record_frame(delta);
        delta
    }

    /// Count a frame of `delta` seconds towards the FPS average
    pub fn record_frame(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_timer += delta;

        if self.fps_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_timer;
            log::debug!("FPS: {:.1}", self.fps);
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }
    }

    /// Last completed FPS average, zero until the first interval elapses
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
