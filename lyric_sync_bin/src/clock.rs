use std::time::Instant;

/// Wall-clock stand-in for an audio element's `currentTime`.
pub struct PlaybackClock {
    started: Instant,
    offset: f64,
    speed: f64,
}

impl PlaybackClock {
    /// Starts counting from `offset` seconds, advancing `speed` song
    /// seconds per real second.
    pub fn start(offset: f64, speed: f64) -> Self {
        Self {
            started: Instant::now(),
            offset,
            speed,
        }
    }

    pub fn now(&self) -> f64 {
        self.offset + self.started.elapsed().as_secs_f64() * self.speed
    }
}
