use std::thread;
use std::time::{Duration, Instant};

// Holds each frame to a fixed wall-clock budget.
pub struct FramePacer {
    budget: Duration,
    last_frame: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            budget: Duration::from_nanos(1_000_000_000 / fps.max(1) as u64),
            last_frame: Instant::now(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    // Sleeps out whatever is left of the frame budget and returns the
    // seconds since the previous frame.
    pub fn wait(&mut self) -> f32 {
        let mut now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        if elapsed < self.budget {
            thread::sleep(self.budget - elapsed);
            now = Instant::now();
        }

        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt
    }
}
