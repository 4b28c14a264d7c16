use crate::surface::Surface;
use log::debug;

pub mod firework;
pub mod pacing;
pub mod particle;

use firework::{Firework, Phase, uniform};

// Seconds between launches, re-rolled after every launch
const SPAWN_INTERVAL: (f32, f32) = (0.5, 1.5);

// Keeps f32 time precise on long runs
const TIME_WRAP: f32 = 10000.0;

// Tunable constants of the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    pub launch_gravity: f32,
    // Burst once vy rises above this, an approximate apex that shifts with dt
    pub apex_threshold: f32,
    pub particle_gravity: f32,
    pub air_resistance: f32,
    pub camera_distance: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            launch_gravity: 100.0,
            apex_threshold: -20.0,
            particle_gravity: particle::PARTICLE_GRAVITY,
            air_resistance: particle::AIR_RESISTANCE,
            camera_distance: 200.0,
        }
    }
}

// Owns every firework in flight and decides when to launch the next one.
pub struct Show<S: Surface> {
    width: usize,
    height: usize,
    background: S::Color,
    physics: Physics,
    rng: fastrand::Rng,
    fireworks: Vec<Firework<S::Color>>,
    elapsed: f32,
    last_spawn_time: f32,
    spawn_interval: f32,
    spawned: u64,
    points: Vec<(i32, i32)>,
}

impl<S: Surface> Show<S> {
    pub fn new(width: usize, height: usize, background: S::Color, physics: Physics, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let spawn_interval = uniform(&mut rng, SPAWN_INTERVAL);

        Self {
            width,
            height,
            background,
            physics,
            rng,
            fireworks: Vec::new(),
            elapsed: 0.0,
            last_spawn_time: 0.0,
            spawn_interval,
            spawned: 0,
            points: Vec::new(),
        }
    }

    // Future launches use the new canvas size. Shells already in flight keep
    // their course and are clipped by the surface bounds.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn fireworks(&self) -> &[Firework<S::Color>] {
        &self.fireworks
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[cfg(test)]
    pub fn last_spawn_time(&self) -> f32 {
        self.last_spawn_time
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn particle_count(&self) -> usize {
        self.fireworks().iter().map(|fw| fw.particles().len()).sum()
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed > TIME_WRAP {
            self.elapsed -= TIME_WRAP;
            self.last_spawn_time -= TIME_WRAP;
        }

        // Launch schedule
        if self.elapsed - self.last_spawn_time > self.spawn_interval {
            let firework =
                Firework::new::<S>(self.width, self.height, self.physics, &mut self.rng);
            self.fireworks.push(firework);
            self.spawned += 1;
            self.last_spawn_time = self.elapsed;
            self.spawn_interval = uniform(&mut self.rng, SPAWN_INTERVAL);

            let climbing = self
                .fireworks
                .iter()
                .filter(|fw| fw.phase() == Phase::Launching)
                .count();
            debug!(
                "launched firework #{} at {:.2}s ({} climbing, {} total), next in {:.2}s",
                self.spawned,
                self.elapsed,
                climbing,
                self.fireworks.len(),
                self.spawn_interval
            );
        }

        // Every update lands before anything is drawn
        for firework in &mut self.fireworks {
            firework.update(dt, &mut self.rng);
        }

        // In place, keeps render order
        self.fireworks.retain(|fw| !fw.is_finished());
    }

    pub fn render(&mut self, surface: &mut S) {
        surface.clear(self.background);
        // Later entries paint over earlier ones
        for firework in &self.fireworks {
            firework.render(surface, &mut self.points);
        }
    }
}
