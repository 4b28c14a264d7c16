use super::Physics;
use super::particle::Particle;
use crate::surface::Surface;
use log::debug;
use std::collections::VecDeque;
use std::f32::consts::PI;

// Saturated neon palette, one entry per firework
const NEON_COLORS: [(u8, u8, u8); 10] = [
    (255, 0, 255), // Magenta
    (0, 255, 255), // Cyan
    (255, 255, 0), // Yellow
    (255, 0, 128), // Hot pink
    (0, 255, 128), // Spring green
    (255, 128, 0), // Orange
    (128, 0, 255), // Purple
    (255, 0, 0),   // Red
    (0, 255, 0),   // Green
    (0, 128, 255), // Light blue
];

pub const TRAIL_LENGTH: usize = 15;

const LAUNCH_VX: (f32, f32) = (-20.0, 20.0);
const LAUNCH_VY: (f32, f32) = (-150.0, -120.0);
const PARTICLE_COUNT: (usize, usize) = (270, 450);
const EXPLOSION_SPEED: (f32, f32) = (25.0, 40.0);
const LIFETIME_BASE: (f32, f32) = (1.8, 2.5);
const LIFETIME_JITTER: (f32, f32) = (-0.2, 0.2);

pub(crate) fn uniform(rng: &mut fastrand::Rng, (lo, hi): (f32, f32)) -> f32 {
    lo + rng.f32() * (hi - lo)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Launching,
    Exploded,
    Finished,
}

pub struct Firework<C> {
    // Single body until the burst, z stays 0
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    color: C,
    exploded: bool,
    particles: Vec<Particle<C>>,
    trail: VecDeque<(f32, f32)>, // last TRAIL_LENGTH positions, oldest first
    physics: Physics,
}

impl<C: Copy + PartialEq> Firework<C> {
    // Random spot along the bottom row, strong upward kick
    pub fn new<S>(width: usize, height: usize, physics: Physics, rng: &mut fastrand::Rng) -> Self
    where
        S: Surface<Color = C>,
    {
        let (r, g, b) = NEON_COLORS[rng.usize(0..NEON_COLORS.len())];
        let color = S::rgb_color(r, g, b);

        let x = uniform(rng, (width as f32 * 0.2, width as f32 * 0.8));
        let y = height as f32 - 1.0;
        let vx = uniform(rng, LAUNCH_VX);
        let vy = uniform(rng, LAUNCH_VY);

        Self::launch(x, y, vx, vy, color, physics)
    }

    pub fn launch(x: f32, y: f32, vx: f32, vy: f32, color: C, physics: Physics) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            color,
            exploded: false,
            particles: Vec::new(),
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
            physics,
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.exploded, self.particles.is_empty()) {
            (false, _) => Phase::Launching,
            (true, false) => Phase::Exploded,
            (true, true) => Phase::Finished,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.exploded && self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle<C>] {
        &self.particles
    }

    #[cfg(test)]
    pub fn trail(&self) -> &VecDeque<(f32, f32)> {
        &self.trail
    }

    pub fn update(&mut self, dt: f32, rng: &mut fastrand::Rng) {
        if !self.exploded {
            // The shell is a flat body, no drag on the way up
            self.vy += self.physics.launch_gravity * dt;
            self.x += self.vx * dt;
            self.y += self.vy * dt;

            self.trail.push_back((self.x, self.y));
            if self.trail.len() > TRAIL_LENGTH {
                self.trail.pop_front();
            }

            // Close enough to the apex
            if self.vy > self.physics.apex_threshold {
                self.explode(rng);
            }
        } else {
            let Physics {
                particle_gravity,
                air_resistance,
                ..
            } = self.physics;
            self.particles.retain_mut(|particle| {
                particle.update(dt, particle_gravity, air_resistance);
                particle.is_alive()
            });
        }
    }

    pub fn explode(&mut self, rng: &mut fastrand::Rng) {
        self.exploded = true;

        let count = rng.usize(PARTICLE_COUNT.0..=PARTICLE_COUNT.1);
        let speed = uniform(rng, EXPLOSION_SPEED);
        debug!(
            "firework exploding at ({:.1}, {:.1}) with {} particles, speed {:.1}",
            self.x, self.y, count, speed
        );

        self.particles.reserve_exact(count);
        for _ in 0..count {
            // Uniform angles, so a little denser at the poles
            let theta = rng.f32() * 2.0 * PI;
            let phi = rng.f32() * PI;

            let velocity = (
                speed * phi.sin() * theta.cos(),
                speed * phi.cos(),
                speed * phi.sin() * theta.sin(),
            );
            // Roughly 1.6 to 2.7 seconds
            let lifetime = uniform(rng, LIFETIME_BASE) + uniform(rng, LIFETIME_JITTER);

            self.particles
                .push(Particle::new((self.x, self.y, 0.0), velocity, self.color, lifetime));
        }
    }

    pub fn render<S>(&self, surface: &mut S, points: &mut Vec<(i32, i32)>)
    where
        S: Surface<Color = C>,
    {
        let width = surface.width() as f32;
        let height = surface.height() as f32;
        points.clear();

        if !self.exploded {
            // Launch streak, off-canvas points dropped before submitting
            points.extend(
                self.trail
                    .iter()
                    .filter(|&&(x, y)| x >= 0.0 && x < width && y >= 0.0 && y < height)
                    .map(|&(x, y)| (x as i32, y as i32)),
            );
            if !points.is_empty() {
                surface.plot(self.color, points);
            }
            return;
        }

        let center_x = width / 2.0;
        let center_y = height / 2.0;
        let (w, h) = (surface.width() as i32, surface.height() as i32);
        let mut batch_color = self.color;

        for particle in &self.particles {
            // Behind the camera
            let Some((x, y)) = particle.project(self.physics.camera_distance, center_x, center_y)
            else {
                continue;
            };
            if x < 0 || x >= w || y < 0 || y >= h {
                continue;
            }

            // A color change closes the current batch
            if particle.color != batch_color {
                if !points.is_empty() {
                    surface.plot(batch_color, points);
                    points.clear();
                }
                batch_color = particle.color;
            }
            points.push((x, y));
        }

        if !points.is_empty() {
            surface.plot(batch_color, points);
        }
    }
}
