pub const PARTICLE_GRAVITY: f32 = 20.0;
pub const AIR_RESISTANCE: f32 = 0.95;

// A single burst fragment. Only exists while its firework is exploded.
#[derive(Clone, Debug)]
pub struct Particle<C> {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub color: C,
    pub lifetime: f32,
    pub age: f32,
}

impl<C: Copy> Particle<C> {
    pub fn new(position: (f32, f32, f32), velocity: (f32, f32, f32), color: C, lifetime: f32) -> Self {
        Self {
            x: position.0,
            y: position.1,
            z: position.2,
            vx: velocity.0,
            vy: velocity.1,
            vz: velocity.2,
            color,
            lifetime,
            age: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32, gravity: f32, air_resistance: f32) {
        self.vy += gravity * dt; // +y is down on screen

        // Continuous decay sampled at dt, independent of frame rate
        let damping = air_resistance.powf(dt);
        self.vx *= damping;
        self.vy *= damping;
        self.vz *= damping;

        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.z += self.vz * dt;

        self.age += dt;
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    // Pinhole projection, camera looking at (center_x, center_y) from
    // camera_distance in front of z = 0. None on or behind the camera plane.
    pub fn project(&self, camera_distance: f32, center_x: f32, center_y: f32) -> Option<(i32, i32)> {
        let z_offset = self.z + camera_distance;
        if z_offset <= 0.0 {
            return None;
        }

        // 1.0 on the screen plane, < 1.0 further away
        let scale = camera_distance / z_offset;
        let screen_x = center_x + (self.x - center_x) * scale;
        let screen_y = center_y + (self.y - center_y) * scale;

        Some((screen_x as i32, screen_y as i32)) // truncates toward zero
    }
}
