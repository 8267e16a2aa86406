use std::f32::consts::TAU;

use anyhow::Result;
use glam::Vec2;

use super::shape::{create_shape, draw_shape, ShapeKind};
use crate::math::{Dimensions, Transform, Vector2f};
use crate::render::{Color, RenderTarget};

/// A single particle. Particles move in straight lines and expire after a
/// fixed number of ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub transform: Transform,
    /// Index of the wave that spawned this particle.
    pub wave_number: u32,
    /// Distance travelled per tick.
    pub speed: f32,
    /// Unit vector the particle travels along.
    pub heading: Vector2f,
    pub color: Color,
    /// Remaining lifetime in ticks (0 = dead).
    pub remaining_ticks: u32,
    pub max_ticks: u32,
}

impl Particle {
    /// Check if the particle is alive.
    pub fn is_alive(&self) -> bool {
        self.remaining_ticks > 0
    }

    /// Get the normalized age (0.0 = just spawned, 1.0 = about to die).
    pub fn age(&self) -> f32 {
        if self.max_ticks > 0 {
            1.0 - self.remaining_ticks as f32 / self.max_ticks as f32
        } else {
            0.0
        }
    }
}

/// Configuration for how particles are spawned from an emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterConfig {
    /// Particles spawned per wave.
    pub amount_per_wave: usize,
    /// Ticks between two waves (0 = a single wave).
    pub ticks_per_wave: u32,
    /// Speed range in units per tick.
    pub speed_min: f32,
    pub speed_max: f32,
    pub particle_size: Dimensions,
    /// Lifetime in ticks.
    pub lifetime_ticks: u32,
    pub shape: ShapeKind,
    /// Initial color
    pub color_start: Color,
    /// End color (particles interpolate from start to end)
    pub color_end: Option<Color>,
    /// Whether particles should fade out over lifetime
    pub fade_out: bool,
    pub max_particles: usize,
}

impl EmitterConfig {
    /// Create a new emitter config with sensible defaults.
    pub fn new() -> Self {
        Self {
            amount_per_wave: 8,
            ticks_per_wave: 30,
            speed_min: 0.5,
            speed_max: 1.5,
            particle_size: Dimensions::new(3.0, 3.0),
            lifetime_ticks: 60,
            shape: ShapeKind::Oval,
            color_start: [1.0, 1.0, 1.0, 1.0],
            color_end: None,
            fade_out: true,
            max_particles: 1000,
        }
    }

    #[must_use]
    pub fn with_waves(mut self, amount_per_wave: usize, ticks_per_wave: u32) -> Self {
        self.amount_per_wave = amount_per_wave;
        self.ticks_per_wave = ticks_per_wave;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.speed_min = min;
        self.speed_max = max;
        self
    }

    #[must_use]
    pub fn with_lifetime(mut self, ticks: u32) -> Self {
        self.lifetime_ticks = ticks;
        self
    }

    #[must_use]
    pub fn with_particle(mut self, shape: ShapeKind, size: Dimensions) -> Self {
        self.shape = shape;
        self.particle_size = size;
        self
    }

    /// Set color (with optional end color for interpolation).
    #[must_use]
    pub fn with_color(mut self, start: Color, end: Option<Color>) -> Self {
        self.color_start = start;
        self.color_end = end;
        self
    }

    #[must_use]
    pub fn with_fade_out(mut self, fade_out: bool) -> Self {
        self.fade_out = fade_out;
        self
    }

    #[must_use]
    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.max_particles = max;
        self
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns particles in waves around an origin and advances them each tick.
#[derive(Clone, Debug)]
pub struct ParticleEmitter {
    config: EmitterConfig,
    particles: Vec<Particle>,
    ticks_until_wave: u32,
    waves_emitted: u32,
    rng: fastrand::Rng,
}

impl ParticleEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            config,
            particles: Vec::new(),
            ticks_until_wave: 0,
            waves_emitted: 0,
            rng: fastrand::Rng::new(),
        }
    }

    /// Same as [`new`](Self::new) with a fixed random seed.
    pub fn with_seed(config: EmitterConfig, seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Advance every particle by one tick, then spawn a wave at `origin` if one is due.
    pub fn tick(&mut self, origin: Vector2f) {
        for particle in &mut self.particles {
            particle.transform.position.add_vec(particle.heading * particle.speed);
            particle.remaining_ticks = particle.remaining_ticks.saturating_sub(1);

            let age = particle.age();
            if let Some(color_end) = self.config.color_end {
                for channel in 0..4 {
                    particle.color[channel] =
                        self.config.color_start[channel] * (1.0 - age) + color_end[channel] * age;
                }
            }
            if self.config.fade_out {
                let base = self.config.color_end.map_or(self.config.color_start[3], |end| {
                    self.config.color_start[3] * (1.0 - age) + end[3] * age
                });
                particle.color[3] = base * (1.0 - age);
            }
        }

        self.particles.retain(Particle::is_alive);

        let single_wave_done = self.config.ticks_per_wave == 0 && self.waves_emitted > 0;
        if self.ticks_until_wave == 0 && !single_wave_done {
            self.emit_wave(origin);
            self.ticks_until_wave = self.config.ticks_per_wave;
        } else {
            self.ticks_until_wave = self.ticks_until_wave.saturating_sub(1);
        }
    }

    fn emit_wave(&mut self, origin: Vector2f) {
        let wave_number = self.waves_emitted;
        self.waves_emitted += 1;

        for _ in 0..self.config.amount_per_wave {
            if self.particles.len() >= self.config.max_particles {
                break;
            }

            let angle = self.rng.f32() * TAU;
            let heading = Vector2f::from(Vec2::from_angle(angle));
            let speed = self.config.speed_min
                + self.rng.f32() * (self.config.speed_max - self.config.speed_min);

            let mut transform = Transform::from_parts(Vector2f::ZERO, self.config.particle_size);
            transform.set_centre(origin);

            self.particles.push(Particle {
                transform,
                wave_number,
                speed,
                heading,
                color: self.config.color_start,
                remaining_ticks: self.config.lifetime_ticks,
                max_ticks: self.config.lifetime_ticks,
            });
        }
    }

    /// Get all alive particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn waves_emitted(&self) -> u32 {
        self.waves_emitted
    }

    /// Drop every live particle and restart the wave clock.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.ticks_until_wave = 0;
        self.waves_emitted = 0;
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) -> Result<()> {
        for particle in &self.particles {
            let shape = create_shape(self.config.shape, particle.transform, None);
            draw_shape(target, &shape, true, particle.color)?;
        }
        Ok(())
    }
}
