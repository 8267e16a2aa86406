//! Lights, particles and shapes layered on top of the component model.

mod light;
mod particles;
pub mod shape;

pub use light::{
    position_relative_to, Light, LightShape, LightSystem, RelationMode, SharedLight,
    DEFAULT_BRIGHTNESS, GRADIENT_RINGS,
};
pub use particles::{EmitterConfig, Particle, ParticleEmitter};
pub use shape::{Shape, ShapeKind};
