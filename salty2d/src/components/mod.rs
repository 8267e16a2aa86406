//! Built-in components.

mod emitter;
mod gfx;
mod middle;
mod text;

pub use emitter::EmitterComponent;
pub use gfx::{Gfx, LightComponent};
pub use middle::RecalculateMiddleComponent;
pub use text::{wrap_text, TextRenderComponent, LEADING_FACTOR};
