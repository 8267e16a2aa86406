use std::any::Any;

use anyhow::Result;

use super::Gfx;
use crate::component::{Component, ComponentHeader, ComponentParent, Phases};
use crate::cosmetic::{EmitterConfig, ParticleEmitter};
use crate::render::RenderTarget;

/// Emits particle waves from the parent's middle point.
pub struct EmitterComponent {
    header: ComponentHeader,
    emitter: ParticleEmitter,
}

impl EmitterComponent {
    pub fn new(name: impl Into<String>, config: EmitterConfig) -> Self {
        Self {
            header: ComponentHeader::gfx(name),
            emitter: ParticleEmitter::new(config),
        }
    }

    pub fn with_seed(name: impl Into<String>, config: EmitterConfig, seed: u64) -> Self {
        Self {
            header: ComponentHeader::gfx(name),
            emitter: ParticleEmitter::with_seed(config, seed),
        }
    }

    pub fn emitter(&self) -> &ParticleEmitter {
        &self.emitter
    }

    pub fn emitter_mut(&mut self) -> &mut ParticleEmitter {
        &mut self.emitter
    }
}

impl Component for EmitterComponent {
    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn phases(&self) -> Phases {
        Phases::TICK | Phases::DRAW
    }

    fn on_fixed_tick(&mut self, parent: &mut ComponentParent) {
        self.emitter.tick(parent.middle());
    }

    fn draw(&mut self, _parent: &ComponentParent, target: &mut dyn RenderTarget) -> Result<()> {
        self.emitter.draw(target)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Gfx for EmitterComponent {
    /// Stopping also clears live particles so a restart begins with a fresh wave.
    fn end_gfx(&mut self) {
        self.disable();
        self.emitter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;
    use crate::render::DrawList;

    #[test]
    fn emits_only_while_running() {
        let config = EmitterConfig::new().with_waves(4, 0).with_lifetime(20);
        let mut sparks = EmitterComponent::with_seed("sparks", config, 11);
        let mut parent = ComponentParent::new("torch", Transform::new(0.0, 0.0, 8.0, 8.0));

        assert!(!sparks.is_enabled());
        sparks.start_gfx();
        sparks.on_fixed_tick(&mut parent);
        assert_eq!(sparks.emitter().particles().len(), 4);

        let mut target = DrawList::new();
        sparks.draw(&parent, &mut target).unwrap();
        assert_eq!(target.len(), 4);

        sparks.end_gfx();
        assert!(!sparks.is_enabled());
        assert!(sparks.emitter().particles().is_empty());
    }
}
