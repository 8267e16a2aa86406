use std::any::Any;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::component::{Component, ComponentHeader, ComponentParent, Phases};
use crate::cosmetic::{position_relative_to, Light, LightSystem, RelationMode, SharedLight};
use crate::error::EngineError;
use crate::math::Transform;

/// Cosmetic components. They are created disabled and only run between
/// [`start_gfx`](Gfx::start_gfx) and [`end_gfx`](Gfx::end_gfx).
pub trait Gfx: Component {
    fn start_gfx(&mut self) {
        self.enable();
    }

    fn end_gfx(&mut self) {
        self.disable();
    }
}

/// Owns a light, registers it with the scene's light system and keeps it
/// positioned relative to the parent.
pub struct LightComponent {
    header: ComponentHeader,
    light: SharedLight,
    relation: RelationMode,
}

impl LightComponent {
    /// Fails with [`EngineError::Configuration`] when the scene has no light system.
    pub fn new(name: impl Into<String>, lights: Option<&LightSystem>, light: Light) -> Result<Self, EngineError> {
        let name = name.into();
        let lights = lights.ok_or_else(|| {
            EngineError::Configuration(format!(
                "light component \"{}\" needs a light system, but the scene has none",
                name
            ))
        })?;

        let light = Rc::new(RefCell::new(light));
        lights.add_light(&light);

        Ok(Self {
            header: ComponentHeader::gfx(name),
            light,
            relation: RelationMode::default(),
        })
    }

    /// Point light covering `transform`, usually the parent's.
    pub fn point(name: impl Into<String>, lights: Option<&LightSystem>, transform: Transform) -> Result<Self, EngineError> {
        Self::new(name, lights, Light::point(transform))
    }

    #[must_use]
    pub fn with_relation(mut self, relation: RelationMode) -> Self {
        self.relation = relation;
        self
    }

    pub fn relation(&self) -> RelationMode {
        self.relation
    }

    pub fn set_relation(&mut self, relation: RelationMode) {
        self.relation = relation;
    }

    pub fn light(&self) -> Ref<'_, Light> {
        self.light.borrow()
    }

    /// Shared handle, for changing brightness or color at runtime.
    pub fn light_handle(&self) -> SharedLight {
        Rc::clone(&self.light)
    }
}

impl Component for LightComponent {
    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn phases(&self) -> Phases {
        Phases::TICK
    }

    fn on_fixed_tick(&mut self, parent: &mut ComponentParent) {
        let mut light = self.light.borrow_mut();
        position_relative_to(self.relation, parent.transform(), &mut light.transform);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Gfx for LightComponent {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentContainer;
    use crate::math::Vector2f;

    #[test]
    fn fails_without_light_system() {
        let result = LightComponent::point("glow", None, Transform::zero());
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn registers_light_and_starts_disabled() {
        let system = LightSystem::new();
        let light = LightComponent::point("glow", Some(&system), Transform::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(!light.is_enabled());
        assert_eq!(system.len(), 1);

        drop(light);
        assert!(system.is_empty());
    }

    #[test]
    fn follows_parent_once_started() {
        let system = LightSystem::new();
        let mut container = ComponentContainer::new();
        container.add(LightComponent::new("glow", Some(&system), Light::point_at(Vector2f::ZERO, 4.0)).unwrap());

        let mut parent = ComponentParent::new("lamp", Transform::new(10.0, 10.0, 20.0, 20.0));
        container.fixed_tick(&mut parent);
        assert_eq!(container.get::<LightComponent>("glow").unwrap().light().transform.position, Vector2f::ZERO);

        container.get_mut::<LightComponent>("glow").unwrap().start_gfx();
        container.fixed_tick(&mut parent);
        assert_eq!(
            container.get::<LightComponent>("glow").unwrap().light().transform.position,
            Vector2f::new(18.0, 18.0)
        );
    }
}
