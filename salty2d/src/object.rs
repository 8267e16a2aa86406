use anyhow::Result;

use crate::collider::ColliderComponent;
use crate::component::{CollisionEvent, Component, ComponentContainer, ComponentParent};
use crate::components::RecalculateMiddleComponent;
use crate::math::{Direction, Transform};
use crate::render::RenderTarget;

/// Identifier handed out by a [`World`](crate::world::World) when an object is spawned.
///
/// `ObjectId::default()` marks an object that has not been spawned yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    /// Get the underlying integer ID (useful for debugging or serialization).
    pub fn to_u32(self) -> u32 {
        self.0
    }
}

pub const MIDDLE_COMPONENT_NAME: &str = "recalculate-middle";
pub const DEFAULT_COLLIDER_NAME: &str = "default-collider";

/// An entity in a scene: parent state, ordered components and an optional collider.
///
/// Every object starts with a [`RecalculateMiddleComponent`] in front of its
/// component list, so the middle point is fresh before any other component
/// ticks, and with a hitbox collider covering its transform.
#[derive(Debug)]
pub struct GameObject {
    id: ObjectId,
    parent: ComponentParent,
    components: ComponentContainer,
    collider: Option<ColliderComponent>,
}

impl GameObject {
    pub fn new(tag: impl Into<String>, transform: Transform) -> Self {
        let mut components = ComponentContainer::new();
        components.add(RecalculateMiddleComponent::new(MIDDLE_COMPONENT_NAME));

        Self {
            id: ObjectId::default(),
            parent: ComponentParent::new(tag, transform),
            components,
            collider: Some(ColliderComponent::hitbox(DEFAULT_COLLIDER_NAME)),
        }
    }

    /// Attach a component. Returns `self` for chained construction.
    #[must_use]
    pub fn with_component<C: Component>(mut self, component: C) -> Self {
        self.components.add(component);
        self
    }

    #[must_use]
    pub fn with_collider(mut self, collider: Option<ColliderComponent>) -> Self {
        self.collider = collider;
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ObjectId) {
        self.id = id;
    }

    pub fn tag(&self) -> &str {
        self.parent.tag()
    }

    pub fn parent(&self) -> &ComponentParent {
        &self.parent
    }

    pub fn parent_mut(&mut self) -> &mut ComponentParent {
        &mut self.parent
    }

    pub fn transform(&self) -> &Transform {
        self.parent.transform()
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        self.parent.transform_mut()
    }

    pub fn add_component<C: Component>(&mut self, component: C) {
        self.components.add(component);
    }

    /// Detach the first component called `name`. Core components stay.
    pub fn remove_component(&mut self, name: &str) -> Option<Box<dyn Component>> {
        self.components.remove(name)
    }

    pub fn component<T: Component>(&self, name: &str) -> Option<&T> {
        self.components.get(name)
    }

    pub fn component_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        self.components.get_mut(name)
    }

    pub fn components(&self) -> &ComponentContainer {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentContainer {
        &mut self.components
    }

    pub fn collider(&self) -> Option<&ColliderComponent> {
        self.collider.as_ref()
    }

    pub fn collider_mut(&mut self) -> Option<&mut ColliderComponent> {
        self.collider.as_mut()
    }

    pub fn set_collider(&mut self, collider: Option<ColliderComponent>) {
        self.collider = collider;
    }

    /// Whether this object's collider overlaps `other`. `false` without a collider.
    pub fn request_collision(&self, other: &GameObject) -> bool {
        self.collider
            .as_ref()
            .is_some_and(|c| c.request_collision(&self.parent, other))
    }

    /// Side of this object that `other` touches, from the collider shapes.
    pub fn collision_direction(&self, other: &GameObject) -> Option<Direction> {
        match &self.collider {
            Some(collider) => collider.collision_direction(&self.parent, other),
            None => self.transform().relation(other.transform()),
        }
    }

    /// One simulation step: every enabled ticking component, in insertion order.
    pub fn fixed_tick(&mut self) {
        self.components.fixed_tick(&mut self.parent);
    }

    /// Render pass for this object's enabled drawing components.
    pub fn draw(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        self.components.draw(&self.parent, target)
    }

    pub fn on_collision(&mut self, event: &CollisionEvent) {
        self.components.collide(&mut self.parent, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::tests::Recorder;
    use crate::component::{ComponentKind, Phases};
    use crate::math::Vector2f;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn middle_is_fresh_before_other_components_tick() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut obj = GameObject::new("player", Transform::new(0.0, 0.0, 4.0, 6.0))
            .with_component(Recorder::new("reader", Phases::TICK, log.clone()));

        obj.transform_mut().position = Vector2f::new(10.0, 20.0);
        obj.fixed_tick();

        assert_eq!(obj.parent().middle(), Vector2f::new(12.0, 23.0));
        assert_eq!(*log.borrow(), vec!["reader:tick:12,23".to_string()]);
    }

    #[test]
    fn core_middle_component_cannot_be_removed() {
        let mut obj = GameObject::new("player", Transform::zero());
        assert!(obj.remove_component(MIDDLE_COMPONENT_NAME).is_none());
        assert_eq!(obj.components().len(), 1);
    }

    #[test]
    fn middle_keeps_updating_when_everything_is_disabled() {
        let mut obj = GameObject::new("player", Transform::new(0.0, 0.0, 4.0, 6.0))
            .with_component(Recorder::new("reader", Phases::TICK, Rc::new(RefCell::new(Vec::new()))));
        obj.components_mut().iter_mut().for_each(|c| c.disable());

        let middle = obj.components().get::<RecalculateMiddleComponent>(MIDDLE_COMPONENT_NAME).unwrap();
        assert!(middle.is_enabled());
        assert!(!obj.components().get::<Recorder>("reader").unwrap().is_enabled());

        obj.transform_mut().position = Vector2f::new(10.0, 20.0);
        obj.fixed_tick();
        assert_eq!(obj.parent().middle(), Vector2f::new(12.0, 23.0));
    }

    #[test]
    fn default_collider_is_a_hitbox() {
        let obj = GameObject::new("crate", Transform::new(0.0, 0.0, 1.0, 1.0));
        let collider = obj.collider().unwrap();
        assert_eq!(collider.name(), DEFAULT_COLLIDER_NAME);
        assert_eq!(collider.collider_kind(), crate::collider::ColliderKind::Hitbox);
        assert_eq!(collider.kind(), ComponentKind::Collider);
    }
}
