//! Component model.
//!
//! A component is a unit of behavior owned by exactly one container (a
//! [`GameObject`](crate::object::GameObject) or a UI element). Components never
//! store a pointer to their owner; the owner lends its [`ComponentParent`] state
//! to every callback instead.
//!
//! Which callbacks a component takes part in is declared up front through
//! [`Component::phases`]. The container only calls the phases a component
//! declares:
//!
//! - `TICK`: [`Component::on_fixed_tick`], only while enabled
//! - `DRAW`: [`Component::draw`], only while enabled
//! - `COLLISION`: [`Component::on_collision`], regardless of the enabled flag

use std::any::Any;

use anyhow::Result;
use bitflags::bitflags;

use crate::math::{Dimensions, Direction, Transform, Vector2f};
use crate::object::ObjectId;
use crate::render::RenderTarget;

bitflags! {
    /// The callbacks a component participates in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Phases: u8 {
        const TICK = 1 << 0;
        const DRAW = 1 << 1;
        const COLLISION = 1 << 2;
    }
}

/// Broad category of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Engine bookkeeping that other components rely on. Cannot be removed.
    Core,
    Render,
    /// Cosmetic effect, disabled until started.
    Gfx,
    Collider,
    Custom(&'static str),
}

/// State every component carries: name, kind and enabled flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentHeader {
    name: String,
    kind: ComponentKind,
    enabled: bool,
}

impl ComponentHeader {
    /// Enabled header.
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            enabled: true,
        }
    }

    /// Disabled header of kind [`ComponentKind::Gfx`].
    pub fn gfx(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ComponentKind::Gfx,
            enabled: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Core components stay enabled; disabling one only logs a warning.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled && self.kind == ComponentKind::Core {
            log::warn!("Refusing to disable core component \"{}\"", self.name);
            return;
        }
        self.enabled = enabled;
    }
}

/// Owner state lent to components: tag, transform and the derived middle point.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentParent {
    tag: String,
    transform: Transform,
    middle: Vector2f,
}

impl ComponentParent {
    pub fn new(tag: impl Into<String>, transform: Transform) -> Self {
        Self {
            tag: tag.into(),
            middle: transform.centre(),
            transform,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn position(&self) -> Vector2f {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vector2f) {
        self.transform.position = position;
    }

    pub fn dimensions(&self) -> Dimensions {
        self.transform.dimensions
    }

    /// Move by `(dx, dy)`. The middle point follows on the next tick.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.transform.position.add(dx, dy);
    }

    /// Middle point as of the last recalculation.
    pub fn middle(&self) -> Vector2f {
        self.middle
    }

    pub fn set_middle(&mut self, middle: Vector2f) {
        self.middle = middle;
    }
}

/// The object on the other side of a collision.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionPartner {
    pub id: ObjectId,
    pub tag: String,
    pub transform: Transform,
}

/// Delivered to both objects of a colliding pair.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionEvent {
    pub partner: CollisionPartner,
    /// Side of the receiving object the partner hit. `None` when both centres coincide.
    pub direction: Option<Direction>,
}

/// Behavior attached to a container.
pub trait Component: Any {
    fn header(&self) -> &ComponentHeader;

    fn header_mut(&mut self) -> &mut ComponentHeader;

    /// Callbacks this component takes part in.
    fn phases(&self) -> Phases;

    fn on_fixed_tick(&mut self, _parent: &mut ComponentParent) {}

    fn draw(&mut self, _parent: &ComponentParent, _target: &mut dyn RenderTarget) -> Result<()> {
        Ok(())
    }

    fn on_collision(&mut self, _parent: &mut ComponentParent, _event: &CollisionEvent) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn name(&self) -> &str {
        self.header().name()
    }

    fn kind(&self) -> ComponentKind {
        self.header().kind()
    }

    fn is_enabled(&self) -> bool {
        self.header().is_enabled()
    }

    fn enable(&mut self) {
        self.header_mut().set_enabled(true);
    }

    fn disable(&mut self) {
        self.header_mut().set_enabled(false);
    }
}

/// Ordered list of components. Insertion order is tick and draw order.
#[derive(Default)]
pub struct ComponentContainer {
    components: Vec<Box<dyn Component>>,
}

impl ComponentContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<C: Component>(&mut self, component: C) {
        self.components.push(Box::new(component));
    }

    pub fn add_boxed(&mut self, component: Box<dyn Component>) {
        self.components.push(component);
    }

    /// Remove the first component called `name`.
    ///
    /// Core components stay attached; asking to remove one returns `None`.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Component>> {
        let index = self.components.iter().position(|c| c.name() == name)?;
        if self.components[index].kind() == ComponentKind::Core {
            log::warn!("Refusing to remove core component \"{}\"", name);
            return None;
        }
        Some(self.components.remove(index))
    }

    /// First component called `name`, if it is a `T`.
    pub fn get<T: Component>(&self, name: &str) -> Option<&T> {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find(|c| c.name() == name)
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
    }

    /// First component of type `T`, whatever its name.
    pub fn first_of<T: Component>(&self) -> Option<&T> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn first_of_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|c| c.as_any_mut().downcast_mut::<T>())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Component + 'static)> {
        self.components.iter().map(|c| &**c)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Component + 'static)> {
        self.components.iter_mut().map(|c| &mut **c)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Run `on_fixed_tick` on every enabled TICK component, in order.
    pub fn fixed_tick(&mut self, parent: &mut ComponentParent) {
        for component in &mut self.components {
            if component.is_enabled() && component.phases().contains(Phases::TICK) {
                component.on_fixed_tick(parent);
            }
        }
    }

    /// Run `draw` on every enabled DRAW component, in order.
    pub fn draw(&mut self, parent: &ComponentParent, target: &mut dyn RenderTarget) -> Result<()> {
        for component in &mut self.components {
            if component.is_enabled() && component.phases().contains(Phases::DRAW) {
                component.draw(parent, target)?;
            }
        }
        Ok(())
    }

    /// Deliver a collision to every COLLISION component, enabled or not.
    pub fn collide(&mut self, parent: &mut ComponentParent, event: &CollisionEvent) {
        for component in &mut self.components {
            if component.phases().contains(Phases::COLLISION) {
                component.on_collision(parent, event);
            }
        }
    }
}

impl std::fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.components.iter().map(|c| c.name()))
            .finish()
    }
}
