use anyhow::Result;

use crate::component::{CollisionEvent, CollisionPartner};
use crate::cosmetic::LightSystem;
use crate::object::{GameObject, ObjectId};
use crate::render::RenderTarget;
use crate::ui::UiElement;

/// Everything a scene simulates and draws.
///
/// - Objects tick and draw in spawn order.
/// - The collision pass runs after every object has ticked.
/// - Lights draw over the objects, UI elements over everything.
pub struct World {
    next_id: u32,
    objects: Vec<GameObject>,
    ui: Vec<Box<dyn UiElement>>,
    light_system: Option<LightSystem>,
}

impl World {
    /// Create a new, empty world without a light system.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            objects: Vec::new(),
            ui: Vec::new(),
            light_system: None,
        }
    }

    #[must_use]
    pub fn with_light_system(mut self, light_system: LightSystem) -> Self {
        self.light_system = Some(light_system);
        self
    }

    /// Add an object and return its freshly assigned id.
    pub fn spawn(&mut self, mut object: GameObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        object.set_id(id);
        self.objects.push(object);
        id
    }

    /// Remove an object, keeping the order of the rest.
    pub fn despawn(&mut self, id: ObjectId) -> Option<GameObject> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        Some(self.objects.remove(index))
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// First object carrying `tag`.
    pub fn find_by_tag(&self, tag: &str) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.tag() == tag)
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [GameObject] {
        &mut self.objects
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn light_system(&self) -> Option<&LightSystem> {
        self.light_system.as_ref()
    }

    pub fn set_light_system(&mut self, light_system: Option<LightSystem>) {
        self.light_system = light_system;
    }

    pub fn add_ui<E: UiElement>(&mut self, element: E) {
        self.ui.push(Box::new(element));
    }

    pub fn ui(&self) -> &[Box<dyn UiElement>] {
        &self.ui
    }

    /// First UI element of type `E`.
    pub fn ui_element_mut<E: UiElement>(&mut self) -> Option<&mut E> {
        self.ui.iter_mut().find_map(|e| e.as_any_mut().downcast_mut::<E>())
    }

    /// One simulation step: objects, then collisions, then UI.
    pub fn fixed_tick(&mut self) {
        for object in &mut self.objects {
            object.fixed_tick();
        }

        self.collision_pass();

        for element in &mut self.ui {
            element.on_fixed_tick();
        }
    }

    /// Each unordered pair is checked once, by the earlier object's collider.
    /// Both sides hear about a hit, each with the direction from its own point of view.
    fn collision_pass(&mut self) {
        let mut events: Vec<(usize, CollisionEvent)> = Vec::new();

        for i in 0..self.objects.len() {
            for j in (i + 1)..self.objects.len() {
                let (a, b) = (&self.objects[i], &self.objects[j]);
                if !a.request_collision(b) {
                    continue;
                }

                let direction = a.collision_direction(b);
                events.push((
                    i,
                    CollisionEvent {
                        partner: partner_of(b),
                        direction,
                    },
                ));
                events.push((
                    j,
                    CollisionEvent {
                        partner: partner_of(a),
                        direction: direction.map(|d| d.opposite()),
                    },
                ));
            }
        }

        for (index, event) in events {
            self.objects[index].on_collision(&event);
        }
    }

    /// Render pass: objects, then lights, then UI.
    pub fn draw(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        for object in &mut self.objects {
            object.draw(target)?;
        }

        if let Some(lights) = &self.light_system {
            lights.draw(target)?;
        }

        for element in &mut self.ui {
            element.draw(target)?;
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("objects", &self.objects)
            .field("ui", &self.ui.len())
            .field("light_system", &self.light_system)
            .finish()
    }
}

fn partner_of(object: &GameObject) -> CollisionPartner {
    CollisionPartner {
        id: object.id(),
        tag: object.tag().to_string(),
        transform: *object.transform(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::collider::ColliderComponent;
    use crate::component::tests::Recorder;
    use crate::component::Phases;
    use crate::components::{Gfx, LightComponent};
    use crate::math::{Direction, Transform, Vector2f};
    use crate::render::DrawList;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut world = World::new();
        let a = world.spawn(GameObject::new("a", Transform::zero()));
        let b = world.spawn(GameObject::new("b", Transform::zero()));
        assert_eq!(a.to_u32(), 1);
        assert_eq!(b.to_u32(), 2);
        assert_eq!(world.get(b).unwrap().tag(), "b");

        assert!(world.despawn(a).is_some());
        assert!(world.get(a).is_none());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn collision_reaches_both_sides_with_opposite_directions() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        // `top` sits above `bottom`, overlapping by 2 units
        let top = world.spawn(
            GameObject::new("top", Transform::new(0.0, 0.0, 10.0, 10.0))
                .with_component(Recorder::new("top-recorder", Phases::COLLISION, log.clone())),
        );
        let bottom = world.spawn(
            GameObject::new("bottom", Transform::new(0.0, 8.0, 10.0, 10.0))
                .with_component(Recorder::new("bottom-recorder", Phases::COLLISION, log.clone())),
        );

        let a = world.get(top).unwrap();
        let b = world.get(bottom).unwrap();
        let forward = a.collision_direction(b);
        assert_eq!(forward, Some(Direction::Down));
        assert_eq!(b.collision_direction(a), forward.map(Direction::opposite));

        world.fixed_tick();
        assert_eq!(
            *log.borrow(),
            vec!["top-recorder:collision:bottom".to_string(), "bottom-recorder:collision:top".to_string()]
        );
    }

    #[test]
    fn objects_without_colliders_never_collide() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        world.spawn(
            GameObject::new("ghost", Transform::new(0.0, 0.0, 10.0, 10.0))
                .with_collider(None)
                .with_component(Recorder::new("ghost-recorder", Phases::COLLISION, log.clone())),
        );
        world.spawn(
            GameObject::new("ball", Transform::new(2.0, 2.0, 10.0, 10.0))
                .with_collider(Some(ColliderComponent::circle("round")))
                .with_component(Recorder::new("ball-recorder", Phases::COLLISION, log.clone())),
        );

        world.fixed_tick();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn draws_objects_then_lights_then_ui() {
        let lights = LightSystem::new();
        let mut world = World::new().with_light_system(lights.clone());

        let mut lamp = GameObject::new("lamp", Transform::new(0.0, 0.0, 10.0, 10.0));
        let mut glow = LightComponent::point("glow", world.light_system(), *lamp.transform()).unwrap();
        glow.start_gfx();
        lamp.add_component(glow);
        world.spawn(lamp);
        world.add_ui(crate::ui::TextBox::new("x", Transform::new(0.0, 0.0, 50.0, 10.0), Vector2f::ZERO).with_speed(1.0));

        world.fixed_tick();
        let mut target = DrawList::new();
        world.draw(&mut target).unwrap();

        assert_eq!(lights.len(), 1);
        assert_eq!(target.len(), crate::cosmetic::GRADIENT_RINGS + 1);
        assert_eq!(target.texts(), vec!["x"]);
    }
}
