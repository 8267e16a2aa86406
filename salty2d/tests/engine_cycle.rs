use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use salty2d::{
    CollisionEvent, Component, ComponentHeader, ComponentKind, ComponentParent, DisplayEvent, DrawList, Engine,
    GameObject, Phases, Scene, SceneArgs, SceneRequests, TextBox, Transform, UiElement, Vector2f, World,
};

/// Moves its parent every tick and bounces off whatever it hits.
struct Velocity {
    header: ComponentHeader,
    velocity: Vector2f,
    hits: Rc<Cell<u32>>,
}

impl Velocity {
    fn new(velocity: Vector2f, hits: Rc<Cell<u32>>) -> Self {
        Self {
            header: ComponentHeader::new("velocity", ComponentKind::Custom("velocity")),
            velocity,
            hits,
        }
    }
}

impl Component for Velocity {
    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn phases(&self) -> Phases {
        Phases::TICK | Phases::COLLISION
    }

    fn on_fixed_tick(&mut self, parent: &mut ComponentParent) {
        parent.move_by(self.velocity.x, self.velocity.y);
    }

    fn on_collision(&mut self, _parent: &mut ComponentParent, _event: &CollisionEvent) {
        self.velocity = -self.velocity;
        self.hits.set(self.hits.get() + 1);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct Arena {
    world: World,
    hits: Rc<Cell<u32>>,
}

impl Arena {
    fn new(speed: f32) -> Result<Self> {
        let hits = Rc::new(Cell::new(0));
        let mut world = World::new();
        world.spawn(
            GameObject::new("left", Transform::new(0.0, 0.0, 10.0, 10.0))
                .with_component(Velocity::new(Vector2f::new(speed, 0.0), hits.clone())),
        );
        world.spawn(
            GameObject::new("right", Transform::new(30.0, 0.0, 10.0, 10.0))
                .with_component(Velocity::new(Vector2f::new(-speed, 0.0), hits.clone())),
        );
        Ok(Self { world, hits })
    }
}

impl Scene for Arena {
    fn world(&self) -> &World {
        &self.world
    }

    fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn on_fixed_tick(&mut self, requests: &mut dyn SceneRequests) {
        if self.hits.get() > 0 {
            requests.set_current_scene("game_over", SceneArgs::new(self.hits.get()));
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct GameOver {
    world: World,
    hits: u32,
}

impl GameOver {
    fn new(hits: u32) -> Result<Self> {
        let mut world = World::new();
        world.add_ui(TextBox::new("game over", Transform::new(0.0, 0.0, 400.0, 40.0), Vector2f::ZERO).with_speed(100.0));
        Ok(Self { world, hits })
    }
}

impl Scene for GameOver {
    fn world(&self) -> &World {
        &self.world
    }

    fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn engine() -> Engine {
    let mut engine = Engine::new().with_title("Arena").with_tick_rate(60);
    engine.scenes_mut().add_scene("arena", Arena::new);
    engine.scenes_mut().add_scene("game_over", GameOver::new);
    engine
}

#[test]
fn objects_move_collide_and_switch_scene() {
    let mut engine = engine();
    engine.scenes_mut().set_current_scene("arena", SceneArgs::new(5.0f32)).unwrap();

    // gap of 20 closes at 10 per tick: overlap after the third tick
    for _ in 0..3 {
        engine.tick().unwrap();
    }

    let game_over = engine.scenes().current_as::<GameOver>().unwrap();
    // both sides were told about the single contact
    assert_eq!(game_over.hits, 2);
    assert_eq!(engine.scenes().current_name(), Some("game_over"));
}

#[test]
fn objects_keep_moving_until_contact() {
    let mut engine = engine();
    engine.scenes_mut().set_current_scene("arena", SceneArgs::new(1.0f32)).unwrap();
    engine.tick().unwrap();

    let arena = engine.scenes().current_as::<Arena>().unwrap();
    let left = arena.world().find_by_tag("left").unwrap();
    assert_eq!(left.transform().position, Vector2f::new(1.0, 0.0));
    assert_eq!(left.parent().middle(), Vector2f::new(5.0, 5.0));
    assert_eq!(arena.hits.get(), 0);
}

#[test]
fn game_over_scene_renders_its_text() {
    let mut engine = engine();
    engine.scenes_mut().set_current_scene("game_over", SceneArgs::new(1u32)).unwrap();

    let mut target = DrawList::new();
    assert!(engine.step(Duration::from_millis(40), &mut target).unwrap());
    assert_eq!(target.texts(), vec!["game over"]);

    let text_box = engine.scenes().current().world().ui()[0].as_any().downcast_ref::<TextBox>().unwrap();
    assert!(text_box.is_finished());
}

#[test]
fn close_request_ends_stepping() {
    let mut engine = engine();
    engine.display().event_sender().send(DisplayEvent::CloseRequested).unwrap();

    let mut target = DrawList::new();
    assert!(!engine.step(Duration::from_millis(20), &mut target).unwrap());
    assert!(target.is_empty());
    assert!(engine.display().window_title().starts_with("Arena [Salty Engine "));
}
