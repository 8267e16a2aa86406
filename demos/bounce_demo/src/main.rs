use std::any::Any;
use std::path::Path;

use anyhow::Result;
use salty2d::cosmetic::GRADIENT_RINGS;
use salty2d::render::Color;
use salty2d::{
    CollisionEvent, Component, ComponentHeader, ComponentKind, ComponentParent, Direction, EmitterComponent,
    EmitterConfig, Engine, EngineConfig, GameObject, Gfx, LightComponent, LightSystem, Phases, RenderTarget, Scene,
    SceneArgs, TextBox, TextRenderComponent, Transform, Vector2f, World,
};

const TICKS_TO_RUN: u64 = 180;

/// Moves the ball and reflects it off whatever side it hits.
struct Bounce {
    header: ComponentHeader,
    velocity: Vector2f,
}

impl Bounce {
    fn new(velocity: Vector2f) -> Self {
        Self {
            header: ComponentHeader::new("bounce", ComponentKind::Custom("bounce")),
            velocity,
        }
    }
}

impl Component for Bounce {
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

    fn on_collision(&mut self, _parent: &mut ComponentParent, event: &CollisionEvent) {
        match event.direction {
            Some(Direction::Left) => self.velocity.x = self.velocity.x.abs(),
            Some(Direction::Right) => self.velocity.x = -self.velocity.x.abs(),
            Some(Direction::Up) => self.velocity.y = self.velocity.y.abs(),
            Some(Direction::Down) => self.velocity.y = -self.velocity.y.abs(),
            None => {}
        }
        log::debug!("Ball hit {} ({:?})", event.partner.tag, event.direction);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct BounceScene {
    world: World,
}

impl BounceScene {
    fn new(size: (f32, f32)) -> Result<Self> {
        let (width, height) = size;
        let lights = LightSystem::new().with_ambient(Transform::new(0.0, 0.0, width, height), [0.0, 0.0, 0.0, 0.6]);
        let mut world = World::new().with_light_system(lights);

        for (tag, wall) in [
            ("top", Transform::new(0.0, -10.0, width, 10.0)),
            ("bottom", Transform::new(0.0, height, width, 10.0)),
            ("left", Transform::new(-10.0, 0.0, 10.0, height)),
            ("right", Transform::new(width, 0.0, 10.0, height)),
        ] {
            world.spawn(GameObject::new(tag, wall));
        }

        let ball_transform = Transform::new(width / 2.0, height / 2.0, 24.0, 24.0);
        let mut glow = LightComponent::point("glow", world.light_system(), ball_transform)?;
        glow.start_gfx();
        let mut trail = EmitterComponent::new("trail", EmitterConfig::new().with_waves(4, 6).with_lifetime(30));
        trail.start_gfx();
        let mut label = TextRenderComponent::new("label", 120.0, Vector2f::new(0.0, -20.0));
        label.set_text("ball");

        world.spawn(
            GameObject::new("ball", ball_transform)
                .with_component(Bounce::new(Vector2f::new(4.0, 3.0)))
                .with_component(glow)
                .with_component(trail)
                .with_component(label),
        );

        world.add_ui(TextBox::new(
            "Bouncing around a headless display.",
            Transform::new(10.0, 10.0, 300.0, 40.0),
            Vector2f::new(4.0, 4.0),
        ));

        Ok(Self { world })
    }
}

impl Scene for BounceScene {
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

/// Counts the primitives of the last frame instead of drawing them.
#[derive(Default)]
struct FrameStats {
    texts: usize,
    polygons: usize,
    lines: usize,
}

impl FrameStats {
    fn total(&self) -> usize {
        self.texts + self.polygons + self.lines
    }
}

impl RenderTarget for FrameStats {
    fn draw_text(&mut self, _text: &str, _position: Vector2f, _color: Color) -> Result<()> {
        self.texts += 1;
        Ok(())
    }

    fn fill_polygon(&mut self, _points: &[Vector2f], _color: Color) -> Result<()> {
        self.polygons += 1;
        Ok(())
    }

    fn outline_polygon(&mut self, _points: &[Vector2f], _color: Color) -> Result<()> {
        self.polygons += 1;
        Ok(())
    }

    fn draw_line(&mut self, _from: Vector2f, _to: Vector2f, _color: Color) -> Result<()> {
        self.lines += 1;
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(Path::new(&path))?,
        None => EngineConfig::default(),
    };

    let mut engine = Engine::from_config(config).with_title("Bounce Demo");
    let size = (engine.display().width() as f32, engine.display().height() as f32);
    engine.scenes_mut().add_scene("bounce", BounceScene::new);
    engine.scenes_mut().set_current_scene("bounce", SceneArgs::new(size))?;

    let mut stats = FrameStats::default();
    engine.run_with(&mut stats, |engine| {
        if engine.ticks() >= TICKS_TO_RUN {
            engine.request_close();
        }
        Ok(())
    })?;

    log::info!(
        "Drew {} primitives ({} texts, {} light rings per frame)",
        stats.total(),
        stats.texts,
        GRADIENT_RINGS
    );

    if let Some(ball) = engine.scenes().current().world().find_by_tag("ball") {
        log::info!("Ball ended at {}", ball.transform().position);
    }
    Ok(())
}
