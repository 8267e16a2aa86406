use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::display::Display;
use crate::render::RenderTarget;
use crate::scene::{SceneManager, UnknownScenePolicy};

/// Configuration values for the display and the fixed-tick loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub ticks_per_second: u32,
    /// Upper bound on fixed ticks run by one `update`; older backlog is dropped.
    pub max_ticks_per_update: u32,
    pub unknown_scene_policy: UnknownScenePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Salty2D Game".into(),
            width: 1280,
            height: 720,
            ticks_per_second: 60,
            max_ticks_per_update: 5,
            unknown_scene_policy: UnknownScenePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields take their default.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse engine config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    fn fixed_delta_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.ticks_per_second.max(1)))
    }
}

/// Owns the display and the scene manager and drives them at a fixed tick rate.
///
/// Each `update` first drains display events, then runs as many fixed ticks
/// as the accumulated time allows. Scene requests queued during a tick are
/// applied right after it.
pub struct Engine {
    config: EngineConfig,
    display: Display,
    scenes: SceneManager,
    fixed_delta_time: Duration,
    fixed_time_accumulator: Duration,
    elapsed_time: Duration,
    ticks: u64,
}

impl Engine {
    /// Create a new engine instance with default configuration.
    pub fn new() -> Self {
        Self::from_config(EngineConfig::default())
    }

    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            display: Display::new(config.title.clone(), config.width, config.height),
            scenes: SceneManager::new().with_policy(config.unknown_scene_policy),
            fixed_delta_time: config.fixed_delta_time(),
            fixed_time_accumulator: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            ticks: 0,
            config,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self.display.set_title(self.config.title.clone());
        self
    }

    /// Override the display size in pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self.display.set_size(width, height);
        self
    }

    /// Fixed ticks per second. Zero is treated as one.
    #[must_use]
    pub fn with_tick_rate(mut self, ticks_per_second: u32) -> Self {
        self.config.ticks_per_second = ticks_per_second;
        self.fixed_delta_time = self.config.fixed_delta_time();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display {
        &mut self.display
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Duration of one fixed tick.
    pub fn fixed_delta_time(&self) -> Duration {
        self.fixed_delta_time
    }

    /// Total time fed into `update` so far.
    pub fn elapsed_time(&self) -> Duration {
        self.elapsed_time
    }

    /// Fixed ticks run since the engine was created.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_close_requested(&self) -> bool {
        self.display.is_close_requested()
    }

    /// Ask the run loop to stop after the current frame.
    pub fn request_close(&mut self) {
        self.display.set_close_requested(true);
    }

    fn should_run_fixed_update(&mut self) -> bool {
        if self.fixed_time_accumulator >= self.fixed_delta_time {
            self.fixed_time_accumulator -= self.fixed_delta_time;
            true
        } else {
            false
        }
    }

    /// How far the accumulator is into the next fixed tick, `0.0..=1.0`.
    pub fn fixed_update_alpha(&self) -> f32 {
        if self.fixed_delta_time.as_secs_f32() > 0.0 {
            (self.fixed_time_accumulator.as_secs_f32() / self.fixed_delta_time.as_secs_f32()).min(1.0)
        } else {
            0.0
        }
    }

    /// Advance by `delta` of wall time. Returns the number of fixed ticks run.
    pub fn update(&mut self, delta: Duration) -> Result<u32> {
        self.display.process_events();
        self.elapsed_time += delta;
        self.fixed_time_accumulator += delta;

        let mut ran = 0;
        while ran < self.config.max_ticks_per_update && self.should_run_fixed_update() {
            self.tick()?;
            ran += 1;
        }

        if self.fixed_time_accumulator >= self.fixed_delta_time {
            log::debug!(
                "Dropping {:?} of tick backlog after {} ticks",
                self.fixed_time_accumulator,
                ran
            );
            self.fixed_time_accumulator = Duration::ZERO;
        }
        Ok(ran)
    }

    /// One fixed tick of the current scene, then any scene change it requested.
    pub fn tick(&mut self) -> Result<()> {
        self.scenes.fixed_tick();
        self.scenes.apply_pending()?;
        self.ticks += 1;
        Ok(())
    }

    /// Draw the current scene.
    pub fn render(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        self.scenes.draw(target)
    }

    /// `update` then `render`. Returns `false` once a close was requested.
    pub fn step(&mut self, delta: Duration, target: &mut dyn RenderTarget) -> Result<bool> {
        self.update(delta)?;
        if self.is_close_requested() {
            return Ok(false);
        }
        self.render(target)?;
        Ok(true)
    }

    /// Run until a close is requested.
    pub fn run(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        self.run_with(target, |_| Ok(()))
    }

    /// Run until a close is requested, calling `on_frame` after every rendered frame.
    pub fn run_with<F>(&mut self, target: &mut dyn RenderTarget, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        log::info!("Starting {}", self.display.window_title());

        let mut last_frame = Instant::now();
        loop {
            let now = Instant::now();
            let delta = now - last_frame;
            last_frame = now;

            if !self.step(delta, target)? {
                break;
            }
            on_frame(self)?;

            let spent = last_frame.elapsed();
            if spent < self.fixed_delta_time {
                std::thread::sleep(self.fixed_delta_time - spent);
            }
        }

        log::info!("Stopped after {} ticks", self.ticks);
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("display", &self.display)
            .field("scenes", &self.scenes)
            .field("ticks", &self.ticks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::display::{DisplayEvent, MouseButton, MouseEvent, MouseInputHandler};
    use crate::math::{Dimensions, Vector2f};
    use crate::render::DrawList;

    #[test]
    fn config_loads_partial_json() {
        let config = EngineConfig::from_json_str(
            r#"{ "title": "Pong", "ticks_per_second": 30, "unknown_scene_policy": "reject" }"#,
        )
        .unwrap();
        assert_eq!(config.title, "Pong");
        assert_eq!(config.ticks_per_second, 30);
        assert_eq!(config.width, 1280);
        assert_eq!(config.unknown_scene_policy, UnknownScenePolicy::Reject);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(EngineConfig::from_json_str("{ title: ").is_err());
    }

    #[test]
    fn accumulator_runs_whole_ticks_only() {
        let mut engine = Engine::new().with_tick_rate(10);
        assert_eq!(engine.update(Duration::from_millis(250)).unwrap(), 2);
        assert_eq!(engine.update(Duration::from_millis(50)).unwrap(), 1);
        assert_eq!(engine.ticks(), 3);
    }

    #[test]
    fn backlog_is_capped() {
        let mut engine = Engine::new().with_tick_rate(100);
        assert_eq!(engine.update(Duration::from_secs(1)).unwrap(), 5);
        assert_eq!(engine.update(Duration::ZERO).unwrap(), 0);
    }

    #[test]
    fn single_tick_cap_alternates_with_render() {
        let config = EngineConfig {
            ticks_per_second: 100,
            max_ticks_per_update: 1,
            ..EngineConfig::default()
        };
        let mut engine = Engine::from_config(config);
        let mut target = DrawList::new();

        assert!(engine.step(Duration::from_millis(50), &mut target).unwrap());
        assert_eq!(engine.ticks(), 1);
        assert!(engine.step(Duration::from_millis(15), &mut target).unwrap());
        assert_eq!(engine.ticks(), 2);
    }

    #[test]
    fn resizing_keeps_display_connections() {
        struct Clicks(Rc<Cell<u32>>);

        impl MouseInputHandler for Clicks {
            fn mouse_pressed(&mut self, _position: Vector2f, _button: MouseButton) {
                self.0.set(self.0.get() + 1);
            }
        }

        let clicks = Rc::new(Cell::new(0));
        let mut engine = Engine::new();
        let sender = engine.display().event_sender();
        engine.display_mut().set_mouse_handler(Clicks(clicks.clone()));

        let mut engine = engine.with_size(320, 200);
        assert_eq!(engine.display().dimensions(), Dimensions::new(320.0, 200.0));
        assert_eq!((engine.config().width, engine.config().height), (320, 200));

        sender
            .send(DisplayEvent::Mouse(MouseEvent::Pressed {
                position: Vector2f::ZERO,
                button: MouseButton::Left,
            }))
            .unwrap();
        sender.send(DisplayEvent::CloseRequested).unwrap();
        engine.display_mut().process_events();

        assert_eq!(clicks.get(), 1);
        assert!(engine.is_close_requested());
    }

    #[test]
    fn close_request_stops_the_run_loop() {
        let mut engine = Engine::new().with_title("Loop");
        let sender = engine.display().event_sender();
        let mut frames = 0;
        let mut target = DrawList::new();

        engine
            .run_with(&mut target, |_| {
                frames += 1;
                if frames == 3 {
                    sender.send(DisplayEvent::CloseRequested)?;
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(frames, 3);
        assert!(engine.is_close_requested());
    }
}
