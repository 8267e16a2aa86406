//! Scenes and the manager that keeps exactly one of them active.
//!
//! Scenes are built by factories registered under a name. Switching builds a
//! fresh instance and replaces the current one only if construction succeeded.
//! Code running inside a pass cannot switch directly; it queues a request
//! through [`SceneRequests`] and the engine applies it between cycles.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::render::RenderTarget;
use crate::world::World;

/// Name recorded for scenes installed without one.
pub const ANONYMOUS_SCENE: &str = "custom";

/// A level, menu or any other self-contained set of objects.
pub trait Scene: Any {
    fn world(&self) -> &World;

    fn world_mut(&mut self) -> &mut World;

    /// Called once per fixed tick, after the world has ticked.
    fn on_fixed_tick(&mut self, _requests: &mut dyn SceneRequests) {}

    /// Drawn after the world.
    fn draw_foreground(&mut self, _target: &mut dyn RenderTarget) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Placeholder active before any real scene is set.
#[derive(Debug, Default)]
pub struct EmptyScene {
    world: World,
}

impl EmptyScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for EmptyScene {
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

/// Type-erased constructor arguments for a scene factory.
pub struct SceneArgs {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl SceneArgs {
    pub fn new<A: Any>(value: A) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<A>(),
        }
    }

    /// `()` arguments, for factories that take none.
    pub fn none() -> Self {
        Self::new(())
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn downcast<A: Any>(self) -> Result<A, Self> {
        let Self { value, type_name } = self;
        match value.downcast::<A>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { value, type_name }),
        }
    }
}

impl std::fmt::Debug for SceneArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneArgs").field("type", &self.type_name).finish()
    }
}

/// What to do when asked for a scene name nobody registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownScenePolicy {
    /// Rebuild the current scene with the factory that made it, and log a warning.
    #[default]
    FallbackToCurrent,
    /// Fail with [`EngineError::UnknownScene`].
    Reject,
}

/// Scene changes queued from inside a pass.
///
/// Only the last request of a cycle survives.
pub trait SceneRequests {
    fn set_current_scene(&mut self, name: &str, args: SceneArgs);

    fn reload_current_scene(&mut self, args: SceneArgs);

    /// Install a built scene. `rebuild` makes fresh instances on reload or fallback.
    fn install_scene(&mut self, scene: Box<dyn Scene>, name: Option<String>, rebuild: SceneFactory);
}

enum PendingRequest {
    Switch { name: String, args: SceneArgs },
    Reload(SceneArgs),
    Install {
        scene: Box<dyn Scene>,
        name: Option<String>,
        rebuild: SceneFactory,
    },
}

/// Lets scene hooks queue requests while the manager is borrowed.
struct SceneRequestHelper<'a> {
    pending: &'a mut Option<PendingRequest>,
}

impl SceneRequestHelper<'_> {
    fn queue(&mut self, request: PendingRequest) {
        if self.pending.replace(request).is_some() {
            log::debug!("Scene request replaced an earlier one from the same cycle");
        }
    }
}

impl SceneRequests for SceneRequestHelper<'_> {
    fn set_current_scene(&mut self, name: &str, args: SceneArgs) {
        self.queue(PendingRequest::Switch {
            name: name.to_string(),
            args,
        });
    }

    fn reload_current_scene(&mut self, args: SceneArgs) {
        self.queue(PendingRequest::Reload(args));
    }

    fn install_scene(&mut self, scene: Box<dyn Scene>, name: Option<String>, rebuild: SceneFactory) {
        self.queue(PendingRequest::Install { scene, name, rebuild });
    }
}

type BuildFn = dyn Fn(&str, SceneArgs) -> Result<Box<dyn Scene>, EngineError>;

/// Type-erased scene constructor, cheap to clone.
#[derive(Clone)]
pub struct SceneFactory {
    build: Rc<BuildFn>,
}

impl SceneFactory {
    /// Wrap a typed factory. Arguments that are not an `A` fail with
    /// [`EngineError::ArgumentMismatch`].
    pub fn new<A, S, F>(factory: F) -> Self
    where
        A: Any,
        S: Scene,
        F: Fn(A) -> Result<S> + 'static,
    {
        let build = move |scene: &str, args: SceneArgs| -> Result<Box<dyn Scene>, EngineError> {
            let value = args.downcast::<A>().map_err(|args| EngineError::ArgumentMismatch {
                scene: scene.to_string(),
                expected: type_name::<A>(),
                given: args.type_name(),
            })?;
            let built = factory(value).map_err(|source| EngineError::Construction {
                scene: scene.to_string(),
                source,
            })?;
            Ok(Box::new(built) as Box<dyn Scene>)
        };
        Self { build: Rc::new(build) }
    }

    /// Builds `S::default()` from `()` arguments.
    pub fn of_default<S: Scene + Default>() -> Self {
        Self::new(|_: ()| Ok(S::default()))
    }

    /// Build an instance, reporting errors under `name`.
    pub fn build(&self, name: &str, args: SceneArgs) -> Result<Box<dyn Scene>, EngineError> {
        (self.build)(name, args)
    }
}

impl std::fmt::Debug for SceneFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SceneFactory")
    }
}

/// Registry of scene factories plus the one active scene.
pub struct SceneManager {
    factories: HashMap<String, SceneFactory>,
    current: Box<dyn Scene>,
    current_name: Option<String>,
    /// Rebuilds the current scene's type.
    current_factory: SceneFactory,
    policy: UnknownScenePolicy,
    pending: Option<PendingRequest>,
}

impl SceneManager {
    /// Starts with an [`EmptyScene`] and no name. Until another scene is set,
    /// the fallback rebuilds an [`EmptyScene`] from `()` arguments.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            current: Box::new(EmptyScene::new()),
            current_name: None,
            current_factory: SceneFactory::of_default::<EmptyScene>(),
            policy: UnknownScenePolicy::default(),
            pending: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: UnknownScenePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnknownScenePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: UnknownScenePolicy) {
        self.policy = policy;
    }

    /// Register `factory` under `name`, replacing any earlier registration.
    ///
    /// The factory is called with the arguments passed to
    /// [`set_current_scene`](Self::set_current_scene), which must be an `A`.
    pub fn add_scene<A, S, F>(&mut self, name: impl Into<String>, factory: F)
    where
        A: Any,
        S: Scene,
        F: Fn(A) -> Result<S> + 'static,
    {
        self.add_factory(name, SceneFactory::new(factory));
    }

    pub fn add_factory(&mut self, name: impl Into<String>, factory: SceneFactory) {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            log::debug!("Replaced scene factory \"{}\"", name);
        }
    }

    /// Deregister `name`. A running instance built from it keeps running.
    pub fn remove_scene(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn has_scene(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build the scene registered as `name` and make it current.
    ///
    /// On error the current scene stays as it was.
    pub fn set_current_scene(&mut self, name: &str, args: SceneArgs) -> Result<(), EngineError> {
        let factory = match self.factories.get(name) {
            Some(factory) => factory.clone(),
            None if self.policy == UnknownScenePolicy::FallbackToCurrent => {
                log::warn!(
                    "No scene registered as \"{}\"; rebuilding the current scene instead",
                    name
                );
                self.current_factory.clone()
            }
            None => return Err(EngineError::UnknownScene(name.to_string())),
        };
        self.activate(name, factory, args)
    }

    fn activate(&mut self, name: &str, factory: SceneFactory, args: SceneArgs) -> Result<(), EngineError> {
        self.current = factory.build(name, args)?;
        self.current_name = Some(name.to_string());
        self.current_factory = factory;
        log::info!("Current scene is now \"{}\"", name);
        Ok(())
    }

    /// Make an already built scene current under [`ANONYMOUS_SCENE`].
    ///
    /// Reloads rebuild it with `S::default()`.
    pub fn install_scene<S: Scene + Default>(&mut self, scene: S) {
        self.install_boxed(Box::new(scene), None, SceneFactory::of_default::<S>());
    }

    pub fn install_scene_as<S: Scene + Default>(&mut self, scene: S, name: impl Into<String>) {
        self.install_boxed(Box::new(scene), Some(name.into()), SceneFactory::of_default::<S>());
    }

    /// Install a scene that reloads through `rebuild`.
    pub fn install_scene_with<S: Scene>(&mut self, scene: S, name: Option<String>, rebuild: SceneFactory) {
        self.install_boxed(Box::new(scene), name, rebuild);
    }

    fn install_boxed(&mut self, scene: Box<dyn Scene>, name: Option<String>, rebuild: SceneFactory) {
        let name = name.unwrap_or_else(|| ANONYMOUS_SCENE.to_string());
        self.current = scene;
        self.current_factory = rebuild;
        log::info!("Installed scene \"{}\"", name);
        self.current_name = Some(name);
    }

    /// Build a fresh instance of the current scene under its current name.
    ///
    /// Uses the factory registered under that name if there is one, and the
    /// factory that built the current scene otherwise. Before any scene was
    /// set this only logs a warning.
    pub fn reload_current_scene(&mut self, args: SceneArgs) -> Result<(), EngineError> {
        let Some(name) = self.current_name.clone() else {
            log::warn!("Cannot reload: no scene has been set yet");
            return Ok(());
        };
        let factory = self
            .factories
            .get(&name)
            .cloned()
            .unwrap_or_else(|| self.current_factory.clone());
        self.activate(&name, factory, args)
    }

    pub fn current(&self) -> &dyn Scene {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> &mut dyn Scene {
        self.current.as_mut()
    }

    /// The current scene, if it is an `S`.
    pub fn current_as<S: Scene>(&self) -> Option<&S> {
        self.current.as_any().downcast_ref::<S>()
    }

    pub fn current_as_mut<S: Scene>(&mut self) -> Option<&mut S> {
        self.current.as_any_mut().downcast_mut::<S>()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Tick the current scene's world, then its own hook.
    pub fn fixed_tick(&mut self) {
        self.current.world_mut().fixed_tick();

        let mut helper = SceneRequestHelper {
            pending: &mut self.pending,
        };
        self.current.on_fixed_tick(&mut helper);
    }

    pub fn draw(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        self.current.world_mut().draw(target)?;
        self.current.draw_foreground(target)
    }

    /// Apply the request queued during the last cycle, if any.
    pub fn apply_pending(&mut self) -> Result<(), EngineError> {
        match self.pending.take() {
            None => Ok(()),
            Some(PendingRequest::Switch { name, args }) => self.set_current_scene(&name, args),
            Some(PendingRequest::Reload(args)) => self.reload_current_scene(args),
            Some(PendingRequest::Install { scene, name, rebuild }) => {
                self.install_boxed(scene, name, rebuild);
                Ok(())
            }
        }
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("SceneManager")
            .field("scenes", &names)
            .field("current_name", &self.current_name)
            .field("policy", &self.policy)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}
