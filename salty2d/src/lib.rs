//! Salty2D - a small component-driven 2D game framework.
//!
//! Game objects carry ordered components that tick at a fixed rate and draw
//! onto a [`RenderTarget`]. Objects live in a [`World`] owned by a [`Scene`];
//! the [`SceneManager`] keeps exactly one scene active and swaps scenes through
//! registered factories. Hitbox collisions are resolved between ticks and
//! delivered to both sides.

pub mod collider;
pub mod component;
pub mod components;
pub mod cosmetic;
pub mod display;
pub mod engine;
pub mod error;
pub mod math;
pub mod object;
pub mod render;
pub mod scene;
pub mod ui;
pub mod world;

pub use crate::collider::{ColliderComponent, ColliderKind};
pub use crate::component::{
    CollisionEvent, CollisionPartner, Component, ComponentContainer, ComponentHeader, ComponentKind,
    ComponentParent, Phases,
};
pub use crate::components::{EmitterComponent, Gfx, LightComponent, RecalculateMiddleComponent, TextRenderComponent};
pub use crate::cosmetic::{EmitterConfig, Light, LightShape, LightSystem, RelationMode};
pub use crate::display::{Display, DisplayEvent, MouseButton, MouseEvent, MouseInputHandler, VERSION_TAG};
pub use crate::engine::{Engine, EngineConfig};
pub use crate::error::EngineError;
pub use crate::math::{Dimensions, Direction, Transform, Vector2f};
pub use crate::object::{GameObject, ObjectId};
pub use crate::render::{DrawCommand, DrawList, RenderTarget};
pub use crate::scene::{
    EmptyScene, Scene, SceneArgs, SceneFactory, SceneManager, SceneRequests, UnknownScenePolicy, ANONYMOUS_SCENE,
};
pub use crate::ui::{TextBox, UiElement};
pub use crate::world::World;
