//! Collider component and kind-pair collision dispatch.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentHeader, ComponentKind, ComponentParent, Phases};
use crate::math::{Dimensions, Direction, Transform, Vector2f};
use crate::object::GameObject;

/// Closed set of collider geometries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderKind {
    /// Axis-aligned rectangle.
    Hitbox,
    /// Circle inscribed in the collider's rectangle.
    Circle,
}

/// How a pair of collider kinds is tested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    BoxOverlap,
    CircleOverlap,
    /// No geometry for this pair yet. Resolves to "no collision".
    Unhandled,
}

/// Pure dispatch table over `(own kind, other kind)`.
pub fn resolve(own: ColliderKind, other: ColliderKind) -> Resolution {
    match (own, other) {
        (ColliderKind::Hitbox, ColliderKind::Hitbox) => Resolution::BoxOverlap,
        (ColliderKind::Circle, ColliderKind::Circle) => Resolution::CircleOverlap,
        (ColliderKind::Hitbox, ColliderKind::Circle)
        | (ColliderKind::Circle, ColliderKind::Hitbox) => Resolution::Unhandled,
    }
}

/// Collision geometry of a game object.
///
/// The shape is the owner's transform, shifted by `offset` and, if `size` is
/// set, resized to it. Its header has kind [`ComponentKind::Collider`]; the
/// world runs collision checks itself, so it joins no per-object phase.
#[derive(Clone, Debug, PartialEq)]
pub struct ColliderComponent {
    header: ComponentHeader,
    kind: ColliderKind,
    offset: Vector2f,
    size: Option<Dimensions>,
}

impl ColliderComponent {
    pub fn new(name: impl Into<String>, kind: ColliderKind) -> Self {
        Self {
            header: ComponentHeader::new(name, ComponentKind::Collider),
            kind,
            offset: Vector2f::ZERO,
            size: None,
        }
    }

    pub fn hitbox(name: impl Into<String>) -> Self {
        Self::new(name, ColliderKind::Hitbox)
    }

    pub fn circle(name: impl Into<String>) -> Self {
        Self::new(name, ColliderKind::Circle)
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Vector2f) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: Dimensions) -> Self {
        self.size = Some(size);
        self
    }

    pub fn collider_kind(&self) -> ColliderKind {
        self.kind
    }

    /// World-space shape for an owner with `parent` state.
    pub fn shape(&self, parent: &ComponentParent) -> Transform {
        let transform = parent.transform();
        Transform::from_parts(
            transform.position + self.offset,
            self.size.unwrap_or(transform.dimensions),
        )
    }

    /// Whether the owner (`own`) currently overlaps `other`.
    ///
    /// Objects without a collider never collide, and neither do disabled
    /// colliders or kind pairs the table leaves unhandled.
    pub fn request_collision(&self, own: &ComponentParent, other: &GameObject) -> bool {
        let Some(other_collider) = other.collider() else {
            return false;
        };
        if !self.is_enabled() || !other_collider.is_enabled() {
            return false;
        }

        let a = self.shape(own);
        let b = other_collider.shape(other.parent());

        match resolve(self.kind, other_collider.kind) {
            Resolution::BoxOverlap => a.intersects(&b),
            Resolution::CircleOverlap => circles_overlap(&a, &b),
            Resolution::Unhandled => false,
        }
    }

    /// Side of the owner's shape that `other` lies on.
    pub fn collision_direction(&self, own: &ComponentParent, other: &GameObject) -> Option<Direction> {
        let b = match other.collider() {
            Some(collider) => collider.shape(other.parent()),
            None => *other.parent().transform(),
        };
        self.shape(own).relation(&b)
    }
}

impl Component for ColliderComponent {
    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn phases(&self) -> Phases {
        Phases::empty()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn circles_overlap(a: &Transform, b: &Transform) -> bool {
    let ra = a.width().min(a.height()) / 2.0;
    let rb = b.width().min(b.height()) / 2.0;
    a.centre().distance(b.centre()) < ra + rb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(tag: &str, transform: Transform, collider: Option<ColliderComponent>) -> GameObject {
        let mut obj = GameObject::new(tag, transform);
        obj.set_collider(collider);
        obj
    }

    fn hits(a: &GameObject, b: &GameObject) -> bool {
        a.request_collision(b)
    }

    #[test]
    fn hitbox_collision_is_symmetric() {
        let a = object("a", Transform::new(0.0, 0.0, 10.0, 10.0), Some(ColliderComponent::hitbox("hb")));
        let b = object("b", Transform::new(8.0, 2.0, 10.0, 10.0), Some(ColliderComponent::hitbox("hb")));
        let far = object("far", Transform::new(50.0, 50.0, 10.0, 10.0), Some(ColliderComponent::hitbox("hb")));

        assert!(hits(&a, &b));
        assert!(hits(&b, &a));
        assert!(!hits(&a, &far));
        assert!(!hits(&far, &a));
    }

    #[test]
    fn direction_reverses_with_the_pair() {
        let a = object("a", Transform::new(0.0, 0.0, 10.0, 10.0), Some(ColliderComponent::hitbox("hb")));
        let b = object("b", Transform::new(8.0, 2.0, 10.0, 10.0), Some(ColliderComponent::hitbox("hb")));

        let ab = a.collision_direction(&b);
        let ba = b.collision_direction(&a);
        assert_eq!(ab, Some(Direction::Right));
        assert_eq!(ab, ba.map(Direction::opposite));
    }

    #[test]
    fn unhandled_pairs_never_collide() {
        let boxy = object("box", Transform::new(0.0, 0.0, 10.0, 10.0), Some(ColliderComponent::hitbox("hb")));
        let round = object("round", Transform::new(0.0, 0.0, 10.0, 10.0), Some(ColliderComponent::circle("c")));

        assert_eq!(resolve(ColliderKind::Hitbox, ColliderKind::Circle), Resolution::Unhandled);
        assert!(!hits(&boxy, &round));
        assert!(!hits(&round, &boxy));
    }

    #[test]
    fn objects_without_collider_are_ignored() {
        let a = object("a", Transform::new(0.0, 0.0, 10.0, 10.0), Some(ColliderComponent::hitbox("hb")));
        let ghost = object("ghost", Transform::new(0.0, 0.0, 10.0, 10.0), None);

        assert!(!hits(&a, &ghost));
        assert!(!hits(&ghost, &a));
    }

    #[test]
    fn disabled_collider_takes_no_part() {
        let a = object("a", Transform::new(0.0, 0.0, 10.0, 10.0), Some(ColliderComponent::hitbox("hb")));
        let mut b = object("b", Transform::new(5.0, 5.0, 10.0, 10.0), Some(ColliderComponent::hitbox("hb")));
        assert!(hits(&a, &b));

        if let Some(collider) = b.collider_mut() {
            collider.disable();
        }
        assert!(!hits(&a, &b));
        assert!(!hits(&b, &a));
    }

    #[test]
    fn collider_is_a_collider_kind_component() {
        let mut obj = object("a", Transform::new(0.0, 0.0, 10.0, 10.0), Some(ColliderComponent::circle("round")));
        let other = object("b", Transform::new(2.0, 0.0, 10.0, 10.0), Some(ColliderComponent::circle("round")));
        assert!(hits(&obj, &other));

        let collider: &mut dyn Component = obj.collider_mut().unwrap();
        assert_eq!(collider.kind(), ComponentKind::Collider);
        assert_eq!(collider.name(), "round");
        assert!(collider.phases().is_empty());

        collider.disable();
        assert!(!hits(&obj, &other));
        assert!(!hits(&other, &obj));

        let collider: &mut dyn Component = obj.collider_mut().unwrap();
        collider.enable();
        assert!(hits(&obj, &other));
        assert_eq!(obj.collider().unwrap().collider_kind(), ColliderKind::Circle);
    }

    #[test]
    fn circles_use_inscribed_radius() {
        let a = object("a", Transform::new(0.0, 0.0, 10.0, 10.0), Some(ColliderComponent::circle("c")));
        let near = object("near", Transform::new(9.0, 0.0, 10.0, 10.0), Some(ColliderComponent::circle("c")));
        // corners overlap as rectangles, circles stay apart
        let diagonal = object("diag", Transform::new(8.0, 8.0, 10.0, 10.0), Some(ColliderComponent::circle("c")));

        assert!(hits(&a, &near));
        assert!(!hits(&a, &diagonal));
    }

    #[test]
    fn offset_and_size_shape_the_hitbox() {
        let collider = ColliderComponent::hitbox("feet")
            .with_offset(Vector2f::new(2.0, 8.0))
            .with_size(Dimensions::new(6.0, 2.0));
        let parent = ComponentParent::new("p", Transform::new(10.0, 10.0, 10.0, 10.0));

        assert_eq!(collider.shape(&parent), Transform::new(12.0, 18.0, 6.0, 2.0));
    }
}
