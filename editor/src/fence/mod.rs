//! Fence entities in the scene.
//!
//! A fence is a parent entity carrying [`Fence`] and [`Beam`]. Its children are:
//! - pylons ([`Pylon`]), ordered by `Fence::pylons`
//! - wall volumes ([`WallCollider`]), one per segment
//! - beam pieces ([`BeamSpanMesh`]), one per non-degenerate segment
//!
//! Walls and beam pieces are derived data. They are only ever rebuilt as a
//! whole, by [`RegenerateFence`].

mod beam;
mod drag;
mod overlay;
mod regenerate;
mod spawn;

use bevy::prelude::*;
use fence_core::{BeamWidths, ColliderVolume, StyleTemplate};

pub use overlay::ColliderOverlayEnabled;
pub use regenerate::fence_path;

pub(super) fn plugin(app: &mut App) {
    app.add_message::<SpawnFence>()
        .add_message::<AppendPylon>()
        .add_message::<RemovePylon>()
        .add_message::<RegenerateFence>()
        .add_message::<FocusInspector>();
    app.init_resource::<PendingFocus>();
    app.add_plugins((drag::plugin, overlay::plugin));

    // Focus runs first so a fence spawned this frame is focused on the next one,
    // after the selection of its pylons has been shown.
    app.add_systems(
        Update,
        (
            spawn::apply_pending_focus,
            spawn::spawn_fences,
            spawn::append_pylons,
            spawn::remove_pylons,
            regenerate::regenerate_fences,
            beam::rebuild_beam_spans,
        )
            .chain(),
    );
}

#[derive(Component, Debug, Clone)]
#[require(Transform, Visibility)]
pub struct Fence {
    /// Display name of the style the fence was built from.
    pub style: String,
    /// Pylons in path order.
    pub pylons: Vec<Entity>,
    /// Requested loop state. Ignored while the fence has fewer than three pylons.
    pub close_loop: bool,
    pub width_multiplier: f32,
    pub pylon_template: PylonTemplate,
}

/// Handles every new pylon of a fence is spawned with.
#[derive(Debug, Clone)]
pub enum PylonTemplate {
    Scene(Handle<Scene>),
    Mesh {
        mesh: Handle<Mesh>,
        material: Handle<StandardMaterial>,
    },
}

#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Transform, Visibility)]
pub struct Pylon;

/// Invisible box blocking movement through one fence segment.
///
/// Positioned and yawed by its `Transform`, in the fence's local space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WallCollider {
    pub shape: Cuboid,
}

impl WallCollider {
    pub fn from_volume(volume: &ColliderVolume) -> Self {
        Self {
            shape: Cuboid {
                half_size: volume.half_extents(),
            },
        }
    }

    pub fn size(&self) -> Vec3 {
        self.shape.size()
    }
}

/// The connecting beam of a fence: what to draw, not how.
///
/// Points are in the fence's local space. Changing this component rebuilds
/// the beam pieces.
#[derive(Component, Debug, Clone)]
pub struct Beam {
    pub points: Vec<Vec3>,
    pub closed: bool,
    pub widths: BeamWidths,
    pub material: Handle<StandardMaterial>,
}

/// One rendered piece of a [`Beam`].
#[derive(Component, Debug, Clone, Copy)]
pub struct BeamSpanMesh;

#[derive(Message, Debug, Clone)]
pub struct SpawnFence {
    pub style: StyleTemplate,
    pub center: Vec3,
    pub pylon_count: usize,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct AppendPylon {
    pub fence: Entity,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct RemovePylon {
    pub fence: Entity,
    pub pylon: Entity,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct RegenerateFence {
    pub fence: Entity,
}

/// Asks the inspector to show `fence` and the viewport to frame it.
#[derive(Message, Debug, Clone, Copy)]
pub struct FocusInspector {
    pub fence: Entity,
}

/// Fence to select and focus one frame after it was spawned.
#[derive(Resource, Debug, Default)]
pub struct PendingFocus(pub Option<Entity>);

/// The fence an entity belongs to: itself if it is a fence, its parent if it is a pylon.
pub fn owning_fence(
    entity: Entity,
    fences: &Query<(), With<Fence>>,
    parents: &Query<&ChildOf, With<Pylon>>,
) -> Option<Entity> {
    if fences.contains(entity) {
        return Some(entity);
    }
    parents.get(entity).ok().map(ChildOf::parent)
}
