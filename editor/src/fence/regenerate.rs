use bevy::prelude::*;
use fence_core::{ColliderSettings, ColliderVolume, FencePath, synthesize_path};

use super::{Beam, Fence, Pylon, RegenerateFence, WallCollider};
use crate::config::EditorRuntimeConfig;

/// The fence's path, with pylon positions looked up by `position`. Pylons it
/// can't place are left out.
pub fn fence_path(fence: &Fence, position: impl Fn(Entity) -> Option<Vec3>) -> FencePath {
    let mut path = FencePath::new(Vec::new(), fence.close_loop);
    for &pylon in &fence.pylons {
        if let Some(point) = position(pylon) {
            path.append_point(point);
        }
    }
    path
}

/// The fence's path as it currently stands in the scene.
pub fn current_path(fence: &Fence, pylons: &Query<&Transform, With<Pylon>>) -> FencePath {
    fence_path(fence, |pylon| pylons.get(pylon).ok().map(|t| t.translation))
}

/// Wall rotation, or none at all when the yaw is not a number (coincident
/// pylons in legacy yaw mode).
fn wall_rotation(fence: Entity, index: usize, volume: &ColliderVolume) -> Quat {
    if volume.yaw_degrees.is_finite() {
        volume.rotation()
    } else {
        warn!("fence {fence}: wall {index} has no usable yaw, leaving it unrotated");
        Quat::IDENTITY
    }
}

/// Throws away every wall of the requested fences and builds them again from
/// the current pylon positions, then hands the new point list to the beam.
pub(super) fn regenerate_fences(
    mut commands: Commands,
    mut requests: MessageReader<RegenerateFence>,
    mut fences: Query<(&Fence, &mut Beam, Option<&Children>)>,
    pylons: Query<&Transform, With<Pylon>>,
    walls: Query<(), With<WallCollider>>,
    config: Res<EditorRuntimeConfig>,
) {
    let mut targets: Vec<Entity> = requests.read().map(|request| request.fence).collect();
    targets.sort_unstable();
    targets.dedup();

    for entity in targets {
        let Ok((fence, mut beam, children)) = fences.get_mut(entity) else {
            warn!("cannot regenerate {entity}: not a fence");
            continue;
        };

        // Old walls go before new ones are created.
        for child in children.into_iter().flatten() {
            if walls.contains(*child) {
                commands.entity(*child).despawn();
            }
        }

        let path = current_path(fence, &pylons);
        let settings = ColliderSettings {
            width_multiplier: fence.width_multiplier,
            height: config.collider_height,
            yaw_mode: config.yaw_mode,
        };

        let volumes = synthesize_path(&path, beam.widths, &settings);
        for (index, volume) in volumes.iter().enumerate() {
            commands.spawn((
                Name::new("wall"),
                WallCollider::from_volume(volume),
                Transform {
                    translation: volume.center,
                    rotation: wall_rotation(entity, index, volume),
                    ..default()
                },
                ChildOf(entity),
            ));
        }

        beam.points = path.points().to_vec();
        beam.closed = path.is_closed();

        debug!(
            "regenerated {entity}: {} pylons, {} walls, closed: {}",
            path.len(),
            volumes.len(),
            beam.closed
        );
    }
}
