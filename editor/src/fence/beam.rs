use bevy::prelude::*;
use fence_core::{FencePath, beam_spans};

use super::{Beam, BeamSpanMesh};

/// Replaces the rendered pieces of every beam that changed this frame.
pub(super) fn rebuild_beam_spans(
    mut commands: Commands,
    beams: Query<(Entity, &Beam, Option<&Children>), Changed<Beam>>,
    pieces: Query<(), With<BeamSpanMesh>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (entity, beam, children) in &beams {
        for child in children.into_iter().flatten() {
            if pieces.contains(*child) {
                commands.entity(*child).despawn();
            }
        }

        let path = FencePath::new(beam.points.clone(), beam.closed);
        for span in beam_spans(&path, beam.widths) {
            let mesh = meshes.add(Cuboid::new(span.width, span.width, span.length()));
            commands.spawn((
                Name::new("beam"),
                BeamSpanMesh,
                Mesh3d(mesh),
                MeshMaterial3d(beam.material.clone()),
                Transform::from_translation(span.midpoint())
                    .looking_to(span.direction(), Vec3::Y),
                ChildOf(entity),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fence::test_support::spawn_fence;

    #[test]
    fn beam_pieces_follow_the_beam() {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>();
        app.add_systems(Update, rebuild_beam_spans);

        let fence = spawn_fence(app.world_mut(), &[], true);
        {
            let mut beam = app.world_mut().get_mut::<Beam>(fence).unwrap();
            beam.points = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0)];
            beam.closed = true;
        }
        app.update();

        let count = |app: &mut App| {
            let world = app.world_mut();
            world
                .query_filtered::<&ChildOf, With<BeamSpanMesh>>()
                .iter(world)
                .filter(|parent| parent.parent() == fence)
                .count()
        };
        assert_eq!(count(&mut app), 3);

        app.world_mut().get_mut::<Beam>(fence).unwrap().closed = false;
        app.update();
        assert_eq!(count(&mut app), 2);

        // Unchanged beams are left alone.
        app.update();
        assert_eq!(count(&mut app), 2);
    }
}
