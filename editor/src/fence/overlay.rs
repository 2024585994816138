use bevy::prelude::*;

use super::WallCollider;

const WALL_COLOR: Color = Color::srgba(1.0, 0.55, 0.1, 0.9);

/// Whether wall volumes are drawn in the viewport. Toggled from the View menu.
#[derive(Resource, Copy, Clone, Debug, Default)]
pub struct ColliderOverlayEnabled(pub bool);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ColliderOverlayEnabled>();
    app.add_systems(
        Update,
        draw_walls.run_if(|enabled: Res<ColliderOverlayEnabled>| enabled.0),
    );
}

fn draw_walls(mut gizmos: Gizmos, walls: Query<(&WallCollider, &GlobalTransform)>) {
    for (wall, transform) in &walls {
        // Unit cube scaled up to the wall's size.
        gizmos.cuboid(
            transform.mul_transform(Transform::from_scale(wall.size())),
            WALL_COLOR,
        );
    }
}
