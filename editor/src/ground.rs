use bevy::prelude::*;

/// Pylon pivots sit at y = 0; the ground is dropped so they appear to stand on it.
pub const GROUND_HEIGHT: f32 = -1.0;
const GROUND_SIZE: f32 = 400.0;
const GRID_CELLS: u32 = 80;
const GRID_SPACING: f32 = 2.5;
const GRID_COLOR: Color = Color::srgba(0.8, 0.8, 0.8, 0.35);

#[derive(Resource, Copy, Clone, Debug)]
pub struct GroundGridEnabled(pub bool);

impl Default for GroundGridEnabled {
    fn default() -> Self {
        Self(true)
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<GroundGridEnabled>();
    app.add_systems(Startup, setup);
    app.add_systems(
        Update,
        draw_grid.run_if(|enabled: Res<GroundGridEnabled>| enabled.0),
    );
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.18, 0.2, 0.2),
            perceptual_roughness: 0.95,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_HEIGHT, 0.0),
        // Clicks on the ground should reach nothing but the ground.
        Pickable::IGNORE,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        // Orientation: Looking down from the sky
        Transform::from_xyz(0.0, 10.0, 0.0).looking_at(Vec3::new(1.0, -1.0, 1.0), Vec3::Y),
    ));
}

fn draw_grid(mut gizmos: Gizmos) {
    // Lift it a hair so it doesn't z-fight with the ground plane.
    let height = GROUND_HEIGHT + 0.01;
    gizmos.grid(
        Isometry3d::new(
            Vec3::new(0.0, height, 0.0),
            Quat::from_rotation_x(core::f32::consts::FRAC_PI_2),
        ),
        UVec2::splat(GRID_CELLS),
        Vec2::splat(GRID_SPACING),
        GRID_COLOR,
    );
}
