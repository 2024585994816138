use bevy::prelude::*;
use fence_core::{FencePath, PylonAsset, PylonShape, StyleTemplate, radial_positions};

use super::{
    AppendPylon, Beam, Fence, FocusInspector, PendingFocus, Pylon, PylonTemplate, RegenerateFence,
    RemovePylon, SpawnFence, drag,
};
use crate::config::EditorRuntimeConfig;
use crate::selection::EditorSelection;

const PYLON_HEIGHT: f32 = 2.0;
const PYLON_RADIUS: f32 = 0.25;
const BEAM_GLOW: f32 = 4.0;

/// Layout of a new fence: pylons appended at the anchor and spread on a circle.
/// A two pylon fence is forced open, whatever the style says.
pub(super) fn initial_path(style: &StyleTemplate, pylon_count: usize, radius: f32) -> FencePath {
    let mut path = FencePath::new(Vec::new(), style.close_loop);
    for offset in radial_positions(pylon_count, radius) {
        path.append_point(offset);
    }
    if path.len() == 2 {
        path.force_open();
    }
    path
}

fn linear(color: [f32; 4]) -> Color {
    Color::linear_rgba(color[0], color[1], color[2], color[3])
}

fn pylon_template(
    asset: &PylonAsset,
    asset_server: &AssetServer,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> PylonTemplate {
    match asset {
        // Bevy supports the "#Scene0" suffix for the default glTF scene.
        PylonAsset::Scene { path } => {
            PylonTemplate::Scene(asset_server.load(format!("{path}#Scene0")))
        }
        PylonAsset::Primitive { shape, color } => {
            let mesh = match shape {
                PylonShape::Cylinder => meshes.add(Cylinder::new(PYLON_RADIUS, PYLON_HEIGHT)),
                PylonShape::Cuboid => meshes.add(Cuboid::new(
                    PYLON_RADIUS * 2.0,
                    PYLON_HEIGHT,
                    PYLON_RADIUS * 2.0,
                )),
                PylonShape::Capsule => meshes.add(Capsule3d::new(
                    PYLON_RADIUS,
                    PYLON_HEIGHT - PYLON_RADIUS * 2.0,
                )),
            };
            let material = materials.add(StandardMaterial {
                base_color: linear(*color),
                perceptual_roughness: 0.6,
                ..default()
            });
            PylonTemplate::Mesh { mesh, material }
        }
    }
}

pub(super) fn spawn_pylon(
    commands: &mut Commands,
    fence: Entity,
    template: &PylonTemplate,
    translation: Vec3,
) -> Entity {
    let mut pylon = commands.spawn((
        Name::new("pylon"),
        Pylon,
        Transform::from_translation(translation),
        ChildOf(fence),
    ));
    match template {
        PylonTemplate::Scene(scene) => {
            pylon.insert(SceneRoot(scene.clone()));
        }
        PylonTemplate::Mesh { mesh, material } => {
            pylon.insert((Mesh3d(mesh.clone()), MeshMaterial3d(material.clone())));
        }
    }
    drag::observe_pylon(&mut pylon);
    pylon.id()
}

pub(super) fn spawn_fences(
    mut commands: Commands,
    mut requests: MessageReader<SpawnFence>,
    mut regenerate: MessageWriter<RegenerateFence>,
    mut selection: ResMut<EditorSelection>,
    mut pending: ResMut<PendingFocus>,
    config: Res<EditorRuntimeConfig>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for request in requests.read() {
        let style = &request.style;
        let pylon_count = config.clamp_pylon_count(request.pylon_count);
        let template = pylon_template(&style.pylon, &asset_server, &mut meshes, &mut materials);

        let beam_color = linear(style.beam.color);
        let beam_material = materials.add(StandardMaterial {
            base_color: beam_color,
            emissive: beam_color.to_linear() * BEAM_GLOW,
            ..default()
        });

        let fence = commands
            .spawn((
                Name::new(format!("{} fence", style.label)),
                Transform::from_translation(request.center),
                Beam {
                    points: Vec::new(),
                    closed: false,
                    widths: style.beam.widths(),
                    material: beam_material,
                },
            ))
            .observe(drag::select_fence_on_click)
            .id();

        let path = initial_path(style, pylon_count, config.radius);
        let pylons: Vec<Entity> = path
            .points()
            .iter()
            .map(|&offset| spawn_pylon(&mut commands, fence, &template, offset))
            .collect();

        commands.entity(fence).insert(Fence {
            style: style.label.clone(),
            pylons: pylons.clone(),
            close_loop: path.closed_requested(),
            width_multiplier: style.width_multiplier,
            pylon_template: template,
        });

        info!(
            "spawned {} fence with {pylon_count} pylons at {}",
            style.label, request.center
        );

        regenerate.write(RegenerateFence { fence });
        selection.set(pylons);
        pending.0 = Some(fence);
    }
}

/// Selects a freshly spawned fence and focuses the inspector on it.
pub(super) fn apply_pending_focus(
    mut pending: ResMut<PendingFocus>,
    mut selection: ResMut<EditorSelection>,
    mut focus: MessageWriter<FocusInspector>,
    fences: Query<(), With<Fence>>,
) {
    let Some(fence) = pending.0.take() else {
        return;
    };
    if !fences.contains(fence) {
        return;
    }
    selection.select_only(fence);
    focus.write(FocusInspector { fence });
}

pub(super) fn append_pylons(
    mut commands: Commands,
    mut requests: MessageReader<AppendPylon>,
    mut fences: Query<&mut Fence>,
) {
    for request in requests.read() {
        let Ok(mut fence) = fences.get_mut(request.fence) else {
            warn!("cannot add pylon: {} is not a fence", request.fence);
            continue;
        };
        let template = fence.pylon_template.clone();
        let pylon = spawn_pylon(&mut commands, request.fence, &template, Vec3::ZERO);
        fence.pylons.push(pylon);
    }
}

pub(super) fn remove_pylons(
    mut commands: Commands,
    mut requests: MessageReader<RemovePylon>,
    mut fences: Query<&mut Fence>,
    mut selection: ResMut<EditorSelection>,
) {
    for request in requests.read() {
        let Ok(mut fence) = fences.get_mut(request.fence) else {
            continue;
        };
        let before = fence.pylons.len();
        fence.pylons.retain(|&pylon| pylon != request.pylon);
        if fence.pylons.len() == before {
            continue;
        }
        selection.remove(request.pylon);
        commands.entity(request.pylon).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fence::test_support::spawn_fence;
    use bevy::asset::AssetPlugin;
    use fence_core::StyleCatalog;

    fn app() -> App {
        let mut app = App::new();
        app.add_message::<AppendPylon>()
            .add_message::<RemovePylon>()
            .add_message::<FocusInspector>();
        app.init_resource::<EditorSelection>();
        app.init_resource::<PendingFocus>();
        app.add_systems(Update, (apply_pending_focus, append_pylons, remove_pylons).chain());
        app
    }

    #[test]
    fn two_pylon_fences_start_open() {
        let catalog = StyleCatalog::builtin();
        let style = catalog.get("green_energy").unwrap();
        assert!(!initial_path(style, 2, 10.0).closed_requested());
        assert!(initial_path(style, 3, 10.0).closed_requested());

        let mut open_style = style.clone();
        open_style.close_loop = false;
        assert!(!initial_path(&open_style, 8, 10.0).closed_requested());
    }

    #[test]
    fn initial_path_follows_radial_layout() {
        let catalog = StyleCatalog::builtin();
        let style = catalog.get("tech_fence").unwrap();
        let path = initial_path(style, 5, 7.5);
        assert_eq!(path.points(), radial_positions(5, 7.5).as_slice());
        assert_eq!(path.segment_count(), 5);
    }

    fn spawn_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()));
        app.init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Scene>();
        app.add_message::<SpawnFence>()
            .add_message::<AppendPylon>()
            .add_message::<RemovePylon>()
            .add_message::<RegenerateFence>()
            .add_message::<FocusInspector>();
        app.insert_resource(EditorRuntimeConfig::default());
        app.init_resource::<EditorSelection>();
        app.init_resource::<PendingFocus>();
        app.add_systems(
            Update,
            (
                apply_pending_focus,
                spawn_fences,
                append_pylons,
                remove_pylons,
                super::super::regenerate::regenerate_fences,
            )
                .chain(),
        );
        app
    }

    fn add_fence(app: &mut App, pylon_count: usize, center: Vec3) -> Entity {
        let style = StyleCatalog::builtin().get("green_energy").unwrap().clone();
        app.world_mut().write_message(SpawnFence {
            style,
            center,
            pylon_count,
        });
        app.update();

        // Focus is handed over on the next frame; until then it names the new fence.
        app.world().resource::<PendingFocus>().0.unwrap()
    }

    fn wall_count(app: &mut App, fence: Entity) -> usize {
        let world = app.world_mut();
        world
            .query_filtered::<&ChildOf, With<crate::fence::WallCollider>>()
            .iter(world)
            .filter(|parent| parent.parent() == fence)
            .count()
    }

    #[test]
    fn add_fence_lays_out_closes_and_selects() {
        let mut app = spawn_app();
        let center = Vec3::new(3.0, 0.0, 3.0);
        let fence = add_fence(&mut app, 4, center);

        let pylons = app.world().get::<Fence>(fence).unwrap().pylons.clone();
        assert_eq!(pylons.len(), 4);
        for (pylon, expected) in pylons.iter().zip(radial_positions(4, 10.0)) {
            assert_eq!(app.world().get::<ChildOf>(*pylon).unwrap().parent(), fence);
            let local = app.world().get::<Transform>(*pylon).unwrap().translation;
            assert!(local.abs_diff_eq(expected, 1e-5));
        }
        assert_eq!(
            app.world().get::<Transform>(fence).unwrap().translation,
            center
        );

        assert_eq!(wall_count(&mut app, fence), 4);
        assert!(app.world().get::<Beam>(fence).unwrap().closed);

        let selected: Vec<Entity> = app.world().resource::<EditorSelection>().iter().collect();
        assert_eq!(selected, pylons);

        // The fence itself takes over the selection one frame later.
        app.update();
        let selection = app.world().resource::<EditorSelection>();
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![fence]);
        assert!(app.world().resource::<PendingFocus>().0.is_none());
    }

    #[test]
    fn add_two_pylon_fence_stays_open() {
        let mut app = spawn_app();
        let fence = add_fence(&mut app, 2, Vec3::ZERO);

        assert_eq!(app.world().get::<Fence>(fence).unwrap().pylons.len(), 2);
        assert!(!app.world().get::<Fence>(fence).unwrap().close_loop);
        assert_eq!(wall_count(&mut app, fence), 1);
        assert!(!app.world().get::<Beam>(fence).unwrap().closed);
    }

    #[test]
    fn add_fence_clamps_pylon_count() {
        let mut app = spawn_app();
        let fence = add_fence(&mut app, 500, Vec3::ZERO);
        let max = EditorRuntimeConfig::default().max_pylons;
        assert_eq!(app.world().get::<Fence>(fence).unwrap().pylons.len(), max);
        assert_eq!(wall_count(&mut app, fence), max);
    }

    #[test]
    fn append_pylon_adds_at_anchor_in_order() {
        let mut app = app();
        let fence = spawn_fence(app.world_mut(), &[Vec3::X, Vec3::Z], true);

        app.world_mut().write_message(AppendPylon { fence });
        app.update();

        let pylons = app.world().get::<Fence>(fence).unwrap().pylons.clone();
        assert_eq!(pylons.len(), 3);
        let added = app.world().get::<Transform>(pylons[2]).unwrap();
        assert_eq!(added.translation, Vec3::ZERO);
        assert_eq!(app.world().get::<ChildOf>(pylons[2]).unwrap().parent(), fence);
    }

    #[test]
    fn remove_pylon_drops_it_from_path_and_selection() {
        let mut app = app();
        let fence = spawn_fence(app.world_mut(), &[Vec3::X, Vec3::Z, Vec3::ONE], true);
        let pylons = app.world().get::<Fence>(fence).unwrap().pylons.clone();
        app.world_mut()
            .resource_mut::<EditorSelection>()
            .set(pylons.clone());

        app.world_mut().write_message(RemovePylon {
            fence,
            pylon: pylons[1],
        });
        app.update();

        let remaining = &app.world().get::<Fence>(fence).unwrap().pylons;
        assert_eq!(remaining, &vec![pylons[0], pylons[2]]);
        assert!(app.world().get_entity(pylons[1]).is_err());
        assert!(!app.world().resource::<EditorSelection>().contains(pylons[1]));
    }

    #[test]
    fn pending_focus_selects_the_fence() {
        let mut app = app();
        let fence = spawn_fence(app.world_mut(), &[Vec3::X, Vec3::Z], false);
        app.world_mut().resource_mut::<PendingFocus>().0 = Some(fence);

        app.update();

        let selection = app.world().resource::<EditorSelection>();
        assert_eq!(selection.primary(), Some(fence));
        assert!(app.world().resource::<PendingFocus>().0.is_none());
    }
}
