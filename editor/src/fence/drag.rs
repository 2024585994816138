use bevy::{ecs::system::EntityCommands, prelude::*};

use super::Pylon;
use crate::camera::{CameraControlActive, OrbitCam};
use crate::selection::EditorSelection;

#[derive(Resource, Default)]
struct DragMoveState {
    /// World-space offset between the pylon's origin and the cursor hit point at drag start.
    offset: Option<Vec3>,
    /// Height of the horizontal plane the pylon slides on.
    plane_height: Option<f32>,
}

impl DragMoveState {
    fn reset(&mut self) {
        self.offset = None;
        self.plane_height = None;
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DragMoveState>();
}

pub(super) fn observe_pylon(pylon: &mut EntityCommands) {
    pylon
        .observe(select_pylon_on_click)
        .observe(on_drag_start)
        .observe(on_drag)
        .observe(on_drag_end);
}

/// Where a ray crosses the horizontal plane at `height`, if in front of the ray.
pub(crate) fn hit_horizontal_plane(ray: Ray3d, height: f32) -> Option<Vec3> {
    let denom = ray.direction.y;
    // A ray nearly parallel to the ground never settles on a useful point.
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (height - ray.origin.y) / denom;
    if t <= 0.0 {
        return None;
    }
    Some(ray.origin + *ray.direction * t)
}

fn select_pylon_on_click(
    mut click: On<Pointer<Click>>,
    pylons: Query<(), With<Pylon>>,
    mut selection: ResMut<EditorSelection>,
) {
    if click.button != PointerButton::Primary || !pylons.contains(click.entity) {
        return;
    }
    // Keep the parent fence from claiming the click.
    click.propagate(false);
    selection.select_only(click.entity);
}

pub(super) fn select_fence_on_click(
    click: On<Pointer<Click>>,
    mut selection: ResMut<EditorSelection>,
) {
    if click.button != PointerButton::Primary {
        return;
    }
    selection.select_only(click.entity);
}

fn cursor_ray(
    camera: &Query<(&Camera, &GlobalTransform), With<OrbitCam>>,
    position: Vec2,
) -> Option<Ray3d> {
    let (cam, cam_gt) = camera.single().ok()?;
    cam.viewport_to_world(cam_gt, position).ok()
}

fn on_drag_start(
    drag: On<Pointer<DragStart>>,
    pylons: Query<&GlobalTransform, With<Pylon>>,
    camera_active: Res<CameraControlActive>,
    camera: Query<(&Camera, &GlobalTransform), With<OrbitCam>>,
    mut move_state: ResMut<DragMoveState>,
) {
    move_state.reset();

    // Never begin moving a pylon while the camera is being steered.
    if camera_active.0 || drag.button != PointerButton::Primary {
        return;
    }

    let Ok(pylon_gt) = pylons.get(drag.entity) else {
        return;
    };
    let Some(ray) = cursor_ray(&camera, drag.pointer_location.position) else {
        return;
    };

    let origin = pylon_gt.translation();
    let Some(hit) = hit_horizontal_plane(ray, origin.y) else {
        return;
    };

    // Store offset so the pylon doesn't snap its origin onto the cursor.
    move_state.offset = Some(origin - hit);
    move_state.plane_height = Some(origin.y);
}

fn on_drag(
    drag: On<Pointer<Drag>>,
    mut pylons: Query<(&mut Transform, &ChildOf), With<Pylon>>,
    parents: Query<&GlobalTransform>,
    camera: Query<(&Camera, &GlobalTransform), With<OrbitCam>>,
    move_state: Res<DragMoveState>,
) {
    let (Some(offset), Some(height)) = (move_state.offset, move_state.plane_height) else {
        return;
    };
    let Ok((mut transform, parent)) = pylons.get_mut(drag.entity) else {
        return;
    };
    let Some(ray) = cursor_ray(&camera, drag.pointer_location.position) else {
        return;
    };
    let Some(hit) = hit_horizontal_plane(ray, height) else {
        return;
    };

    // Pylons live in fence space.
    let world = hit + offset;
    transform.translation = match parents.get(parent.parent()) {
        Ok(fence_gt) => fence_gt.affine().inverse().transform_point3(world),
        Err(_) => world,
    };
}

fn on_drag_end(
    drag: On<Pointer<DragEnd>>,
    pylons: Query<&Transform, With<Pylon>>,
    mut move_state: ResMut<DragMoveState>,
) {
    if move_state.offset.is_some()
        && let Ok(transform) = pylons.get(drag.entity)
    {
        debug!("moved pylon {} to {}", drag.entity, transform.translation);
    }
    move_state.reset();
}
