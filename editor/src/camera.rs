use bevy::{
    camera::Exposure,
    ecs::message::MessageReader,
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    pbr::{DistanceFog, FogFalloff},
    prelude::*,
};
use bevy_egui::EguiContexts;

use crate::fence::FocusInspector;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<OrbitCamSettings>();
    app.init_resource::<CameraControlActive>();

    app.add_systems(Startup, spawn_camera);

    // Computed once per frame so other systems (pylon dragging, hotkeys) can
    // gate behavior consistently without duplicating input logic.
    app.add_systems(Update, update_control_active);

    app.add_systems(
        Update,
        (frame_focused_fence, orbit, pan, zoom, apply_orbit)
            .chain()
            .after(update_control_active),
    );
}

/// Orbit state. The camera's `Transform` is derived from this every frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct OrbitCam {
    pub focus: Vec3,
    pub distance: f32,
    /// Radians around +Y.
    pub yaw: f32,
    /// Radians above the horizon.
    pub pitch: f32,
}

impl Default for OrbitCam {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            distance: 30.0,
            yaw: 0.0,
            pitch: 0.9,
        }
    }
}

impl OrbitCam {
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0);
        let eye = self.focus + rotation * Vec3::Z * self.distance;
        Transform::from_translation(eye).looking_at(self.focus, Vec3::Y)
    }
}

#[derive(Resource)]
pub struct OrbitCamSettings {
    /// Radians per pixel of mouse movement while RMB is held.
    pub orbit_sensitivity: f32,
    /// Pan distance per pixel, scaled by the orbit distance (while MMB is held).
    pub pan_sensitivity: f32,
    /// Fraction of the current distance covered per wheel tick.
    pub zoom_ratio: f32,
    /// Trackpad scroll scaling for `MouseScrollUnit::Pixel`.
    pub trackpad_pixels_per_scroll: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pitch clamp to keep the camera from flipping over the focus.
    pub max_pitch_radians: f32,
}

impl Default for OrbitCamSettings {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.0015,
            zoom_ratio: 0.1,
            trackpad_pixels_per_scroll: 120.0,
            min_distance: 2.0,
            max_distance: 400.0,
            max_pitch_radians: 1.54, // ~88 degrees
        }
    }
}

/// Whether the camera is being steered this frame.
///
/// Captured on RMB `just_pressed` (only if not over UI) and released on RMB `just_released`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraControlActive(pub bool);

fn update_control_active(
    buttons: Res<ButtonInput<MouseButton>>,
    mut active: ResMut<CameraControlActive>,
    mut contexts: EguiContexts,
) {
    let pointer_over_egui = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false);

    if buttons.just_pressed(MouseButton::Right) {
        active.0 = !pointer_over_egui;
    }

    // If RMB isn't held (e.g. focus loss), the camera can't be steered.
    if !buttons.pressed(MouseButton::Right) {
        active.0 = false;
    }
}

fn spawn_camera(mut commands: Commands) {
    let orbit = OrbitCam::default();
    commands.spawn((
        orbit,
        Camera3d::default(),
        Exposure { ev100: 12.0 },
        orbit.transform(),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            falloff: FogFalloff::from_visibility_colors(
                600.0,
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
            ..default()
        },
    ));
}

fn pointer_wants_egui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false)
}

/// Motion since the last frame. Always drained, so nothing stale is applied
/// the moment a drag starts.
fn accumulate(motion: &mut MessageReader<MouseMotion>) -> Vec2 {
    motion.read().map(|ev| ev.delta).sum()
}

fn orbit(
    mut motion: MessageReader<MouseMotion>,
    active: Res<CameraControlActive>,
    settings: Res<OrbitCamSettings>,
    mut cam: Single<&mut OrbitCam>,
) {
    let delta = accumulate(&mut motion);
    if !active.0 || delta == Vec2::ZERO {
        return;
    }
    cam.yaw -= delta.x * settings.orbit_sensitivity;
    cam.pitch = (cam.pitch + delta.y * settings.orbit_sensitivity)
        .clamp(-settings.max_pitch_radians, settings.max_pitch_radians);
}

fn pan(
    mut motion: MessageReader<MouseMotion>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    settings: Res<OrbitCamSettings>,
    cam: Single<(&mut OrbitCam, &Transform)>,
) {
    let delta = accumulate(&mut motion);
    if delta == Vec2::ZERO
        || !buttons.pressed(MouseButton::Middle)
        || pointer_wants_egui(&mut contexts)
    {
        return;
    }
    let (mut orbit, transform) = cam.into_inner();
    let scale = orbit.distance * settings.pan_sensitivity;

    // Drag right => focus moves left in view, so the scene follows the cursor.
    let right = *transform.right();
    let up = *transform.up();
    orbit.focus += (-right * delta.x + up * delta.y) * scale;
}

fn zoom(
    mut wheel: MessageReader<MouseWheel>,
    settings: Res<OrbitCamSettings>,
    mut cam: Single<&mut OrbitCam>,
    mut contexts: EguiContexts,
) {
    if contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false)
    {
        wheel.clear();
        return;
    }

    for ev in wheel.read() {
        let ticks = match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / settings.trackpad_pixels_per_scroll.max(1.0),
        };
        let factor = (1.0 - ticks * settings.zoom_ratio).max(0.1);
        cam.distance =
            (cam.distance * factor).clamp(settings.min_distance, settings.max_distance);
    }
}

/// Centers the orbit on a fence when the inspector is focused on it.
fn frame_focused_fence(
    mut focus: MessageReader<FocusInspector>,
    fences: Query<&GlobalTransform>,
    mut cam: Single<&mut OrbitCam>,
) {
    if let Some(request) = focus.read().last()
        && let Ok(transform) = fences.get(request.fence)
    {
        cam.focus = transform.translation();
    }
}

fn apply_orbit(mut cams: Query<(&OrbitCam, &mut Transform), Changed<OrbitCam>>) {
    for (orbit, mut transform) in &mut cams {
        *transform = orbit.transform();
    }
}
