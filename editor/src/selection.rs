use bevy::prelude::*;

use crate::fence::{Fence, Pylon};

const SELECTED_COLOR: Color = Color::srgb(1.0, 0.85, 0.2);
const FENCE_PYLON_COLOR: Color = Color::srgb(0.35, 0.75, 1.0);
const RING_RADIUS: f32 = 0.6;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<EditorSelection>();
    // Pruning waits until every Update system has flushed its spawns.
    app.add_systems(PostUpdate, prune_despawned);
    app.add_systems(Update, draw_selection);
}

/// Entities the designer currently has selected. The first one is the primary
/// selection and drives the inspector.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct EditorSelection {
    entities: Vec<Entity>,
}

impl EditorSelection {
    pub fn set(&mut self, entities: impl IntoIterator<Item = Entity>) {
        self.entities.clear();
        for entity in entities {
            if !self.entities.contains(&entity) {
                self.entities.push(entity);
            }
        }
    }

    pub fn select_only(&mut self, entity: Entity) {
        self.set([entity]);
    }

    pub fn remove(&mut self, entity: Entity) {
        self.entities.retain(|&e| e != entity);
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn primary(&self) -> Option<Entity> {
        self.entities.first().copied()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn prune_despawned(mut selection: ResMut<EditorSelection>, entities: Query<Entity>) {
    if selection.iter().all(|e| entities.contains(e)) {
        return;
    }
    let alive: Vec<Entity> = selection.iter().filter(|&e| entities.contains(e)).collect();
    selection.set(alive);
}

fn ring(gizmos: &mut Gizmos, at: Vec3, color: Color) {
    gizmos.circle(
        Isometry3d::new(at, Quat::from_rotation_x(core::f32::consts::FRAC_PI_2)),
        RING_RADIUS,
        color,
    );
}

fn draw_selection(
    mut gizmos: Gizmos,
    selection: Res<EditorSelection>,
    fences: Query<&Fence>,
    transforms: Query<&GlobalTransform, With<Pylon>>,
) {
    for entity in selection.iter() {
        if let Ok(transform) = transforms.get(entity) {
            ring(&mut gizmos, transform.translation(), SELECTED_COLOR);
        } else if let Ok(fence) = fences.get(entity) {
            for pylon in &fence.pylons {
                if let Ok(transform) = transforms.get(*pylon) {
                    ring(&mut gizmos, transform.translation(), FENCE_PYLON_COLOR);
                }
            }
        }
    }
}
