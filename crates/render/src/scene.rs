//! Procedural box layout for a frame. Pure functions of world state.

use crate::backend::BoxInstance;
use glam::{DQuat, DVec3, Mat4, Vec3};
use strikewing_common::{EnemyKind, MapDef, math};
use strikewing_kernel::{Enemy, World};

/// Map theme as seen by the renderer. Unknown names render as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Warehouse,
    Industrial,
    City,
    Docks,
    Other,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "warehouse" => Theme::Warehouse,
            "industrial" => Theme::Industrial,
            "city" => Theme::City,
            "docks" => Theme::Docks,
            _ => Theme::Other,
        }
    }

    /// Shader tint selector.
    pub fn tint(self) -> f32 {
        match self {
            Theme::Warehouse => 0.15,
            Theme::Industrial => 0.35,
            Theme::City => 0.55,
            Theme::Docks => 0.75,
            Theme::Other => 0.0,
        }
    }

    pub fn ground_color(self) -> [f32; 4] {
        match self {
            Theme::Industrial => [0.08, 0.10, 0.12, 1.0],
            _ => [0.06, 0.06, 0.09, 1.0],
        }
    }

    pub fn pillar_color(self) -> [f32; 4] {
        match self {
            Theme::City => [0.20, 0.20, 0.23, 1.0],
            _ => [0.9, 0.25, 1.0, 1.0],
        }
    }
}

/// An axis-aligned box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBox {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub color: [f32; 4],
}

impl SceneBox {
    pub fn instance(&self) -> BoxInstance {
        BoxInstance {
            model: Mat4::from_translation(self.center) * Mat4::from_scale(self.half_extents),
            color: self.color,
        }
    }
}

pub fn ground(theme: Theme) -> SceneBox {
    SceneBox {
        center: Vec3::new(0.0, -0.45, 0.0),
        half_extents: Vec3::new(100.0, 0.2, 100.0),
        color: theme.ground_color(),
    }
}

/// Seed-derived layout parameter shared by pillar count and angle.
fn layout_salt(seed: u32) -> u32 {
    seed % 97 + 17
}

pub fn pillar_count(seed: u32) -> usize {
    (20 + layout_salt(seed) % 10) as usize
}

/// Pillars on a jittered spiral around the origin. Same seed, same layout.
pub fn pillars(map: &MapDef) -> Vec<SceneBox> {
    let salt = layout_salt(map.seed) as f32;
    let color = Theme::from_name(&map.theme).pillar_color();
    (0..pillar_count(map.seed))
        .map(|i| {
            let a = i as f32 * 0.77 + salt * 0.01;
            let r = 14.0 + (i % 7) as f32 * 3.2;
            let h = 2.2 + (i % 5) as f32 * 0.9;
            SceneBox {
                center: Vec3::new(a.cos() * r, h * 0.5, a.sin() * r),
                half_extents: Vec3::new(0.8, h, 0.8),
                color,
            }
        })
        .collect()
}

pub fn enemy_half_extents(kind: EnemyKind) -> Vec3 {
    match kind {
        EnemyKind::Soldier => Vec3::new(0.6, 1.2, 0.6),
        EnemyKind::Car => Vec3::new(2.3, 0.9, 4.1),
        EnemyKind::Tank => Vec3::new(3.0, 1.3, 5.0),
    }
}

pub fn enemy_color(kind: EnemyKind) -> [f32; 4] {
    match kind {
        EnemyKind::Soldier => [0.2, 0.2, 0.2, 1.0],
        EnemyKind::Car => [0.14, 0.14, 0.24, 1.0],
        EnemyKind::Tank => [0.10, 0.22, 0.12, 1.0],
    }
}

pub fn enemy(e: &Enemy) -> SceneBox {
    SceneBox {
        center: e.pos.as_vec3(),
        half_extents: enemy_half_extents(e.kind),
        color: enemy_color(e.kind),
    }
}

/// Small marker just ahead of the camera along the drone's forward axis.
pub fn nose(pos: DVec3, rot: DQuat) -> SceneBox {
    let fwd = math::rotate_vec3(rot, math::FORWARD);
    SceneBox {
        center: (pos + fwd * 0.85).as_vec3(),
        half_extents: Vec3::new(0.26, 0.09, 0.26),
        color: [0.7, 0.25, 1.0, 1.0],
    }
}

/// Every box of a frame in draw order: ground, pillars, enemies, nose.
pub fn build(world: &World) -> Vec<SceneBox> {
    let theme = Theme::from_name(&world.map.theme);
    let mut boxes = Vec::with_capacity(2 + pillar_count(world.map.seed) + world.enemies.len());
    boxes.push(ground(theme));
    boxes.extend(pillars(&world.map));
    boxes.extend(world.enemies.iter().map(enemy));
    boxes.push(nose(world.pos, world.rot));
    boxes
}
