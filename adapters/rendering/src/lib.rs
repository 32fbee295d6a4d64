#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Waypoint Defence adapters.
//!
//! Backends receive immutable [`Scene`] snapshots assembled from the world's
//! query views. Nothing in this crate advances the simulation.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};
use waypoint_defence_core::{
    CritterId, CritterKind, CritterView, ProjectileId, ProjectileSnapshot, StrategyKind, TowerId,
    TowerKind, TowerView,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Health bar color sliding from red at zero to green at full health.
    #[must_use]
    pub fn health_bar(ratio: f32) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        Self::new(1.0 - ratio, ratio, 0.0, 1.0)
    }
}

/// Critter path drawn beneath every other layer.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Ordered waypoint centres.
    pub waypoints: Vec<Vec2>,
    /// Side length of the square tiles under each waypoint.
    pub tile_length: f32,
    /// Fill color of path tiles.
    pub color: Color,
}

impl PathPresentation {
    /// Creates a path presentation, rejecting unusable tile lengths.
    pub fn new(
        waypoints: Vec<Vec2>,
        tile_length: f32,
        color: Color,
    ) -> Result<Self, RenderingError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            waypoints,
            tile_length,
            color,
        })
    }

    /// Axis-aligned bounds covering every path tile, as `(min, max)` corners.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let half = Vec2::splat(self.tile_length / 2.0);
        let mut points = self.waypoints.iter();
        let first = *points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), point| {
            (min.min(*point), max.max(*point))
        });
        Some((min - half, max + half))
    }
}

/// Live critter drawn with its sprite and a health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CritterSprite {
    /// Identifier of the critter.
    pub id: CritterId,
    /// Type tag of the critter.
    pub kind: CritterKind,
    /// World-space centre.
    pub position: Vec2,
    /// Remaining health relative to the kind's reference maximum.
    pub health_ratio: f32,
    /// Texture used for the sprite.
    pub asset_key: &'static str,
}

impl CritterSprite {
    /// Color of the health bar drawn above the sprite.
    #[must_use]
    pub fn health_color(&self) -> Color {
        Color::health_bar(self.health_ratio)
    }
}

/// Tower drawn with its level sprite and, when selected, its range ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSprite {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Type of the tower.
    pub kind: TowerKind,
    /// Snapped world-space centre.
    pub position: Vec2,
    /// Current level.
    pub level: u8,
    /// Effective range used for the selection ring.
    pub range: f32,
    /// Strategy the tower aimed with most recently.
    pub strategy: StrategyKind,
    /// Texture used for the sprite.
    pub asset_key: &'static str,
    /// Whether the player currently inspects this tower.
    pub selected: bool,
}

/// Projectile drawn as a small dot, with a splash ring for area shots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSprite {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// World-space position.
    pub position: Vec2,
    /// Splash radius, zero for single-target shots.
    pub aoe_radius: f32,
    /// Whether the projectile carries the top-tier bonus.
    pub special: bool,
}

impl From<&ProjectileSnapshot> for ProjectileSprite {
    fn from(snapshot: &ProjectileSnapshot) -> Self {
        Self {
            id: snapshot.id,
            position: snapshot.position,
            aoe_radius: snapshot.aoe_radius,
            special: snapshot.special,
        }
    }
}

/// Outcome banner shown over the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The campaign is still running.
    Playing,
    /// Life points ran out.
    Defeat,
    /// The final wave was cleared.
    Victory,
}

/// Status panel with the player's economy and progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Currency balance, possibly negative.
    pub currency: i64,
    /// Remaining life points.
    pub life_points: u32,
    /// Current wave number.
    pub wave: u32,
    /// Whether a wave is spawning or on the path.
    pub wave_in_progress: bool,
    /// Campaign outcome.
    pub outcome: Outcome,
}

/// Scene description combining the path and every inhabitant.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Path drawn beneath everything else.
    pub path: PathPresentation,
    /// Live critters in identifier order.
    pub critters: Vec<CritterSprite>,
    /// Towers in identifier order.
    pub towers: Vec<TowerSprite>,
    /// In-flight projectiles.
    pub projectiles: Vec<ProjectileSprite>,
    /// Status panel.
    pub hud: Hud,
}

impl Scene {
    /// Builds a scene from world query views.
    ///
    /// Dead or escaped critters are omitted; `selected` marks at most one tower.
    #[must_use]
    pub fn new(
        path: PathPresentation,
        critters: &CritterView,
        towers: &TowerView,
        projectiles: &[ProjectileSnapshot],
        hud: Hud,
        selected: Option<TowerId>,
    ) -> Self {
        let critters = critters
            .live()
            .map(|critter| CritterSprite {
                id: critter.id,
                kind: critter.kind,
                position: critter.position,
                health_ratio: critter.health_ratio(),
                asset_key: critter.kind.asset_key(),
            })
            .collect();
        let towers = towers
            .iter()
            .map(|tower| TowerSprite {
                id: tower.id,
                kind: tower.kind,
                position: tower.position,
                level: tower.level,
                range: tower.stats.range,
                strategy: tower.strategy,
                asset_key: tower.asset_key,
                selected: selected == Some(tower.id),
            })
            .collect();

        Self {
            path,
            critters,
            towers,
            projectiles: projectiles.iter().map(ProjectileSprite::from).collect(),
            hud,
        }
    }

    /// Tower currently marked as selected.
    #[must_use]
    pub fn selected_tower(&self) -> Option<&TowerSprite> {
        self.towers.iter().find(|tower| tower.selected)
    }
}

/// Signal returned by scene update closures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Stop the backend after the current frame.
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window or report header.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Waypoint Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the update closure requests an exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and replaces the scene with a fresh snapshot before it is presented.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tile length must be positive to draw the path.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::{CritterSnapshot, TowerSnapshot};

    fn path() -> PathPresentation {
        PathPresentation::new(
            vec![Vec2::new(32.0, 96.0), Vec2::new(160.0, 96.0), Vec2::new(160.0, 224.0)],
            64.0,
            Color::from_rgb_u8(120, 90, 60),
        )
        .expect("valid tile length")
    }

    fn hud() -> Hud {
        Hud {
            currency: 1_000,
            life_points: 10,
            wave: 1,
            wave_in_progress: false,
            outcome: Outcome::Playing,
        }
    }

    fn critter(id: u32, health: f32, dead: bool) -> CritterSnapshot {
        CritterSnapshot {
            id: CritterId::new(id),
            kind: CritterKind::Medium,
            position: Vec2::new(40.0, 96.0),
            health,
            waypoint: 1,
            speed: 104.0,
            reward: 14,
            dead,
            reached_end: false,
        }
    }

    fn tower(id: u32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Area,
            position: Vec2::new(96.0, 32.0),
            level: 1,
            stats: TowerKind::Area.base_stats(),
            strategy: StrategyKind::Smart,
            decorations: 0,
            refund_value: 112,
            upgrade_cost: 100,
            special_multiplier: 1.0,
            asset_key: TowerKind::Area.asset_key(1),
        }
    }

    #[test]
    fn path_creation_rejects_non_positive_tile_length() {
        let error = PathPresentation::new(Vec::new(), 0.0, Color::from_rgb_u8(0, 0, 0))
            .expect_err("zero tile length must be rejected");

        assert_eq!(error, RenderingError::InvalidTileLength { tile_length: 0.0 });
    }

    #[test]
    fn path_bounds_cover_outer_tile_edges() {
        assert_eq!(
            path().bounds(),
            Some((Vec2::new(0.0, 64.0), Vec2::new(192.0, 256.0)))
        );
    }

    #[test]
    fn scene_skips_dead_critters_and_marks_selection() {
        let critters =
            CritterView::from_snapshots(vec![critter(2, 112.5, false), critter(1, 0.0, true)]);
        let towers = TowerView::from_snapshots(vec![tower(1), tower(0)]);

        let scene = Scene::new(path(), &critters, &towers, &[], hud(), Some(TowerId::new(1)));

        assert_eq!(scene.critters.len(), 1);
        assert_eq!(scene.critters[0].health_ratio, 0.5);
        assert_eq!(scene.critters[0].asset_key, "textures/critter2.png");
        assert_eq!(scene.towers.len(), 2);
        assert_eq!(scene.towers[0].id, TowerId::new(0));
        assert!(!scene.towers[0].selected);
        assert_eq!(
            scene.selected_tower().map(|tower| tower.id),
            Some(TowerId::new(1))
        );
        assert_eq!(scene.selected_tower().map(|tower| tower.range), Some(120.0));
    }

    #[test]
    fn health_bar_fades_from_green_to_red() {
        assert_eq!(Color::health_bar(1.0), Color::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(Color::health_bar(-3.0), Color::new(1.0, 0.0, 0.0, 1.0));
    }
}
