#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Waypoint Defence.
//!
//! The world owns every critter, tower and projectile. Adapters mutate it
//! exclusively through [`apply`] or the shop-facing operations on [`World`],
//! and observe it through the read-only [`query`] module.
//!
//! A tick runs in a fixed order: critters move and finished ones are reaped,
//! the spawn queue releases at most one critter, wave completion is
//! evaluated, every tower gets a chance to fire at the surviving critters,
//! and finally every projectile advances and resolves damage. Damage dealt
//! in a tick is therefore only visible to targeting on the next tick.

mod config;
mod critters;
mod map;
mod projectiles;
mod towers;
mod waves;

use std::{rc::Rc, time::Duration};

use waypoint_defence_core::{
    Command, Event, PathMap, PlacementError, SaleError, SetupError, TowerId, TowerKind,
    UpgradeError, Vec2, WaveStartError, WELCOME_BANNER,
};

pub use config::Config;
pub use map::{GridMap, Preset, TileCoord};

use projectiles::Ballistics;
use towers::TowerRegistry;
use waves::WaveController;

/// Represents the authoritative Waypoint Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: Config,
    map: Box<dyn PathMap>,
    waypoints: Rc<[Vec2]>,
    tile_length: f32,
    waves: WaveController,
    towers: TowerRegistry,
    next_projectile: u32,
    tick_index: u64,
}

impl World {
    /// Creates a world around the provided map collaborator.
    ///
    /// Fails when the configuration is invalid, the map supplies no
    /// waypoints, or its tile length is unusable or differs from the
    /// configured one.
    pub fn new<M>(config: Config, map: M) -> Result<Self, SetupError>
    where
        M: PathMap + 'static,
    {
        config.validate()?;
        let waypoints: Rc<[Vec2]> = Rc::from(map.waypoints());
        if waypoints.is_empty() {
            return Err(SetupError::EmptyPath);
        }
        let tile_length = map.tile_length();
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(SetupError::InvalidTileLength { tile_length });
        }
        if tile_length != config.tile_length {
            return Err(SetupError::TileLengthMismatch {
                configured: config.tile_length,
                map: tile_length,
            });
        }

        Ok(Self {
            banner: WELCOME_BANNER,
            waves: WaveController::new(&config, Rc::clone(&waypoints)),
            config,
            map: Box::new(map),
            waypoints,
            tile_length,
            towers: TowerRegistry::new(),
            next_projectile: 0,
            tick_index: 0,
        })
    }

    /// Snaps a world-space position onto the centre of its tile.
    #[must_use]
    pub fn snap_to_grid(&self, position: Vec2) -> Vec2 {
        (position / self.tile_length).floor() * self.tile_length
            + Vec2::splat(self.tile_length / 2.0)
    }

    fn ballistics(&self) -> Ballistics {
        Ballistics {
            speed: self.config.projectile_speed,
            arrival_threshold: self.config.projectile_arrival_threshold,
        }
    }

    /// Checks whether a tower could stand on the tile containing `position`.
    ///
    /// Funds are not considered.
    pub fn can_place_tower(&self, position: Vec2) -> Result<(), PlacementError> {
        let snapped = self.snap_to_grid(position);
        if self.map.is_path_tile(snapped) {
            return Err(PlacementError::OnPath);
        }
        if self.towers.id_at(snapped).is_some() {
            return Err(PlacementError::Occupied);
        }
        Ok(())
    }

    /// Buys a tower and places it on the tile containing `position`.
    pub fn try_place_tower(
        &mut self,
        kind: TowerKind,
        position: Vec2,
        out_events: &mut Vec<Event>,
    ) -> Result<TowerId, PlacementError> {
        self.can_place_tower(position)?;
        let cost = kind.cost();
        if self.waves.currency < i64::from(cost) {
            return Err(PlacementError::InsufficientFunds);
        }

        let snapped = self.snap_to_grid(position);
        let tower = self.towers.insert(kind, snapped);
        self.waves.adjust_currency(-i64::from(cost), out_events);
        tracing::info!(
            tower = tower.get(),
            kind = kind.label(),
            x = snapped.x,
            y = snapped.y,
            "tower placed"
        );
        out_events.push(Event::TowerPlaced {
            tower,
            kind,
            position: snapped,
        });
        Ok(tower)
    }

    /// Upgrades the tower on the tile containing `position`, returning its new level.
    pub fn try_upgrade_tower(
        &mut self,
        position: Vec2,
        out_events: &mut Vec<Event>,
    ) -> Result<u8, UpgradeError> {
        let snapped = self.snap_to_grid(position);
        let id = self
            .towers
            .id_at(snapped)
            .ok_or(UpgradeError::MissingTower)?;
        let cost = match self.towers.get(id) {
            Some(tower) if tower.can_upgrade() => tower.upgrade_cost(),
            Some(_) => return Err(UpgradeError::MaxLevel),
            None => return Err(UpgradeError::MissingTower),
        };
        if self.waves.currency < i64::from(cost) {
            return Err(UpgradeError::InsufficientFunds);
        }

        let tower = self.towers.get_mut(id).ok_or(UpgradeError::MissingTower)?;
        if !tower.upgrade() {
            return Err(UpgradeError::MaxLevel);
        }
        let level = tower.level;
        self.waves.adjust_currency(-i64::from(cost), out_events);
        tracing::info!(tower = id.get(), level, cost, "tower upgraded");
        out_events.push(Event::TowerUpgraded {
            tower: id,
            level,
            cost,
        });
        Ok(level)
    }

    /// Sells the tower on the tile containing `position`, returning the refund.
    pub fn try_sell_tower(
        &mut self,
        position: Vec2,
        out_events: &mut Vec<Event>,
    ) -> Result<u32, SaleError> {
        let snapped = self.snap_to_grid(position);
        let tower = self
            .towers
            .id_at(snapped)
            .and_then(|id| self.towers.remove(id))
            .ok_or(SaleError::MissingTower)?;

        let refund = tower.refund_value();
        self.waves.adjust_currency(i64::from(refund), out_events);
        tracing::info!(tower = tower.id.get(), refund, "tower sold");
        out_events.push(Event::TowerSold {
            tower: tower.id,
            refund,
        });
        Ok(refund)
    }

    /// Loads the next wave into the spawn queue.
    pub fn start_next_wave(&mut self, out_events: &mut Vec<Event>) -> Result<(), WaveStartError> {
        self.waves.start_next_wave(out_events)
    }

    /// Adds `delta` to the player's currency; the balance may become negative.
    pub fn adjust_currency(&mut self, delta: i64, out_events: &mut Vec<Event>) {
        self.waves.adjust_currency(delta, out_events);
    }

    /// Restores the starting campaign state and removes every entity.
    pub fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.waves.reset();
        self.towers.clear();
        self.next_projectile = 0;
        tracing::info!("world reset");
        out_events.push(Event::GameReset);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        self.waves.update(dt, out_events);

        let critters = self.waves.critter_view();
        for tower in self.towers.iter_mut() {
            tower.update(dt, &critters, &mut self.next_projectile, out_events);
        }

        let ballistics = self.ballistics();
        for tower in self.towers.iter_mut() {
            tower.advance_projectiles(dt, ballistics, &mut self.waves.critters, out_events);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Refused commands leave the world untouched and emit a matching rejection event.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::StartNextWave => {
            if let Err(reason) = world.start_next_wave(out_events) {
                tracing::warn!(?reason, "wave start refused");
                out_events.push(Event::WaveStartRejected { reason });
            }
        }
        Command::PlaceTower { kind, position } => {
            if let Err(reason) = world.try_place_tower(kind, position, out_events) {
                tracing::warn!(?reason, kind = kind.label(), "tower placement refused");
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    position,
                    reason,
                });
            }
        }
        Command::UpgradeTower { position } => {
            if let Err(reason) = world.try_upgrade_tower(position, out_events) {
                tracing::warn!(?reason, "tower upgrade refused");
                out_events.push(Event::TowerUpgradeRejected { position, reason });
            }
        }
        Command::SellTower { position } => {
            if let Err(reason) = world.try_sell_tower(position, out_events) {
                tracing::warn!(?reason, "tower sale refused");
                out_events.push(Event::TowerSaleRejected { position, reason });
            }
        }
        Command::AdjustCurrency { delta } => world.adjust_currency(delta, out_events),
        Command::Reset => world.reset(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use waypoint_defence_core::{
        CritterSnapshot, CritterView, ProjectileSnapshot, TowerSnapshot, TowerView, Vec2,
    };

    use super::{Config, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was constructed with.
    #[must_use]
    pub fn config(world: &World) -> &Config {
        &world.config
    }

    /// Number of ticks processed since construction.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Current currency balance; negative values represent debt.
    #[must_use]
    pub fn currency(world: &World) -> i64 {
        world.waves.currency
    }

    /// Remaining life points.
    #[must_use]
    pub fn life_points(world: &World) -> u32 {
        world.waves.life_points
    }

    /// One-based number of the current (or next) wave.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.waves.wave
    }

    /// Reports whether a wave is spawning or has critters on the path.
    #[must_use]
    pub fn wave_in_progress(world: &World) -> bool {
        world.waves.wave_in_progress
    }

    /// Reports whether life points ran out.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.waves.game_over
    }

    /// Reports whether the final wave was cleared.
    #[must_use]
    pub fn is_game_complete(world: &World) -> bool {
        world.waves.game_complete
    }

    /// Reports whether a `StartNextWave` command would be accepted.
    #[must_use]
    pub fn can_start_next_wave(world: &World) -> bool {
        world.waves.can_start_next_wave().is_ok()
    }

    /// Number of critters still waiting in the spawn queue.
    #[must_use]
    pub fn queued_critters(world: &World) -> usize {
        world.waves.spawn_queue.len()
    }

    /// Ordered waypoints critters walk along.
    #[must_use]
    pub fn waypoints(world: &World) -> &[Vec2] {
        &world.waypoints
    }

    /// Side length of a map tile.
    #[must_use]
    pub fn tile_length(world: &World) -> f32 {
        world.tile_length
    }

    /// Reports whether a tower could stand on the tile containing `position`.
    #[must_use]
    pub fn can_place_tower(world: &World, position: Vec2) -> bool {
        world.can_place_tower(position).is_ok()
    }

    /// Captures a read-only view of the critters on the path.
    #[must_use]
    pub fn critter_view(world: &World) -> CritterView {
        world.waves.critter_view()
    }

    /// Captures a read-only view of the towers on the map.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures every in-flight projectile, grouped by tower.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .towers
            .iter()
            .flat_map(|tower| tower.projectiles.iter().map(|projectile| projectile.snapshot()))
            .collect()
    }

    /// First live critter whose hit box contains `point`.
    #[must_use]
    pub fn critter_at(world: &World, point: Vec2) -> Option<CritterSnapshot> {
        world
            .waves
            .critter_at(point, world.config.critter_half_extent)
            .map(|critter| critter.snapshot())
    }

    /// Tower standing on the tile containing `position`.
    #[must_use]
    pub fn tower_at(world: &World, position: Vec2) -> Option<TowerSnapshot> {
        let snapped = world.snap_to_grid(position);
        world
            .towers
            .id_at(snapped)
            .and_then(|id| world.towers.get(id))
            .map(|tower| tower.snapshot())
    }

    /// Tower whose centre lies within half a tile of `point` on both axes.
    #[must_use]
    pub fn tower_under(world: &World, point: Vec2) -> Option<TowerSnapshot> {
        let half = world.tile_length / 2.0;
        world
            .towers
            .iter()
            .find(|tower| {
                let delta = (point - tower.position).abs();
                delta.x <= half && delta.y <= half
            })
            .map(|tower| tower.snapshot())
    }
}
