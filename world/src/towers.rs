//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use waypoint_defence_core::{
    CritterView, Event, ProjectileId, TowerId, TowerKind, TowerSnapshot, TowerStats, Vec2,
    AOE_BASE_UNIT, LEVEL_2_UPGRADE_COST, LEVEL_3_UPGRADE_COST, MAX_TOWER_LEVEL, REFUND_RATIO,
};
use waypoint_defence_system_targeting::{focus_target, AdaptiveSelector, TowerContext};
use waypoint_defence_system_upgrades::{level_up_bundle, DecorationStack};

use crate::{
    critters::Critter,
    projectiles::{Ballistics, Projectile},
};

const RANGE_PER_LEVEL: f32 = 1.2;
const POWER_PER_LEVEL: f32 = 1.5;
const FIRE_RATE_PER_LEVEL: f32 = 1.2;

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) position: Vec2,
    pub(crate) level: u8,
    base: TowerStats,
    decorations: DecorationStack,
    selector: AdaptiveSelector,
    fire_timer: Duration,
    last_shot: Duration,
    pub(crate) projectiles: Vec<Projectile>,
}

impl Tower {
    pub(crate) fn new(id: TowerId, kind: TowerKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            level: 1,
            base: kind.base_stats(),
            decorations: DecorationStack::new(),
            selector: AdaptiveSelector::new(),
            fire_timer: Duration::ZERO,
            last_shot: Duration::ZERO,
            projectiles: Vec::new(),
        }
    }

    /// Stats after every decoration layer has been applied.
    pub(crate) fn stats(&self) -> TowerStats {
        self.decorations.stats(self.base)
    }

    pub(crate) fn can_upgrade(&self) -> bool {
        self.level < MAX_TOWER_LEVEL
    }

    /// Advances one level, scaling base stats and layering the level-up bundle.
    ///
    /// Returns `false` and changes nothing at max level.
    pub(crate) fn upgrade(&mut self) -> bool {
        if !self.can_upgrade() {
            return false;
        }
        self.level += 1;
        self.base.range *= RANGE_PER_LEVEL;
        self.base.power *= POWER_PER_LEVEL;
        self.base.fire_rate *= FIRE_RATE_PER_LEVEL;
        if self.kind == TowerKind::Area {
            self.base.aoe_radius = AOE_BASE_UNIT * f32::from(self.level);
        }
        self.decorations
            .extend_from_slice(level_up_bundle(self.kind, self.level));
        true
    }

    /// Price of the next level, zero at max level.
    pub(crate) fn upgrade_cost(&self) -> u32 {
        let base = match self.level {
            1 => LEVEL_2_UPGRADE_COST,
            2 => LEVEL_3_UPGRADE_COST,
            _ => 0,
        };
        self.decorations.upgrade_cost(base)
    }

    /// Currency returned when the tower is sold.
    pub(crate) fn refund_value(&self) -> u32 {
        let mut invested = self.kind.cost();
        if self.level >= 2 {
            invested += LEVEL_2_UPGRADE_COST;
        }
        if self.level >= 3 {
            invested += LEVEL_3_UPGRADE_COST;
        }
        let base = (invested as f32 * REFUND_RATIO) as u32;
        self.decorations.refund_value(base)
    }

    /// Accumulates the fire timer and fires once the cooldown elapsed.
    ///
    /// The cooldown only restarts when a projectile is actually launched.
    pub(crate) fn update(
        &mut self,
        dt: Duration,
        critters: &CritterView,
        next_projectile: &mut u32,
        out_events: &mut Vec<Event>,
    ) {
        self.fire_timer = self.fire_timer.saturating_add(dt);
        let stats = self.stats();
        if stats.fire_rate <= 0.0 {
            return;
        }
        let since_last_shot = self.fire_timer.saturating_sub(self.last_shot);
        if since_last_shot.as_secs_f32() < 1.0 / stats.fire_rate {
            return;
        }

        let context = TowerContext {
            position: self.position,
            range: stats.range,
            kind: self.kind,
        };
        let previous = self.selector.current();
        let strategy = self.selector.select(&context, critters);
        if strategy.kind() != previous {
            out_events.push(Event::StrategyChanged {
                tower: self.id,
                from: previous,
                to: strategy.kind(),
            });
        }

        // Focus overrides the target only; the selector still tracks the battlefield.
        let focused = if self.decorations.prioritises_top_tier() {
            focus_target(self.position, stats.range, critters)
        } else {
            None
        };
        let Some(target) =
            focused.or_else(|| strategy.find_target(self.position, stats.range, critters))
        else {
            return;
        };

        let id = ProjectileId::new(*next_projectile);
        *next_projectile = next_projectile.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            tower: self.id,
            position: self.position,
            target,
            damage: stats.power,
            aoe_radius: if self.kind == TowerKind::Area {
                stats.aoe_radius
            } else {
                0.0
            },
            special: self.kind.special_multiplier() > 1.0,
            hit: false,
        });
        self.last_shot = self.fire_timer;
        out_events.push(Event::ProjectileFired {
            tower: self.id,
            projectile: id,
            target,
        });
    }

    /// Advances owned projectiles and drops the ones that resolved.
    pub(crate) fn advance_projectiles(
        &mut self,
        dt: Duration,
        ballistics: Ballistics,
        critters: &mut [Critter],
        out_events: &mut Vec<Event>,
    ) {
        for projectile in &mut self.projectiles {
            projectile.advance(dt, ballistics, critters, out_events);
        }
        self.projectiles.retain(|projectile| !projectile.hit);
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            level: self.level,
            stats: self.stats(),
            strategy: self.selector.current(),
            decorations: self.decorations.len(),
            refund_value: self.refund_value(),
            upgrade_cost: self.upgrade_cost(),
            special_multiplier: self.kind.special_multiplier(),
            asset_key: self.kind.asset_key(self.level),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Constructs a tower at `position` and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, position: Vec2) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(id, Tower::new(id, kind, position));
        id
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    /// Finds the tower standing exactly on the snapped position.
    pub(crate) fn id_at(&self, position: Vec2) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.position == position)
            .map(|tower| tower.id)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = TowerId::new(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use waypoint_defence_core::{CritterId, CritterKind, CritterSnapshot, StrategyKind};

    fn close(actual: f32, expected: f32) -> bool {
        (actual - expected).abs() < 1e-3
    }

    fn critter(id: u32, kind: CritterKind, x: f32, health: f32) -> CritterSnapshot {
        CritterSnapshot {
            id: CritterId::new(id),
            kind,
            position: Vec2::new(x, 0.0),
            health,
            waypoint: 0,
            speed: 100.0,
            reward: 5,
            dead: false,
            reached_end: false,
        }
    }

    fn strategy_changes(events: &[Event]) -> Vec<(StrategyKind, StrategyKind)> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::StrategyChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn cooldown_gates_firing_for_every_kind() {
        let critters =
            CritterView::from_snapshots(vec![critter(0, CritterKind::Basic, 50.0, 100.0)]);
        for kind in TowerKind::ALL {
            let mut tower = Tower::new(TowerId::new(0), kind, Vec2::ZERO);
            let period = Duration::from_secs_f32(1.0 / kind.base_stats().fire_rate);
            let mut next_projectile = 0;
            let mut events = Vec::new();

            tower.update(period.mul_f32(0.9), &critters, &mut next_projectile, &mut events);
            assert!(tower.projectiles.is_empty(), "{kind} fired early");

            tower.update(period.mul_f32(0.2), &critters, &mut next_projectile, &mut events);
            assert_eq!(tower.projectiles.len(), 1, "{kind} did not fire");
            assert_eq!(next_projectile, 1);

            let shot = &tower.projectiles[0];
            assert_eq!(shot.target, CritterId::new(0));
            assert_eq!(shot.damage, kind.base_stats().power);
            assert_eq!(shot.aoe_radius > 0.0, kind == TowerKind::Area);
            assert_eq!(shot.special, kind == TowerKind::Special);
        }
    }

    #[test]
    fn cooldown_elapses_at_exactly_one_period() {
        let critters =
            CritterView::from_snapshots(vec![critter(0, CritterKind::Basic, 50.0, 100.0)]);
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Basic, Vec2::ZERO);
        let mut next_projectile = 0;
        let mut events = Vec::new();

        tower.update(Duration::from_millis(500), &critters, &mut next_projectile, &mut events);
        assert_eq!(tower.projectiles.len(), 1);

        tower.update(Duration::from_millis(499), &critters, &mut next_projectile, &mut events);
        assert_eq!(tower.projectiles.len(), 1);

        tower.update(Duration::from_millis(1), &critters, &mut next_projectile, &mut events);
        assert_eq!(tower.projectiles.len(), 2);
    }

    #[test]
    fn nothing_in_range_keeps_the_cooldown_ready() {
        let far = CritterView::from_snapshots(vec![critter(0, CritterKind::Basic, 500.0, 100.0)]);
        let near = CritterView::from_snapshots(vec![critter(0, CritterKind::Basic, 50.0, 100.0)]);
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Basic, Vec2::ZERO);
        let mut next_projectile = 0;
        let mut events = Vec::new();

        tower.update(Duration::from_secs(1), &far, &mut next_projectile, &mut events);
        assert!(tower.projectiles.is_empty());

        tower.update(Duration::from_millis(1), &near, &mut next_projectile, &mut events);
        assert_eq!(tower.projectiles.len(), 1);
    }

    #[test]
    fn strategy_changes_are_reported_once() {
        let critters =
            CritterView::from_snapshots(vec![critter(0, CritterKind::Basic, 50.0, 100.0)]);
        let mut tower = Tower::new(TowerId::new(3), TowerKind::Basic, Vec2::ZERO);
        let mut next_projectile = 0;
        let mut events = Vec::new();

        tower.update(Duration::from_secs(1), &critters, &mut next_projectile, &mut events);
        assert_eq!(
            events[0],
            Event::StrategyChanged {
                tower: TowerId::new(3),
                from: StrategyKind::Smart,
                to: StrategyKind::Strongest,
            }
        );
        assert!(matches!(events[1], Event::ProjectileFired { .. }));

        events.clear();
        tower.update(Duration::from_secs(1), &critters, &mut next_projectile, &mut events);
        assert!(strategy_changes(&events).is_empty());
        assert_eq!(tower.snapshot().strategy, StrategyKind::Strongest);
    }

    #[test]
    fn focus_overrides_the_selected_target_but_not_the_selection() {
        // Strongest would pick the healthy basic critter.
        let critters = CritterView::from_snapshots(vec![
            critter(0, CritterKind::Basic, 30.0, 900.0),
            critter(1, CritterKind::Strong, 60.0, 100.0),
        ]);
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Special, Vec2::ZERO);
        assert!(tower.upgrade());
        assert!(tower.decorations.prioritises_top_tier());
        let mut next_projectile = 0;
        let mut events = Vec::new();

        tower.update(Duration::from_secs(1), &critters, &mut next_projectile, &mut events);

        assert_eq!(tower.projectiles[0].target, CritterId::new(1));
        assert_eq!(
            strategy_changes(&events),
            vec![(StrategyKind::Smart, StrategyKind::Strongest)]
        );
        assert_eq!(tower.snapshot().strategy, StrategyKind::Strongest);
    }

    #[test]
    fn unfocused_towers_follow_the_selector() {
        let critters = CritterView::from_snapshots(vec![
            critter(0, CritterKind::Basic, 30.0, 900.0),
            critter(1, CritterKind::Strong, 60.0, 100.0),
        ]);
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Special, Vec2::ZERO);
        let mut next_projectile = 0;
        let mut events = Vec::new();

        tower.update(Duration::from_secs(1), &critters, &mut next_projectile, &mut events);

        assert_eq!(tower.projectiles[0].target, CritterId::new(0));
    }

    #[test]
    fn upgrade_at_max_level_changes_nothing() {
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Basic, Vec2::ZERO);
        assert!(tower.upgrade());
        assert!(tower.upgrade());
        let before = tower.stats();
        let layers = tower.decorations.len();

        assert!(!tower.upgrade());
        assert_eq!(tower.level, 3);
        assert_eq!(tower.stats(), before);
        assert_eq!(tower.decorations.len(), layers);
        assert_eq!(tower.upgrade_cost(), 0);
    }

    #[test]
    fn first_level_up_scales_base_and_layers_bundle() {
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Basic, Vec2::ZERO);
        assert!(tower.upgrade());

        let stats = tower.stats();
        assert!(close(stats.range, 150.0 * 1.2 * 1.2));
        assert!(close(stats.power, 75.0));
        assert!(close(stats.fire_rate, 2.0 * 1.2 * 1.3));
        // Range and fire-rate boosts raise the 200 tier cost to 240 and then 300.
        assert_eq!(tower.upgrade_cost(), 300);
    }

    #[test]
    fn area_splash_grows_with_level() {
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Area, Vec2::ZERO);
        assert_eq!(tower.stats().aoe_radius, 64.0);
        assert!(tower.upgrade());
        assert!(close(tower.stats().aoe_radius, 128.0 * 1.3));
    }

    #[test]
    fn refund_counts_paid_tiers() {
        let mut tower = Tower::new(TowerId::new(0), TowerKind::Basic, Vec2::ZERO);
        assert_eq!(tower.refund_value(), 75);
        assert!(tower.upgrade());
        assert_eq!(tower.refund_value(), 150);
    }

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerKind::Basic, Vec2::new(32.0, 32.0));
        let second = registry.insert(TowerKind::Area, Vec2::new(96.0, 32.0));

        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));
        assert_eq!(registry.id_at(Vec2::new(96.0, 32.0)), Some(second));
        assert!(registry.remove(first).is_some());
        assert_eq!(registry.iter().count(), 1);
    }
}
