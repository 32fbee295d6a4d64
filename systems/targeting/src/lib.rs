#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that chooses tower targets from critter snapshots.
//!
//! Five stateless strategies share the [`TargetingStrategy`] trait and live in
//! a static table indexed by [`StrategyKind`]. The [`AdaptiveSelector`] owned
//! by each tower inspects the whole battlefield every targeting cycle and
//! decides which of them to delegate to.

use waypoint_defence_core::{
    CritterId, CritterKind, CritterSnapshot, CritterView, StrategyKind, TowerKind, Vec2,
};

/// Health assumed as the ceiling when the smart strategy normalises health.
pub const SMART_ASSUMED_MAX_HEALTH: f32 = 800.0;

/// Distance at which the smart strategy's proximity factor reaches zero.
pub const SMART_PROXIMITY_SPAN: f32 = 200.0;

/// Progress ratio above which a critter counts as close to the exit.
pub const NEAR_EXIT_RATIO: f32 = 0.7;

/// Waypoint index used as the progress denominator before any critter advanced.
pub const DEFAULT_MAX_WAYPOINT: usize = 10;

/// In-range critter count at which area towers switch to closest-first.
pub const CLUSTER_THRESHOLD: usize = 5;

/// Live critter count at or below which towers focus the strongest critter.
pub const FEW_CRITTERS_THRESHOLD: usize = 3;

/// Selection algorithm mapping a tower's reach onto a single critter.
pub trait TargetingStrategy: Sync {
    /// Tag identifying the strategy.
    fn kind(&self) -> StrategyKind;

    /// Picks a critter among the live ones within `range` of `origin`.
    fn find_target(&self, origin: Vec2, range: f32, critters: &CritterView) -> Option<CritterId>;
}

/// Prefers the critter furthest along the path.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExitProximity;

/// Prefers the critter with the most remaining health.
#[derive(Clone, Copy, Debug, Default)]
pub struct Strongest;

/// Prefers the critter with the least remaining health.
#[derive(Clone, Copy, Debug, Default)]
pub struct Weakest;

/// Prefers the critter nearest to the tower.
#[derive(Clone, Copy, Debug, Default)]
pub struct Closest;

/// Blends path progress, health and proximity into a single score.
#[derive(Clone, Copy, Debug, Default)]
pub struct Smart;

static STRATEGIES: [&dyn TargetingStrategy; 5] =
    [&Smart, &ExitProximity, &Strongest, &Weakest, &Closest];

/// Resolves the shared strategy instance for the provided kind.
#[must_use]
pub fn strategy_for(kind: StrategyKind) -> &'static dyn TargetingStrategy {
    STRATEGIES[kind.index()]
}

fn in_range<'a>(
    origin: Vec2,
    range: f32,
    critters: &'a CritterView,
) -> impl Iterator<Item = (&'a CritterSnapshot, f32)> + 'a {
    critters
        .live()
        .map(move |critter| (critter, origin.distance(critter.position)))
        .filter(move |(_, distance)| *distance <= range)
}

/// Picks the candidate with the greatest score; the earliest one wins ties.
fn first_max<'a, I>(candidates: I) -> Option<CritterId>
where
    I: Iterator<Item = (&'a CritterSnapshot, f32)>,
{
    let mut best: Option<(CritterId, f32)> = None;
    for (critter, score) in candidates {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((critter.id, score)),
        }
    }
    best.map(|(id, _)| id)
}

impl TargetingStrategy for ExitProximity {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ExitProximity
    }

    fn find_target(&self, origin: Vec2, range: f32, critters: &CritterView) -> Option<CritterId> {
        first_max(
            in_range(origin, range, critters)
                .map(|(critter, _)| (critter, critter.waypoint as f32)),
        )
    }
}

impl TargetingStrategy for Strongest {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Strongest
    }

    fn find_target(&self, origin: Vec2, range: f32, critters: &CritterView) -> Option<CritterId> {
        first_max(in_range(origin, range, critters).map(|(critter, _)| (critter, critter.health)))
    }
}

impl TargetingStrategy for Weakest {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Weakest
    }

    fn find_target(&self, origin: Vec2, range: f32, critters: &CritterView) -> Option<CritterId> {
        first_max(
            in_range(origin, range, critters)
                .filter(|(critter, _)| critter.health > 0.0)
                .map(|(critter, _)| (critter, -critter.health)),
        )
    }
}

impl TargetingStrategy for Closest {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Closest
    }

    fn find_target(&self, origin: Vec2, range: f32, critters: &CritterView) -> Option<CritterId> {
        let mut closest = range + 1.0;
        let mut target = None;
        for (critter, distance) in in_range(origin, range, critters) {
            if distance < closest {
                closest = distance;
                target = Some(critter.id);
            }
        }
        target
    }
}

impl Smart {
    /// Priority score of a critter as seen from `origin`.
    ///
    /// `max_waypoint` is the furthest waypoint index reached by any live critter.
    #[must_use]
    pub fn score(origin: Vec2, critter: &CritterSnapshot, max_waypoint: usize) -> f32 {
        let progress = critter.waypoint as f32 / max_waypoint.max(1) as f32;
        let strength = critter.health / SMART_ASSUMED_MAX_HEALTH;
        let proximity = 1.0 - origin.distance(critter.position) / SMART_PROXIMITY_SPAN;

        let score = progress * 3.0 + strength * 2.0 + proximity;
        if progress > NEAR_EXIT_RATIO && strength > NEAR_EXIT_RATIO {
            score * 1.5
        } else {
            score
        }
    }
}

impl TargetingStrategy for Smart {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Smart
    }

    fn find_target(&self, origin: Vec2, range: f32, critters: &CritterView) -> Option<CritterId> {
        let max_waypoint = critters
            .live()
            .map(|critter| critter.waypoint)
            .max()
            .unwrap_or(0);
        first_max(
            in_range(origin, range, critters)
                .map(|(critter, _)| (critter, Self::score(origin, critter, max_waypoint))),
        )
    }
}

/// Picks the first live top-tier critter within `range` of `origin`.
///
/// Used by towers carrying a focus decoration before regular strategy
/// selection runs.
#[must_use]
pub fn focus_target(origin: Vec2, range: f32, critters: &CritterView) -> Option<CritterId> {
    in_range(origin, range, critters)
        .find(|(critter, _)| critter.kind == CritterKind::TOP_TIER)
        .map(|(critter, _)| critter.id)
}

/// Tower properties the selector consults each targeting cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerContext {
    /// World-space position of the tower.
    pub position: Vec2,
    /// Effective targeting range of the tower.
    pub range: f32,
    /// Type of the tower.
    pub kind: TowerKind,
}

/// Aggregated battlefield facts gathered before a strategy is picked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Battlefield {
    /// Whether any live critter belongs to the top tier.
    pub top_tier_present: bool,
    /// Whether any live critter passed the near-exit progress ratio.
    pub near_exit: bool,
    /// Live critters within the tower's range.
    pub in_range: usize,
    /// Live critters on the whole map.
    pub total: usize,
}

impl Battlefield {
    /// Surveys the critter view from the perspective of the provided tower.
    #[must_use]
    pub fn survey(tower: &TowerContext, critters: &CritterView) -> Self {
        let max_waypoint = match critters.live().map(|critter| critter.waypoint).max() {
            Some(0) | None => DEFAULT_MAX_WAYPOINT,
            Some(value) => value,
        };

        let mut survey = Self::default();
        for critter in critters.live() {
            survey.total += 1;
            if critter.kind.is_top_tier() {
                survey.top_tier_present = true;
            }
            if critter.waypoint as f32 / max_waypoint as f32 > NEAR_EXIT_RATIO {
                survey.near_exit = true;
            }
            if tower.position.distance(critter.position) <= tower.range {
                survey.in_range += 1;
            }
        }
        survey
    }

    /// Applies the decision order to the surveyed facts.
    #[must_use]
    pub fn recommend(&self, tower_kind: TowerKind) -> StrategyKind {
        if self.top_tier_present && tower_kind == TowerKind::Special {
            StrategyKind::Strongest
        } else if self.near_exit {
            StrategyKind::ExitProximity
        } else if self.in_range >= CLUSTER_THRESHOLD {
            if tower_kind == TowerKind::Area {
                StrategyKind::Closest
            } else {
                StrategyKind::Smart
            }
        } else if self.total <= FEW_CRITTERS_THRESHOLD {
            StrategyKind::Strongest
        } else {
            StrategyKind::Smart
        }
    }
}

/// Per-tower heuristic that re-picks a strategy every targeting cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdaptiveSelector {
    current: StrategyKind,
}

impl Default for AdaptiveSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveSelector {
    /// Creates a selector that starts on the smart strategy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: StrategyKind::Smart,
        }
    }

    /// Strategy chosen during the most recent selection.
    #[must_use]
    pub const fn current(&self) -> StrategyKind {
        self.current
    }

    /// Re-evaluates the battlefield and returns the strategy to delegate to.
    pub fn select(
        &mut self,
        tower: &TowerContext,
        critters: &CritterView,
    ) -> &'static dyn TargetingStrategy {
        let next = if critters.live().next().is_none() {
            StrategyKind::Smart
        } else {
            Battlefield::survey(tower, critters).recommend(tower.kind)
        };

        if next != self.current {
            tracing::debug!(
                from = self.current.label(),
                to = next.label(),
                "targeting strategy switched"
            );
            self.current = next;
        }
        strategy_for(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_table_matches_strategy_tags() {
        for kind in StrategyKind::ALL {
            assert_eq!(strategy_for(kind).kind(), kind);
        }
    }

    #[test]
    fn smart_score_boosts_strong_critters_near_exit() {
        let critter = CritterSnapshot {
            id: CritterId::new(0),
            kind: CritterKind::Strong,
            position: Vec2::new(100.0, 0.0),
            health: 800.0,
            waypoint: 8,
            speed: 80.0,
            reward: 50,
            dead: false,
            reached_end: false,
        };
        let score = Smart::score(Vec2::ZERO, &critter, 10);
        let expected = (0.8 * 3.0 + 2.0 + 0.5) * 1.5;
        assert!((score - expected).abs() < 1e-4);
    }

    #[test]
    fn survey_defaults_max_waypoint_before_progress() {
        let critter = CritterSnapshot {
            id: CritterId::new(0),
            kind: CritterKind::Basic,
            position: Vec2::ZERO,
            health: 110.0,
            waypoint: 0,
            speed: 105.0,
            reward: 6,
            dead: false,
            reached_end: false,
        };
        let tower = TowerContext {
            position: Vec2::ZERO,
            range: 150.0,
            kind: TowerKind::Basic,
        };
        let survey = Battlefield::survey(&tower, &CritterView::from_snapshots(vec![critter]));
        assert!(!survey.near_exit);
        assert_eq!(survey.in_range, 1);
        assert_eq!(survey.total, 1);
    }
}
