#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Upgrade decorations layered onto towers without touching their base stats.
//!
//! A tower keeps its own base stats and an ordered [`DecorationStack`]. Every
//! query folds the stack over the base value, innermost layer first, so a
//! stack of boosts yields the product of their multipliers. Integer queries
//! (refund value and upgrade cost) truncate after every layer.

use waypoint_defence_core::{TowerKind, TowerStats};

/// Upgrade cost multiplier attached to range boosts.
pub const RANGE_BOOST_COST_FACTOR: f32 = 1.2;

/// Upgrade cost multiplier attached to power boosts.
pub const POWER_BOOST_COST_FACTOR: f32 = 1.3;

/// Upgrade cost multiplier attached to fire-rate boosts.
pub const FIRE_RATE_BOOST_COST_FACTOR: f32 = 1.25;

/// Range multiplier attached to AoE enhancers.
pub const AOE_ENHANCER_RANGE_FACTOR: f32 = 1.1;

/// Power multiplier granted by the top-tier focus decoration.
pub const FOCUS_POWER_FACTOR: f32 = 1.2;

/// A single stat transform or behaviour override layered onto a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decoration {
    /// Multiplies range; makes further upgrades pricier.
    RangeBoost(f32),
    /// Multiplies power; makes further upgrades pricier.
    PowerBoost(f32),
    /// Multiplies fire rate; makes further upgrades pricier.
    FireRateBoost(f32),
    /// Multiplies the splash radius and slightly extends range.
    AoeEnhancer(f32),
    /// Multiplies the refund granted on sale.
    RefundBooster(f32),
    /// Grants a small power bonus and prioritises top-tier critters in range.
    TopTierFocus,
}

impl Decoration {
    /// Transforms the stats reported by the inner layers.
    #[must_use]
    pub fn apply_stats(self, stats: TowerStats) -> TowerStats {
        let mut next = stats;
        match self {
            Self::RangeBoost(factor) => next.range *= factor,
            Self::PowerBoost(factor) => next.power *= factor,
            Self::FireRateBoost(factor) => next.fire_rate *= factor,
            Self::AoeEnhancer(factor) => {
                next.aoe_radius *= factor;
                next.range *= AOE_ENHANCER_RANGE_FACTOR;
            }
            Self::RefundBooster(_) => {}
            Self::TopTierFocus => next.power *= FOCUS_POWER_FACTOR,
        }
        next
    }

    /// Transforms the upgrade cost reported by the inner layers.
    #[must_use]
    pub fn apply_upgrade_cost(self, cost: u32) -> u32 {
        match self {
            Self::RangeBoost(_) => scale(cost, RANGE_BOOST_COST_FACTOR),
            Self::PowerBoost(_) => scale(cost, POWER_BOOST_COST_FACTOR),
            Self::FireRateBoost(_) => scale(cost, FIRE_RATE_BOOST_COST_FACTOR),
            Self::AoeEnhancer(_) | Self::RefundBooster(_) | Self::TopTierFocus => cost,
        }
    }

    /// Transforms the refund value reported by the inner layers.
    #[must_use]
    pub fn apply_refund(self, refund: u32) -> u32 {
        match self {
            Self::RefundBooster(factor) => scale(refund, factor),
            _ => refund,
        }
    }

    /// Reports whether the layer overrides targeting in favour of top-tier critters.
    #[must_use]
    pub const fn prioritises_top_tier(self) -> bool {
        matches!(self, Self::TopTierFocus)
    }
}

fn scale(value: u32, factor: f32) -> u32 {
    (value as f32 * factor) as u32
}

const BASIC_LEVEL_2: [Decoration; 2] = [
    Decoration::RangeBoost(1.2),
    Decoration::FireRateBoost(1.3),
];
const AREA_LEVEL_2: [Decoration; 2] = [Decoration::AoeEnhancer(1.3), Decoration::PowerBoost(1.4)];
const SPECIAL_LEVEL_2: [Decoration; 2] = [Decoration::PowerBoost(1.6), Decoration::TopTierFocus];
const BASIC_LEVEL_3: [Decoration; 3] = [
    Decoration::RangeBoost(1.3),
    Decoration::PowerBoost(1.5),
    Decoration::FireRateBoost(1.4),
];
const AREA_LEVEL_3: [Decoration; 3] = [
    Decoration::AoeEnhancer(1.5),
    Decoration::PowerBoost(1.6),
    Decoration::RefundBooster(1.3),
];
const SPECIAL_LEVEL_3: [Decoration; 3] = [
    Decoration::PowerBoost(2.0),
    Decoration::TopTierFocus,
    Decoration::FireRateBoost(1.5),
];

/// Decorations applied, in order, when a tower of `kind` reaches `new_level`.
///
/// Levels without a bundle yield an empty slice.
#[must_use]
pub fn level_up_bundle(kind: TowerKind, new_level: u8) -> &'static [Decoration] {
    match (new_level, kind) {
        (2, TowerKind::Basic) => &BASIC_LEVEL_2,
        (2, TowerKind::Area) => &AREA_LEVEL_2,
        (2, TowerKind::Special) => &SPECIAL_LEVEL_2,
        (3, TowerKind::Basic) => &BASIC_LEVEL_3,
        (3, TowerKind::Area) => &AREA_LEVEL_3,
        (3, TowerKind::Special) => &SPECIAL_LEVEL_3,
        _ => &[],
    }
}

/// Ordered decoration layers owned by a single tower.
///
/// Index zero is the innermost layer, wrapped directly around the base tower.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecorationStack {
    layers: Vec<Decoration>,
}

impl DecorationStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the current stack in a new outermost layer.
    pub fn push(&mut self, decoration: Decoration) {
        self.layers.push(decoration);
    }

    /// Wraps the stack in every layer of the provided bundle, in order.
    pub fn extend_from_slice(&mut self, bundle: &[Decoration]) {
        self.layers.extend_from_slice(bundle);
    }

    /// Number of layers in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Reports whether the stack has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterator over the layers from innermost to outermost.
    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.layers.iter()
    }

    /// Folds every layer over the base stats.
    #[must_use]
    pub fn stats(&self, base: TowerStats) -> TowerStats {
        self.layers
            .iter()
            .fold(base, |stats, layer| layer.apply_stats(stats))
    }

    /// Folds every layer over the base upgrade cost.
    #[must_use]
    pub fn upgrade_cost(&self, base: u32) -> u32 {
        self.layers
            .iter()
            .fold(base, |cost, layer| layer.apply_upgrade_cost(cost))
    }

    /// Folds every layer over the base refund value.
    #[must_use]
    pub fn refund_value(&self, base: u32) -> u32 {
        self.layers
            .iter()
            .fold(base, |refund, layer| layer.apply_refund(refund))
    }

    /// Reports whether any layer prioritises top-tier critters.
    #[must_use]
    pub fn prioritises_top_tier(&self) -> bool {
        self.layers.iter().any(|layer| layer.prioritises_top_tier())
    }
}
