//! Running totals folded from world events for the end-of-run summary.

use waypoint_defence_core::Event;

/// Counters accumulated over a campaign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) towers_bought: u32,
    pub(crate) spawned: u32,
    pub(crate) killed: u32,
    pub(crate) escaped: u32,
    pub(crate) shots: u32,
    pub(crate) strategy_switches: u32,
    pub(crate) bounty: u64,
    pub(crate) refusals: u32,
    pub(crate) waves_cleared: u32,
}

impl Tally {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TowerPlaced { .. } => self.towers_bought += 1,
                Event::CritterSpawned { .. } => self.spawned += 1,
                Event::CritterKilled { reward, .. } => {
                    self.killed += 1;
                    self.bounty += u64::from(*reward);
                }
                Event::CritterEscaped { .. } => self.escaped += 1,
                Event::ProjectileFired { .. } => self.shots += 1,
                Event::StrategyChanged { .. } => self.strategy_switches += 1,
                Event::WaveCompleted { .. } => self.waves_cleared += 1,
                Event::TowerPlacementRejected { .. }
                | Event::TowerUpgradeRejected { .. }
                | Event::TowerSaleRejected { .. }
                | Event::WaveStartRejected { .. } => self.refusals += 1,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::{CritterId, CritterKind, PlacementError, TowerKind, Vec2};

    #[test]
    fn rewards_and_refusals_are_counted() {
        let mut tally = Tally::default();
        tally.record(&[
            Event::CritterKilled {
                critter: CritterId::new(0),
                kind: CritterKind::Basic,
                reward: 6,
            },
            Event::CritterKilled {
                critter: CritterId::new(1),
                kind: CritterKind::Strong,
                reward: 75,
            },
            Event::TowerPlacementRejected {
                kind: TowerKind::Basic,
                position: Vec2::ZERO,
                reason: PlacementError::OnPath,
            },
            Event::CampaignComplete,
        ]);

        assert_eq!(tally.killed, 2);
        assert_eq!(tally.bounty, 81);
        assert_eq!(tally.refusals, 1);
        assert_eq!(tally.spawned, 0);
    }
}
