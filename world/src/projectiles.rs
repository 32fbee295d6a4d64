//! Projectiles travelling from towers to their captured targets.

use std::time::Duration;

use waypoint_defence_core::{
    CritterId, Event, ProjectileId, ProjectileSnapshot, TowerId, Vec2, SPECIAL_DAMAGE_MULTIPLIER,
    SPLASH_DAMAGE_RATIO,
};

use crate::critters::Critter;

/// Motion parameters shared by every projectile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ballistics {
    pub(crate) speed: f32,
    pub(crate) arrival_threshold: f32,
}

/// Projectile owned by the tower that fired it.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) position: Vec2,
    pub(crate) target: CritterId,
    pub(crate) damage: f32,
    pub(crate) aoe_radius: f32,
    pub(crate) special: bool,
    pub(crate) hit: bool,
}

impl Projectile {
    /// Moves towards the target and resolves damage once it arrives.
    ///
    /// A target that vanished or died deactivates the projectile silently.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        ballistics: Ballistics,
        critters: &mut [Critter],
        out_events: &mut Vec<Event>,
    ) {
        if self.hit {
            return;
        }
        let Some(index) = target_index(critters, self.target) else {
            self.hit = true;
            return;
        };

        let target_position = critters[index].position;
        let offset = target_position - self.position;
        let distance = offset.length();
        if distance < ballistics.arrival_threshold {
            self.resolve(index, critters, out_events);
            self.hit = true;
            return;
        }

        let step = (ballistics.speed * dt.as_secs_f32()).min(distance);
        self.position += offset / distance * step;
    }

    fn resolve(&self, index: usize, critters: &mut [Critter], out_events: &mut Vec<Event>) {
        let target = &mut critters[index];
        let bonus = self.special && target.kind.is_top_tier();
        let amount = if bonus {
            self.damage * SPECIAL_DAMAGE_MULTIPLIER
        } else {
            self.damage
        };
        let impact = target.position;
        let _ = target.take_damage(amount);
        out_events.push(Event::CritterDamaged {
            critter: target.id,
            amount,
            special: bonus,
        });
        tracing::debug!(
            projectile = self.id.get(),
            critter = self.target.get(),
            amount,
            "projectile impact"
        );

        if self.aoe_radius <= 0.0 {
            return;
        }
        let splash = self.damage * SPLASH_DAMAGE_RATIO;
        for other in critters.iter_mut() {
            if other.id == self.target || !other.is_live() {
                continue;
            }
            if impact.distance(other.position) <= self.aoe_radius {
                let _ = other.take_damage(splash);
                out_events.push(Event::CritterDamaged {
                    critter: other.id,
                    amount: splash,
                    special: false,
                });
            }
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            tower: self.tower,
            position: self.position,
            target: self.target,
            aoe_radius: self.aoe_radius,
            special: self.special,
        }
    }
}

/// Index of the live critter carrying `id`.
///
/// Critters are stored in spawn order, which matches identifier order.
fn target_index(critters: &[Critter], id: CritterId) -> Option<usize> {
    critters
        .binary_search_by_key(&id, |critter| critter.id)
        .ok()
        .filter(|index| critters[*index].is_live())
}
