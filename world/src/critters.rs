//! Mobile units walking the critter path.

use std::{rc::Rc, time::Duration};

use waypoint_defence_core::{CritterId, CritterKind, CritterSnapshot, CritterSpec, Vec2};

/// Critter stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Critter {
    pub(crate) id: CritterId,
    pub(crate) kind: CritterKind,
    path: Rc<[Vec2]>,
    pub(crate) position: Vec2,
    pub(crate) waypoint: usize,
    pub(crate) speed: f32,
    pub(crate) health: f32,
    pub(crate) reward: u32,
    pub(crate) dead: bool,
    pub(crate) reached_end: bool,
}

impl Critter {
    /// Places a new critter on the first waypoint of the path.
    pub(crate) fn spawn(id: CritterId, spec: CritterSpec, path: Rc<[Vec2]>) -> Self {
        let position = path.first().copied().unwrap_or(Vec2::ZERO);
        Self {
            id,
            kind: spec.kind,
            path,
            position,
            waypoint: 0,
            speed: spec.speed,
            health: spec.health,
            reward: spec.reward,
            dead: false,
            reached_end: false,
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        !self.dead && !self.reached_end
    }

    /// Walks towards the current waypoint, snapping onto it once within reach.
    pub(crate) fn advance(&mut self, dt: Duration) {
        if !self.is_live() {
            return;
        }
        let Some(target) = self.path.get(self.waypoint).copied() else {
            self.reached_end = true;
            return;
        };

        let step = self.speed * dt.as_secs_f32();
        let offset = target - self.position;
        let distance = offset.length();
        if distance <= step {
            self.position = target;
            self.waypoint += 1;
            if self.waypoint >= self.path.len() {
                self.reached_end = true;
            }
        } else {
            self.position += offset / distance * step;
        }
    }

    /// Subtracts `amount` from the critter's health.
    ///
    /// Returns `true` when the hit killed the critter.
    pub(crate) fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_live() {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.dead = true;
        }
        self.dead
    }

    /// Reports whether `point` lies inside the critter's square hit box.
    pub(crate) fn contains(&self, point: Vec2, half_extent: f32) -> bool {
        let delta = (point - self.position).abs();
        delta.x <= half_extent && delta.y <= half_extent
    }

    pub(crate) fn snapshot(&self) -> CritterSnapshot {
        CritterSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            waypoint: self.waypoint,
            speed: self.speed,
            reward: self.reward,
            dead: self.dead,
            reached_end: self.reached_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn critter(health: f32) -> Critter {
        let path: Rc<[Vec2]> = Rc::from(vec![Vec2::ZERO, Vec2::new(100.0, 0.0)]);
        Critter::spawn(
            CritterId::new(0),
            CritterSpec::new(CritterKind::Basic, 50.0, health, 5),
            path,
        )
    }

    #[test]
    fn health_drops_by_exact_damage() {
        let mut critter = critter(100.0);
        assert!(!critter.take_damage(30.0));
        assert_eq!(critter.health, 70.0);
    }

    #[test]
    fn zero_health_is_dead_but_a_sliver_survives() {
        let mut exact = critter(50.0);
        assert!(exact.take_damage(50.0));

        let mut sliver = critter(50.0001);
        assert!(!sliver.take_damage(50.0));
        assert!(sliver.is_live());
    }

    #[test]
    fn walks_waypoints_and_flags_the_exit() {
        let mut critter = critter(100.0);
        critter.advance(Duration::from_millis(100));
        assert_eq!(critter.waypoint, 1);
        assert_eq!(critter.position, Vec2::ZERO);

        critter.advance(Duration::from_secs(1));
        assert_eq!(critter.position, Vec2::new(50.0, 0.0));
        assert!(!critter.reached_end);

        critter.advance(Duration::from_secs(1));
        assert!(critter.reached_end);
        assert!(!critter.take_damage(10.0));
        assert_eq!(critter.health, 100.0);
    }
}
