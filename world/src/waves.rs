//! Wave progression, spawning and the player's economy.

use std::{rc::Rc, time::Duration};

use waypoint_defence_core::{CritterId, CritterView, Event, Vec2, WaveStartError};
use waypoint_defence_system_waves::{self as wave_system, SpawnQueue};

use crate::{config::Config, critters::Critter};

/// Owns the active critters, the spawn queue, currency and life points.
#[derive(Debug)]
pub(crate) struct WaveController {
    path: Rc<[Vec2]>,
    pub(crate) wave: u32,
    final_wave: u32,
    pub(crate) wave_in_progress: bool,
    pub(crate) game_over: bool,
    pub(crate) game_complete: bool,
    pub(crate) currency: i64,
    pub(crate) life_points: u32,
    starting_currency: i64,
    starting_life_points: u32,
    pub(crate) spawn_queue: SpawnQueue,
    pub(crate) critters: Vec<Critter>,
    next_critter_id: u32,
}

impl WaveController {
    pub(crate) fn new(config: &Config, path: Rc<[Vec2]>) -> Self {
        Self {
            path,
            wave: 1,
            final_wave: config.final_wave,
            wave_in_progress: false,
            game_over: false,
            game_complete: false,
            currency: config.starting_currency,
            life_points: config.starting_life_points,
            starting_currency: config.starting_currency,
            starting_life_points: config.starting_life_points,
            spawn_queue: SpawnQueue::new(wave_system::Config::new(config.spawn_delay())),
            critters: Vec::new(),
            next_critter_id: 0,
        }
    }

    pub(crate) fn can_start_next_wave(&self) -> Result<(), WaveStartError> {
        if self.game_over {
            Err(WaveStartError::GameOver)
        } else if self.game_complete || self.wave > self.final_wave {
            Err(WaveStartError::CampaignComplete)
        } else if self.wave_in_progress {
            Err(WaveStartError::WaveInProgress)
        } else {
            Ok(())
        }
    }

    pub(crate) fn start_next_wave(
        &mut self,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WaveStartError> {
        self.can_start_next_wave()?;
        self.spawn_queue.load(wave_system::wave_content(self.wave));
        self.wave_in_progress = true;
        tracing::info!(wave = self.wave, queued = self.spawn_queue.len(), "wave started");
        out_events.push(Event::WaveStarted {
            wave: self.wave,
            queued: self.spawn_queue.len(),
        });
        Ok(())
    }

    /// Adds `delta` to the balance without any bounds check.
    pub(crate) fn adjust_currency(&mut self, delta: i64, out_events: &mut Vec<Event>) {
        self.currency = self.currency.saturating_add(delta);
        out_events.push(Event::CurrencyChanged {
            delta,
            balance: self.currency,
        });
    }

    /// Moves critters, reaps the finished ones, spawns and checks wave completion.
    pub(crate) fn update(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for critter in &mut self.critters {
            critter.advance(dt);
        }
        self.reap(out_events);

        if self.game_over {
            return;
        }

        if let Some(spec) = self.spawn_queue.advance(dt) {
            let id = CritterId::new(self.next_critter_id);
            self.next_critter_id = self.next_critter_id.wrapping_add(1);
            self.critters
                .push(Critter::spawn(id, spec, Rc::clone(&self.path)));
            out_events.push(Event::CritterSpawned {
                critter: id,
                kind: spec.kind,
            });
        }

        if self.wave_in_progress && self.spawn_queue.is_empty() && self.critters.is_empty() {
            self.wave_in_progress = false;
            tracing::info!(wave = self.wave, "wave completed");
            out_events.push(Event::WaveCompleted { wave: self.wave });
            if self.wave < self.final_wave {
                self.wave += 1;
            } else {
                self.game_complete = true;
                tracing::info!("campaign complete");
                out_events.push(Event::CampaignComplete);
            }
        }
    }

    fn reap(&mut self, out_events: &mut Vec<Event>) {
        let (finished, active): (Vec<Critter>, Vec<Critter>) = std::mem::take(&mut self.critters)
            .into_iter()
            .partition(|critter| !critter.is_live());
        self.critters = active;

        for critter in finished {
            if critter.dead {
                out_events.push(Event::CritterKilled {
                    critter: critter.id,
                    kind: critter.kind,
                    reward: critter.reward,
                });
                self.adjust_currency(i64::from(critter.reward), out_events);
                continue;
            }

            let penalty = critter.kind.escape_penalty();
            self.life_points = self.life_points.saturating_sub(penalty.life_points());
            out_events.push(Event::CritterEscaped {
                critter: critter.id,
                kind: critter.kind,
                life_points: self.life_points,
            });
            self.adjust_currency(-penalty.currency(), out_events);

            if self.life_points == 0 && !self.game_over {
                self.game_over = true;
                self.spawn_queue.clear();
                self.wave_in_progress = false;
                tracing::info!(wave = self.wave, "game over");
                out_events.push(Event::GameOver { wave: self.wave });
            }
        }
    }

    /// First live critter whose hit box contains `point`, in container order.
    pub(crate) fn critter_at(&self, point: Vec2, half_extent: f32) -> Option<&Critter> {
        self.critters
            .iter()
            .find(|critter| critter.is_live() && critter.contains(point, half_extent))
    }

    pub(crate) fn critter_view(&self) -> CritterView {
        CritterView::from_snapshots(self.critters.iter().map(Critter::snapshot).collect())
    }

    /// Restores starting values and drops every critter.
    pub(crate) fn reset(&mut self) {
        self.wave = 1;
        self.wave_in_progress = false;
        self.game_over = false;
        self.game_complete = false;
        self.currency = self.starting_currency;
        self.life_points = self.starting_life_points;
        self.spawn_queue.clear();
        self.critters.clear();
        self.next_critter_id = 0;
    }
}
