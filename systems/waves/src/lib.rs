#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave content and the timed spawn queue that releases it.

use std::{collections::VecDeque, time::Duration};

use waypoint_defence_core::{CritterKind, CritterSpec};

/// Number of basic critters released in an easy wave.
pub const EASY_WAVE_SIZE: usize = 10;

/// Number of interleaved pairs released in a mixed wave.
pub const MIXED_WAVE_PAIRS: usize = 5;

/// Number of interleaved pairs released in a hard wave.
pub const HARD_WAVE_PAIRS: usize = 15;

/// Builds the spawn queue for the provided one-based wave number.
///
/// The table is total: wave 0 is treated like wave 1 and every wave from 3
/// upwards uses the hard mix with stats scaled by `wave - 2`.
#[must_use]
pub fn wave_content(wave: u32) -> VecDeque<CritterSpec> {
    match wave {
        0 | 1 => easy_wave(wave.max(1)),
        2 => mixed_wave(wave),
        _ => hard_wave(wave),
    }
}

fn easy_wave(wave: u32) -> VecDeque<CritterSpec> {
    let w = wave as f32;
    let basic = CritterSpec::new(CritterKind::Basic, 100.0 + w * 5.0, 100.0 + w * 10.0, 5 + wave);
    std::iter::repeat(basic).take(EASY_WAVE_SIZE).collect()
}

fn mixed_wave(wave: u32) -> VecDeque<CritterSpec> {
    let w = wave as f32;
    let basic = CritterSpec::new(CritterKind::Basic, 100.0 + w * 5.0, 120.0 + w * 15.0, 7 + wave);
    let medium = CritterSpec::new(
        CritterKind::Medium,
        100.0 + w * 2.0,
        200.0 + w * 25.0,
        10 + wave * 2,
    );
    interleave(basic, medium, MIXED_WAVE_PAIRS)
}

fn hard_wave(wave: u32) -> VecDeque<CritterSpec> {
    let offset = wave - 2;
    let a = offset as f32;
    let medium = CritterSpec::new(
        CritterKind::Medium,
        100.0 + a * 10.0,
        200.0 + a * 50.0,
        10 + offset * 5,
    );
    let strong = CritterSpec::new(
        CritterKind::Strong,
        80.0 + a * 5.0,
        800.0 + a * 200.0,
        50 + offset * 25,
    );
    interleave(medium, strong, HARD_WAVE_PAIRS)
}

fn interleave(first: CritterSpec, second: CritterSpec, pairs: usize) -> VecDeque<CritterSpec> {
    let mut queue = VecDeque::with_capacity(pairs * 2);
    for _ in 0..pairs {
        queue.push_back(first);
        queue.push_back(second);
    }
    queue
}

/// Configuration parameters required to construct the spawn queue.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_delay: Duration,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence.
    #[must_use]
    pub const fn new(spawn_delay: Duration) -> Self {
        Self { spawn_delay }
    }
}

/// FIFO of pending critters released one at a time on a fixed delay.
#[derive(Clone, Debug)]
pub struct SpawnQueue {
    spawn_delay: Duration,
    timer: Duration,
    pending: VecDeque<CritterSpec>,
}

impl SpawnQueue {
    /// Creates an empty spawn queue using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_delay: config.spawn_delay,
            timer: Duration::ZERO,
            pending: VecDeque::new(),
        }
    }

    /// Replaces the pending critters with the content of a new wave.
    pub fn load(&mut self, content: VecDeque<CritterSpec>) {
        self.pending = content;
    }

    /// Drops every pending critter and rewinds the timer.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.timer = Duration::ZERO;
    }

    /// Reports whether no critters remain queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of critters still queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Time accumulated towards the next release.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.timer
    }

    /// Accumulates `dt` and releases the front critter once the delay elapsed.
    ///
    /// At most one critter is released per call and the timer restarts from
    /// zero after each release. An empty queue does not accumulate time.
    pub fn advance(&mut self, dt: Duration) -> Option<CritterSpec> {
        if self.pending.is_empty() {
            return None;
        }

        self.timer = self.timer.saturating_add(dt);
        if self.timer < self.spawn_delay {
            return None;
        }

        self.timer = Duration::ZERO;
        self.pending.pop_front()
    }
}
