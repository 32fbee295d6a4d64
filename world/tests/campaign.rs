use std::time::Duration;

use waypoint_defence_core::{Command, CritterKind, Event, TowerKind, Vec2, WaveStartError};
use waypoint_defence_world::{self as world, query, Config, GridMap, TileCoord, World};

const FRAME: Duration = Duration::from_millis(50);

fn straight_map(length: u32) -> GridMap {
    let path = (0..length).map(|column| TileCoord::new(column, 1)).collect();
    GridMap::new(length.max(2), 3, 64.0, path).expect("straight path is valid")
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn run_frames(world: &mut World, frames: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..frames {
        world::apply(world, Command::Tick { dt: FRAME }, &mut events);
    }
    events
}

fn count(events: &[Event], predicate: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

/// Ten basic towers flanking the first five path tiles.
fn fortify(world: &mut World) {
    for column in 0..5 {
        for row in [0, 2] {
            let position = Vec2::new(column as f32 * 64.0 + 10.0, row as f32 * 64.0 + 10.0);
            let events = run(
                world,
                Command::PlaceTower {
                    kind: TowerKind::Basic,
                    position,
                },
            );
            assert!(
                matches!(events.last(), Some(Event::TowerPlaced { .. })),
                "placement at {position:?} failed: {events:?}"
            );
        }
    }
}

#[test]
fn clearing_first_wave_advances_to_second() {
    let mut world = World::new(Config::default(), straight_map(30)).expect("world builds");
    fortify(&mut world);
    assert_eq!(query::currency(&world), 0);

    let started = run(&mut world, Command::StartNextWave);
    assert!(started.contains(&Event::WaveStarted { wave: 1, queued: 10 }));

    let mut first_spawn = run_frames(&mut world, 20);
    assert_eq!(count(&first_spawn, |event| matches!(event, Event::CritterSpawned { .. })), 1);
    let view = query::critter_view(&world);
    let critter = view.iter().next().expect("first critter spawned");
    assert_eq!(critter.kind, CritterKind::Basic);
    assert_eq!(critter.speed, 105.0);
    assert_eq!(critter.health, 110.0);

    first_spawn.extend(run_frames(&mut world, 1_200));
    let events = first_spawn;

    assert_eq!(count(&events, |event| matches!(event, Event::CritterSpawned { .. })), 10);
    assert_eq!(count(&events, |event| matches!(event, Event::CritterKilled { .. })), 10);
    assert_eq!(count(&events, |event| matches!(event, Event::CritterEscaped { .. })), 0);
    assert!(events.contains(&Event::WaveCompleted { wave: 1 }));
    assert_eq!(query::wave(&world), 2);
    assert!(!query::wave_in_progress(&world));
    assert!(query::can_start_next_wave(&world));
    assert_eq!(query::currency(&world), 60);
    assert_eq!(query::life_points(&world), 10);
}

#[test]
fn escape_on_last_life_ends_the_game_and_stops_spawning() {
    let config = Config {
        starting_life_points: 1,
        ..Config::default()
    };
    let mut world = World::new(config, straight_map(2)).expect("world builds");
    let _ = run(&mut world, Command::StartNextWave);

    let events = run_frames(&mut world, 200);

    assert_eq!(count(&events, |event| matches!(event, Event::CritterSpawned { .. })), 1);
    assert_eq!(count(&events, |event| matches!(event, Event::GameOver { .. })), 1);
    assert!(query::is_game_over(&world));
    assert_eq!(query::life_points(&world), 0);
    assert_eq!(query::queued_critters(&world), 0);
    assert!(!query::wave_in_progress(&world));
    assert_eq!(query::currency(&world), 990);

    let refused = run(&mut world, Command::StartNextWave);
    assert_eq!(
        refused,
        vec![Event::WaveStartRejected {
            reason: WaveStartError::GameOver
        }]
    );
}

#[test]
fn escape_penalties_may_push_currency_negative() {
    let config = Config {
        starting_currency: 5,
        ..Config::default()
    };
    let mut world = World::new(config, straight_map(2)).expect("world builds");
    let _ = run(&mut world, Command::StartNextWave);

    let events = run_frames(&mut world, 40);

    assert!(events.iter().any(|event| matches!(
        event,
        Event::CritterEscaped {
            kind: CritterKind::Basic,
            life_points: 9,
            ..
        }
    )));
    assert_eq!(query::currency(&world), -5);
    assert!(!query::is_game_over(&world));
}

#[test]
fn starting_twice_is_refused_while_wave_runs() {
    let mut world = World::new(Config::default(), straight_map(10)).expect("world builds");
    let _ = run(&mut world, Command::StartNextWave);

    let refused = run(&mut world, Command::StartNextWave);

    assert_eq!(
        refused,
        vec![Event::WaveStartRejected {
            reason: WaveStartError::WaveInProgress
        }]
    );
    assert_eq!(query::queued_critters(&world), 10);
}

#[test]
fn clearing_the_final_wave_completes_the_campaign() {
    let config = Config {
        final_wave: 1,
        ..Config::default()
    };
    let mut world = World::new(config, straight_map(30)).expect("world builds");
    fortify(&mut world);
    let _ = run(&mut world, Command::StartNextWave);

    let events = run_frames(&mut world, 1_220);

    assert_eq!(count(&events, |event| *event == Event::CampaignComplete), 1);
    assert!(query::is_game_complete(&world));
    assert_eq!(query::wave(&world), 1);
    assert_eq!(
        run(&mut world, Command::StartNextWave),
        vec![Event::WaveStartRejected {
            reason: WaveStartError::CampaignComplete
        }]
    );
}

#[test]
fn reset_restores_a_fresh_campaign() {
    let config = Config {
        starting_life_points: 1,
        ..Config::default()
    };
    let mut world = World::new(config, straight_map(2)).expect("world builds");
    let _ = run(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Area,
            position: Vec2::new(10.0, 10.0),
        },
    );
    let _ = run(&mut world, Command::StartNextWave);
    let _ = run_frames(&mut world, 200);
    assert!(query::is_game_over(&world));

    let events = run(&mut world, Command::Reset);

    assert_eq!(events, vec![Event::GameReset]);
    assert!(!query::is_game_over(&world));
    assert_eq!(query::wave(&world), 1);
    assert_eq!(query::life_points(&world), 1);
    assert_eq!(query::currency(&world), 1_000);
    assert!(query::tower_view(&world).is_empty());
    assert!(query::critter_view(&world).is_empty());
    assert!(query::projectiles(&world).is_empty());
    assert!(query::can_start_next_wave(&world));
}

#[test]
fn critters_can_be_picked_by_their_hit_box() {
    let mut world = World::new(Config::default(), straight_map(10)).expect("world builds");
    let _ = run(&mut world, Command::StartNextWave);
    let _ = run_frames(&mut world, 20);

    let spawn = query::waypoints(&world)[0];
    let picked = query::critter_at(&world, spawn + Vec2::new(15.0, -15.0));
    assert!(picked.is_some());
    assert_eq!(picked.map(|critter| critter.reward), Some(6));
    assert!(query::critter_at(&world, spawn + Vec2::new(17.0, 0.0)).is_none());
}
