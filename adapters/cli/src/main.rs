#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Waypoint Defence campaign headlessly.

mod args;
mod autopilot;
mod tally;
mod text_backend;

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use waypoint_defence_core::{Command, TowerId};
use waypoint_defence_rendering::{
    Color, FrameControl, Hud, Outcome, PathPresentation, Presentation, RenderingBackend, Scene,
};
use waypoint_defence_world::{self as world, query, Config, GridMap, World};

use args::Cli;
use tally::Tally;
use text_backend::TextBackend;

const PATH_COLOR: Color = Color::from_rgb_u8(150, 120, 80);
const CLEAR_COLOR: Color = Color::from_rgb_u8(40, 70, 40);

/// Entry point for the Waypoint Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let map = GridMap::preset(cli.map.into(), config.tile_length)
        .context("failed to build the preset map")?;
    let autopilot = autopilot::plan(&map, cli.autopilot, cli.seed);
    let mut world = World::new(config, map).context("failed to construct the world")?;
    println!("{}", query::welcome_banner(&world));

    let mut tally = Tally::default();
    let mut events = Vec::new();
    for order in cli.towers.iter().chain(autopilot.iter()) {
        world::apply(
            &mut world,
            Command::PlaceTower {
                kind: order.kind,
                position: order.position,
            },
            &mut events,
        );
    }
    tally.record(&events);
    events.clear();

    let path = PathPresentation::new(
        query::waypoints(&world).to_vec(),
        query::tile_length(&world),
        PATH_COLOR,
    )
    .context("failed to describe the path")?;
    // The oldest tower is inspected in the status lines.
    let selected = query::tower_view(&world).iter().next().map(|tower| tower.id);
    let presentation = Presentation::new(
        "Waypoint Defence",
        CLEAR_COLOR,
        snapshot(&world, path.clone(), selected),
    );

    let backend = TextBackend::new(
        std::io::stdout().lock(),
        Duration::from_millis(cli.tick_ms),
        cli.ticks,
        cli.report_every,
    );
    backend.run(presentation, |dt, scene| {
        if query::can_start_next_wave(&world) {
            world::apply(&mut world, Command::StartNextWave, &mut events);
        }
        world::apply(&mut world, Command::Tick { dt }, &mut events);
        tally.record(&events);
        events.clear();

        *scene = snapshot(&world, path.clone(), selected);
        if query::is_game_over(&world) || query::is_game_complete(&world) {
            FrameControl::Exit
        } else {
            FrameControl::Continue
        }
    })?;

    print_summary(&world, &tally);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    Config::from_toml_str(&contents)
        .with_context(|| format!("invalid config file {}", path.display()))
}

fn snapshot(world: &World, path: PathPresentation, selected: Option<TowerId>) -> Scene {
    let outcome = if query::is_game_over(world) {
        Outcome::Defeat
    } else if query::is_game_complete(world) {
        Outcome::Victory
    } else {
        Outcome::Playing
    };
    let hud = Hud {
        currency: query::currency(world),
        life_points: query::life_points(world),
        wave: query::wave(world),
        wave_in_progress: query::wave_in_progress(world),
        outcome,
    };

    Scene::new(
        path,
        &query::critter_view(world),
        &query::tower_view(world),
        &query::projectiles(world),
        hud,
        selected,
    )
}

fn print_summary(world: &World, tally: &Tally) {
    let verdict = if query::is_game_complete(world) {
        "campaign complete"
    } else if query::is_game_over(world) {
        "game over"
    } else {
        "out of ticks"
    };
    println!(
        "{verdict} after {} ticks: wave {}, {} waves cleared, currency {}, life {}",
        query::tick_index(world),
        query::wave(world),
        tally.waves_cleared,
        query::currency(world),
        query::life_points(world),
    );
    println!(
        "towers bought {}, shots {}, strategy switches {}, refused commands {}",
        tally.towers_bought, tally.shots, tally.strategy_switches, tally.refusals,
    );
    println!(
        "critters spawned {}, killed {} (bounty {}), escaped {}",
        tally.spawned, tally.killed, tally.bounty, tally.escaped,
    );
    for tower in query::tower_view(world).iter() {
        println!(
            "  {} #{} L{} at ({:.0}, {:.0}): range {:.0}, power {:.0}, x{} vs top tier, refund {}",
            tower.kind,
            tower.id.get(),
            tower.level,
            tower.position.x,
            tower.position.y,
            tower.stats.range,
            tower.stats.power,
            tower.special_multiplier,
            tower.refund_value,
        );
    }
}
