//! Command-line arguments of the headless campaign runner.

use std::{path::PathBuf, str::FromStr};

use clap::{Parser, ValueEnum};
use waypoint_defence_core::{TowerKind, Vec2};
use waypoint_defence_world::Preset;

/// Plays a Waypoint Defence campaign headlessly and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "waypoint-defence", author, version)]
pub(crate) struct Cli {
    /// Maximum number of simulation ticks to run.
    #[arg(long, default_value_t = 20_000)]
    pub(crate) ticks: u64,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) tick_ms: u64,

    /// TOML file overriding the default simulation parameters.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Bundled map to play on.
    #[arg(long, value_enum, default_value = "normal")]
    pub(crate) map: MapChoice,

    /// Tower to buy before the first wave, as `kind@x,y` in world units.
    #[arg(long = "tower", value_name = "KIND@X,Y")]
    pub(crate) towers: Vec<TowerOrder>,

    /// Number of extra towers bought on random free tiles.
    #[arg(long, default_value_t = 0)]
    pub(crate) autopilot: usize,

    /// Seed for the autopilot's tile and kind choices.
    #[arg(long, default_value_t = 0)]
    pub(crate) seed: u64,

    /// Print a status line every N ticks; 0 disables periodic reports.
    #[arg(long, default_value_t = 200)]
    pub(crate) report_every: u64,
}

/// Bundled map layouts selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum MapChoice {
    /// 18 by 18 tiles.
    Easy,
    /// 12 by 12 tiles.
    Normal,
    /// 8 by 8 tiles.
    Hard,
}

impl From<MapChoice> for Preset {
    fn from(choice: MapChoice) -> Self {
        match choice {
            MapChoice::Easy => Self::Easy,
            MapChoice::Normal => Self::Normal,
            MapChoice::Hard => Self::Hard,
        }
    }
}

/// Tower purchase requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TowerOrder {
    pub(crate) kind: TowerKind,
    pub(crate) position: Vec2,
}

impl FromStr for TowerOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, position) = value
            .split_once('@')
            .ok_or_else(|| format!("expected KIND@X,Y, received `{value}`"))?;
        let kind = TowerKind::from_str(kind).map_err(|error| error.to_string())?;
        let (x, y) = position
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y after `@`, received `{position}`"))?;
        let x: f32 = x
            .trim()
            .parse()
            .map_err(|_| format!("invalid x coordinate `{x}`"))?;
        let y: f32 = y
            .trim()
            .parse()
            .map_err(|_| format!("invalid y coordinate `{y}`"))?;

        Ok(Self {
            kind,
            position: Vec2::new(x, y),
        })
    }
}
