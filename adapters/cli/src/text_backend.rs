//! Rendering backend that prints periodic status lines instead of drawing.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result as AnyResult};
use waypoint_defence_rendering::{FrameControl, Outcome, Presentation, RenderingBackend, Scene};

/// Headless backend driving a fixed number of frames of constant length.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    frame: Duration,
    max_frames: u64,
    report_every: u64,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(out: W, frame: Duration, max_frames: u64, report_every: u64) -> Self {
        Self {
            out,
            frame,
            max_frames,
            report_every,
        }
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) -> FrameControl,
    {
        let mut scene = presentation.scene;
        writeln!(self.out, "== {} ==", presentation.window_title)
            .context("failed to write report header")?;

        for frame in 1..=self.max_frames {
            let control = update_scene(self.frame, &mut scene);
            let due = self.report_every > 0 && frame % self.report_every == 0;
            if due || control == FrameControl::Exit {
                writeln!(self.out, "{}", status_line(frame, &scene))
                    .context("failed to write status line")?;
            }
            if control == FrameControl::Exit {
                break;
            }
        }

        self.out.flush().context("failed to flush report")
    }
}

fn status_line(frame: u64, scene: &Scene) -> String {
    let hud = scene.hud;
    let phase = match (hud.outcome, hud.wave_in_progress) {
        (Outcome::Defeat, _) => "defeat",
        (Outcome::Victory, _) => "victory",
        (Outcome::Playing, true) => "running",
        (Outcome::Playing, false) => "waiting",
    };
    let mut line = format!(
        "tick {frame:>6} | wave {} ({phase}) | currency {:>6} | life {:>2} | critters {:>2} | towers {:>2} | projectiles {:>3}",
        hud.wave,
        hud.currency,
        hud.life_points,
        scene.critters.len(),
        scene.towers.len(),
        scene.projectiles.len(),
    );
    if let Some(tower) = scene.selected_tower() {
        line.push_str(&format!(
            " | tower {} L{} {}",
            tower.id.get(),
            tower.level,
            tower.strategy.label()
        ));
    }
    line
}
