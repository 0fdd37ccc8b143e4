//! Sky Raider entry point
//!
//! Headless demo: loads settings, lets the autopilot fly for a fixed number
//! of frames at 60 Hz and logs how the runs went.
//!
//! Usage: `sky-raider [settings.json] [frames]`

use std::path::PathBuf;

use anyhow::Context;

use sky_raider::audio::AudioManager;
use sky_raider::sim::{Autopilot, GamePhase};
use sky_raider::snapshot::LastFrame;
use sky_raider::ui::Hud;
use sky_raider::{Game, JsonFileStore, Settings};

const DEFAULT_FRAMES: u64 = 60 * 60;
const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sky-raider.json"));
    let frames = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("frame count `{raw}` is not a number"))?,
        None => DEFAULT_FRAMES,
    };

    let settings = Settings::load_from(&settings_path);
    let store = JsonFileStore::new(settings.high_score_path.clone());
    let mut game: Game<Hud> = Game::new(&settings, Box::new(store), Hud::default(), AudioManager::default());
    let mut renderer = LastFrame::default();
    let pilot = Autopilot;

    game.start();
    let mut runs = 1u32;
    for frame in 0..frames {
        if game.phase() == GamePhase::GameOver {
            log::info!("Run {} over: {}", runs, game.ui().status_line());
            runs += 1;
            game.restart();
        }
        let input = pilot.input_for(game.state());
        game.frame(frame as f64 * FRAME_MS, &input, &mut renderer);
    }

    log::info!(
        "{} frames, {} run(s), last frame had {} entities",
        renderer.frames_rendered,
        runs,
        renderer.frame.entity_count()
    );
    println!("{}", game.ui().status_line());
    Ok(())
}
