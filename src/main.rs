//! Pea Shooter headless entry point
//!
//! Runs one seeded session with the autoplay aimer and prints every game
//! event as a JSON line. Rendering and audio hosts drive the same `tick`.
//!
//! Example:
//!   cargo run --release -- --variant circles --seed 2024 --max-secs 90

use std::path::PathBuf;

use clap::Parser;
use pea_shooter::consts::*;
use pea_shooter::sim::{GameState, Outcome, PresentationHandoff, TickInput, tick};
use pea_shooter::{Settings, Variant};

/// Logs the outcome where a scene transition would go
struct LogPresenter {
    outcome: Option<Outcome>,
}

impl PresentationHandoff for LogPresenter {
    fn present_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won => log::info!("You Won!"),
            Outcome::Lost => log::info!("You Lose :["),
        }
        self.outcome = Some(outcome);
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Run one seeded pea-shooter session headless", long_about = None)]
struct Args {
    /// JSON settings file; missing or invalid files fall back to defaults
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Game variant preset applied over the settings
    #[arg(long, value_parser = parse_variant)]
    variant: Option<Variant>,
    /// RNG seed override
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many simulated seconds
    #[arg(long, default_value_t = 120.0)]
    max_secs: f32,
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    Variant::parse(s).ok_or_else(|| format!("unknown variant {s} (classic, circles, final)"))
}

fn main() {
    env_logger::init();
    log::info!("Pea Shooter (headless) starting...");

    let args = Args::parse();

    let mut settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    if let Some(variant) = args.variant {
        settings.apply_variant(variant);
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    log::info!(
        "Seed {}, {:?} monsters, loss {}",
        settings.seed,
        settings.monster_shape,
        if settings.loss_enabled { "on" } else { "off" }
    );

    let max_ticks = (args.max_secs / SIM_DT) as u64;
    let mut state = GameState::new(settings);
    let mut presenter = LogPresenter { outcome: None };
    let input = TickInput {
        autoplay: true,
        ..Default::default()
    };

    while state.time_ticks < max_ticks && presenter.outcome.is_none() {
        tick(&mut state, &input, SIM_DT, &mut presenter);
        for event in state.drain_events() {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => log::warn!("Failed to encode event: {e}"),
            }
        }
    }

    log::info!(
        "Finished after {:.1}s: {} monsters destroyed, outcome {:?}",
        state.elapsed,
        state.session.monsters_destroyed,
        state.outcome()
    );
}
