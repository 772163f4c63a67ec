//! Ship Sandbox
//!
//! Run with: `cargo run --bin ship_sandbox -- --preset wide`
//!
//! Headless demo: spawns a hull, flies it forward with its guns firing,
//! and shoots blocks out of it one at a time until nothing is left,
//! logging every split.
//!
//! Options:
//! - `--preset <name>`: stock hull to spawn (default `small`)
//! - `--load <file>`: spawn a saved ship (`.json` or `.yaml`) instead
//! - `--save <file>`: write the intact hull before the barrage starts
//! - `--config <file>`: TOML tuning overrides
//! - `--hp <n>`: block hit points for presets (default 1)
//!
//! Set `RUST_LOG=debug` for attachment and power detail.

use std::path::PathBuf;
use std::process::ExitCode;

use glam::DVec2;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use hullsmith_engine::game::{GameConfig, ShipControls, ShipData, ShipId, ShipPreset, ShipWorld};
use hullsmith_engine::physics::{BodyState, CollisionReport, SimplePhysics};

const FRAME_TIME: f64 = 1.0 / 60.0;
const FRAMES_BETWEEN_HITS: usize = 30;
const MAX_FRAMES: usize = 60 * 120;

#[derive(Debug, Default)]
struct Args {
    preset: Option<String>,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
    config: Option<PathBuf>,
    hp: Option<i32>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--preset" => args.preset = Some(value()?),
            "--load" => args.load = Some(PathBuf::from(value()?)),
            "--save" => args.save = Some(PathBuf::from(value()?)),
            "--config" => args.config = Some(PathBuf::from(value()?)),
            "--hp" => {
                let raw = value()?;
                args.hp = Some(raw.parse().map_err(|_| format!("invalid hp: {raw}"))?);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn init_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn spawn_player(
    world: &mut ShipWorld<SimplePhysics>,
    args: &Args,
) -> Result<ShipId, Box<dyn std::error::Error>> {
    let state = BodyState::default();
    if let Some(path) = &args.load {
        let data = ShipData::load_file(path)?;
        info!("Loading ship from {}", path.display());
        return Ok(world.load_ship(&data, state)?);
    }
    let preset: ShipPreset = args.preset.as_deref().unwrap_or("small").parse()?;
    info!("Spawning preset {}", preset);
    Ok(world.spawn_preset(preset, state, args.hp.unwrap_or(1))?)
}

/// Picks the block furthest from the hull centre so the hull is chipped
/// away from the outside in.
fn pick_target(world: &ShipWorld<SimplePhysics>, ship: ShipId) -> Option<u64> {
    let ship = world.ship(ship)?;
    ship.structure()
        .blocks()
        .max_by(|(_, a), (_, b)| {
            a.centroid()
                .length_squared()
                .total_cmp(&b.centroid().length_squared())
        })
        .map(|(id, _)| id.0)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => GameConfig::load_or_default(path),
        None => GameConfig::default(),
    };
    let mut world = ShipWorld::new(SimplePhysics::new(), config);
    let player = spawn_player(&mut world, &args)?;

    if let Some(path) = &args.save {
        if let Some(ship) = world.ship(player) {
            ship.dump_file(path)?;
            info!("Saved hull to {}", path.display());
        }
    }

    world.set_controls(
        player,
        ShipControls {
            thrust: true,
            fire: true,
            ..ShipControls::idle()
        },
    );

    let mut shots_fired = 0;
    for frame in 1..=MAX_FRAMES {
        world.tick(FRAME_TIME);
        shots_fired += world.drain_shots().len();

        if frame % FRAMES_BETWEEN_HITS != 0 {
            continue;
        }
        let Some(ship) = world.ship(player) else {
            info!("Player hull destroyed after {:.2}s", world.time());
            break;
        };
        let body = ship.body();
        match pick_target(&world, player) {
            Some(tag) => world.physics_mut().inject_collision(CollisionReport {
                body,
                tag,
                damage: 1,
            }),
            None => warn!("Player hull has no blocks left to hit"),
        }

        for (id, ship) in world.ships() {
            let position = world
                .body_state(id)
                .map(|state| state.position)
                .unwrap_or(DVec2::ZERO);
            info!(
                "{} at ({:.1}, {:.1}): {}",
                id,
                position.x,
                position.y,
                ship.summarize()
            );
        }
    }

    info!(
        "Finished at {:.2}s with {} ships, {} shots fired",
        world.time(),
        world.ship_count(),
        shots_fired
    );
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
