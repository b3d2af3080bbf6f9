use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strikewing_common::FlightMode;
use strikewing_content::{Catalog, Garage};
use strikewing_input::{InputSample, StickState};
use strikewing_kernel::{World, WorldEvent};
use strikewing_render::{DisplaySize, RecordingBackend, Renderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strikewing-cli", about = "Headless tools for the drone combat simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory with drones.json / maps.json / economy.json overrides
    #[arg(long, global = true)]
    content_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Session setup shared by the simulation commands.
#[derive(Args, Clone)]
struct SessionArgs {
    #[arg(long, default_value = "armed_1")]
    drone: String,
    #[arg(long, default_value = "map1")]
    map: String,
    /// acro or angle
    #[arg(long, default_value = "acro")]
    mode: FlightMode,
    /// Starting coin balance (drives wave tier)
    #[arg(long, default_value = "0")]
    coins: u64,
    /// Number of steps to simulate
    #[arg(short, long, default_value = "600")]
    ticks: u64,
    /// Step size in seconds (clamped to 0.033)
    #[arg(long, default_value = "0.016666667")]
    dt: f64,
    /// Hold fire every N-th tick; 0 never fires
    #[arg(long, default_value = "2")]
    fire_every: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the content catalog
    Info,
    /// Run a scripted flight and print a summary
    Simulate(SessionArgs),
    /// Run the same scripted flight twice and compare state hashes every tick
    Verify(SessionArgs),
    /// Simulate, then dump the renderer's draw list for the final frame
    Frame {
        #[command(flatten)]
        session: SessionArgs,
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
        #[arg(long, default_value = "1.0")]
        scale_factor: f64,
    },
}

fn load_catalog(dir: Option<&PathBuf>) -> anyhow::Result<Catalog> {
    let catalog = match dir {
        Some(dir) => Catalog::load(dir)
            .with_context(|| format!("loading content from {}", dir.display()))?,
        None => Catalog::bundled()?,
    };
    Ok(catalog)
}

/// Headless sessions own everything in the catalog.
fn start(catalog: &Catalog, args: &SessionArgs) -> anyhow::Result<World> {
    let mut garage = Garage {
        coins: args.coins,
        mode: args.mode,
        ..Garage::default()
    };
    garage.unlock_all(catalog);
    garage.select_drone(catalog, &args.drone)?;
    garage.select_map(catalog, &args.map)?;
    Ok(garage.start_session(catalog)?)
}

/// Deterministic pilot: hover throttle, slow yaw sweep, periodic fire.
fn scripted_input(tick: u64, fire_every: u64) -> InputSample {
    InputSample {
        left: StickState {
            x: 0.25,
            y: 0.96,
            active: true,
        },
        right: StickState::CENTERED,
        fire: fire_every > 0 && tick % fire_every == 0,
        pause: false,
    }
}

#[derive(Default)]
struct Tally {
    shots: u64,
    hits: u64,
    kills: u64,
    waves: u64,
    explosions: u64,
}

impl Tally {
    fn record(&mut self, events: &[WorldEvent]) {
        for e in events {
            match e {
                WorldEvent::ShotFired { hit } => {
                    self.shots += 1;
                    self.hits += u64::from(hit.is_some());
                }
                WorldEvent::EnemyKilled { .. } => self.kills += 1,
                WorldEvent::WaveSpawned { .. } => self.waves += 1,
                WorldEvent::Exploded { .. } => self.explosions += 1,
            }
        }
    }
}

fn run(world: &mut World, args: &SessionArgs, mut on_tick: impl FnMut(&mut World)) {
    let dt = args.dt.clamp(0.0, 0.033);
    tracing::debug!(ticks = args.ticks, dt, fire_every = args.fire_every, "scripted flight");
    for tick in 0..args.ticks {
        world.step(dt, &scripted_input(tick, args.fire_every));
        on_tick(world);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let catalog = load_catalog(cli.content_dir.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("strikewing-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("Drones:");
            for d in &catalog.drones {
                println!(
                    "  {:<12} {:<14} {:<9} weapon={:<13} thrust={:<5} cost={}",
                    d.id,
                    d.name,
                    format!("{:?}", d.kind).to_lowercase(),
                    d.weapon,
                    d.thrust,
                    d.cost
                );
            }
            println!("Maps:");
            for m in &catalog.maps {
                println!(
                    "  {:<12} {:<16} seed={:<6} theme={:<11} cost={}",
                    m.id, m.name, m.seed, m.theme, m.cost
                );
            }
            let spawn = &catalog.economy.spawn;
            println!(
                "Waves every {:.1}-{:.1}s; rewards {:?}",
                spawn.interval_min, spawn.interval_max, catalog.economy.rewards
            );
        }
        Commands::Simulate(args) => {
            let mut world = start(&catalog, &args)?;
            let mut tally = Tally::default();
            run(&mut world, &args, |w| tally.record(&w.drain_events()));

            println!(
                "Simulated {} ticks: drone={} map={} mode={}",
                world.tick(),
                world.drone.id,
                world.map.id,
                world.mode
            );
            println!(
                "Drone: pos=({:.2}, {:.2}, {:.2}) speed={:.2}",
                world.pos.x,
                world.pos.y,
                world.pos.z,
                world.vel.length()
            );
            println!(
                "Combat: shots={} hits={} kills={} explosions={} waves={}",
                tally.shots, tally.hits, tally.kills, tally.explosions, tally.waves
            );
            println!(
                "Coins: {} (tier {}), enemies alive: {}",
                world.coins,
                world.tier(),
                world.enemies.len()
            );
            println!("State hash: {:#018x}", world.state_hash());
        }
        Commands::Verify(args) => {
            let mut a = start(&catalog, &args)?;
            let mut hashes = Vec::with_capacity(args.ticks as usize);
            run(&mut a, &args, |w| hashes.push(w.state_hash()));

            let mut b = start(&catalog, &args)?;
            let mut mismatch = None;
            let mut i = 0usize;
            run(&mut b, &args, |w| {
                if mismatch.is_none() && hashes[i] != w.state_hash() {
                    mismatch = Some(i as u64 + 1);
                }
                i += 1;
            });

            if let Some(tick) = mismatch {
                bail!("runs diverged at tick {tick}");
            }
            println!(
                "Deterministic over {} ticks: {:#018x}",
                args.ticks,
                b.state_hash()
            );
        }
        Commands::Frame {
            session,
            width,
            height,
            scale_factor,
        } => {
            let mut world = start(&catalog, &session)?;
            run(&mut world, &session, |w| {
                w.drain_events();
            });
            let mut renderer = Renderer::new(RecordingBackend::new())?;
            renderer.frame(&world, DisplaySize::new(width, height, scale_factor))?;
            print!("{}", renderer.backend().to_text());
        }
    }

    Ok(())
}
