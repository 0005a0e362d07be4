use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use nu_ansi_term::Color;

use microexp::catalog::catalog;
use microexp::{
    CounterEvent, CounterSnapshot, Direction, Dispatcher, MicroExpConfig, ParticleTimeline,
    ResultExt, TracingHaptics,
};

#[derive(Parser)]
#[command(name = "microexp")]
#[command(about = "Micro-interaction components driven from the terminal", long_about = None)]
struct Cli {
    /// JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tap the heart counter and stream what happens
    Tap {
        /// Number of taps
        #[arg(short = 'n', long, default_value_t = 5)]
        times: u32,

        /// Pause between taps
        #[arg(long, default_value_t = 120)]
        interval_ms: u64,

        /// Upper bound for the count
        #[arg(long)]
        max: Option<u64>,

        /// Seed for particle directions
        #[arg(long)]
        seed: Option<u64>,

        /// Disable haptic feedback
        #[arg(long)]
        no_haptics: bool,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Sample a flying heart's pose over its lifetime
    Pose {
        #[arg(long, value_enum, default_value_t = DirectionArg::Left)]
        direction: DirectionArg,

        #[arg(long, default_value_t = 80)]
        step_ms: u64,

        #[arg(long)]
        json: bool,
    },
    /// List the available components, newest first
    Catalog {
        /// Print entries as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Print the effective settings, optionally writing them to a file
    Config {
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Left,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Left => Direction::Left,
            DirectionArg::Right => Direction::Right,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    microexp::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => MicroExpConfig::load_from_file(path).with_file_context(&path.display().to_string())?,
        None => MicroExpConfig::default(),
    };
    tracing::debug!(?config, "settings loaded");

    match cli.command {
        Command::Tap {
            times,
            interval_ms,
            max,
            seed,
            no_haptics,
            json,
        } => {
            let mut config = config;
            if max.is_some() {
                config.counter.max_count = max;
            }
            if no_haptics {
                config.counter.use_haptics = false;
            }
            run_taps(config, times, Duration::from_millis(interval_ms), seed, json).await
        }
        Command::Pose {
            direction,
            step_ms,
            json,
        } => print_poses(&config.timeline, direction.into(), step_ms.max(1), json),
        Command::Catalog { json } => {
            for entry in catalog() {
                if json {
                    println!("{}", serde_json::to_string(&entry)?);
                    continue;
                }
                println!(
                    "{} {}  {}",
                    Color::White.bold().paint(format!("{:<16}", entry.name)),
                    Color::DarkGray.paint(entry.added_label()),
                    entry.symbol
                );
            }
            Ok(())
        }
        Command::Config { write } => {
            if let Some(path) = write {
                config
                    .save_to_file(&path)
                    .with_file_context(&path.display().to_string())?;
                println!("Saved settings to {}", path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            Ok(())
        }
    }
}

async fn run_taps(
    config: MicroExpConfig,
    times: u32,
    interval: Duration,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut dispatcher = Dispatcher::new(&config).context("Failed to start the heart counter")?;
    if let Some(seed) = seed {
        dispatcher = dispatcher.with_direction_source(fastrand::Rng::with_seed(seed));
    }
    if config.counter.use_haptics {
        dispatcher = dispatcher.with_haptics(TracingHaptics);
    }

    let accent = config.counter.accent_color;
    let mut events = Box::pin(dispatcher.event_stream());
    let printer = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            if json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::warn!(error = %e, "failed to encode event"),
                }
            } else {
                println!("{}", describe(&event, Color::Rgb(accent.r, accent.g, accent.b)));
            }
        }
    });

    for _ in 0..times {
        dispatcher.tap();
        dispatcher.run_for(interval).await;
    }
    dispatcher.settle().await;

    let snapshot = dispatcher.snapshot();
    dispatcher.teardown();
    printer.await.context("Event printer stopped unexpectedly")?;

    if !json {
        print_summary(&snapshot);
    }
    Ok(())
}

fn describe(event: &CounterEvent, accent: Color) -> String {
    match event {
        CounterEvent::CountChanged { count } => format!("{} {}", accent.bold().paint("count"), count),
        CounterEvent::BoundReached { count } => {
            format!("{} {} (at bound)", Color::Yellow.paint("bound"), count)
        }
        CounterEvent::PressedChanged { pressed } => {
            format!("{} {}", Color::DarkGray.paint("press"), if *pressed { "down" } else { "up" })
        }
        CounterEvent::ParticleSpawned { id, direction } => {
            format!("{} {} drifting {}", accent.paint("heart"), id, direction)
        }
        CounterEvent::ParticleCompleted { id } => format!("{} {} gone", Color::DarkGray.paint("heart"), id),
        CounterEvent::TornDown => Color::DarkGray.paint("torn down").to_string(),
    }
}

fn print_summary(snapshot: &CounterSnapshot) {
    let bound = snapshot
        .max_count
        .map_or_else(|| "unbounded".to_string(), |max| format!("max {}", max));
    println!(
        "{} {} ({}), {} hearts in flight",
        Color::Green.bold().paint("final count"),
        snapshot.display_text,
        bound,
        snapshot.particles.len()
    );
}

fn print_poses(timeline: &ParticleTimeline, direction: Direction, step_ms: u64, json: bool) -> Result<()> {
    let lifetime = timeline.lifetime().as_millis() as u64;
    if !json {
        println!(
            "{:>6} {:>10} {:>7} {:>7} {:>5} {:>5} {:>6} {:>5} {:>6}",
            "ms", "phase", "x", "y", "scale", "alpha", "rot", "wings", "flap"
        );
    }
    for elapsed_ms in (0..=lifetime).step_by(step_ms as usize) {
        let elapsed = Duration::from_millis(elapsed_ms);
        let phase = timeline.phase(elapsed);
        let pose = timeline.pose(direction, elapsed);
        if json {
            let line = serde_json::json!({ "elapsed_ms": elapsed_ms, "phase": phase, "pose": pose });
            println!("{}", line);
        } else {
            println!(
                "{:>6} {:>10} {:>7.2} {:>7.2} {:>5.2} {:>5.2} {:>6.1} {:>5.2} {:>6.2}",
                elapsed_ms,
                format!("{:?}", phase),
                pose.offset_x,
                pose.offset_y,
                pose.scale,
                pose.opacity,
                pose.rotation_deg,
                pose.wing_opacity,
                pose.wing_flap
            );
        }
    }
    Ok(())
}
