use std::path::PathBuf;

use clap::Parser;
use tccalc_core::{evaluate, ConfigManager, FrameRate};

mod shell;

/// Timecode calculator for editors and post-production crews.
#[derive(Parser, Debug)]
#[command(name = "tccalc")]
#[command(about = "Add and subtract HH:MM:SS:FF timecodes")]
struct Args {
    /// Frame rate: 23.976, 24, 25, 29.97, 30, 59.94 or 60 (overrides the config file)
    #[arg(long, value_parser = parse_frame_rate)]
    fps: Option<FrameRate>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluate an expression such as "01:00:00:00 + 00:00:10:00" and exit
    #[arg(short, long)]
    eval: Option<String>,

    /// Also print the total frame count
    #[arg(long, default_value = "false")]
    frames: bool,
}

fn parse_frame_rate(s: &str) -> Result<FrameRate, String> {
    FrameRate::parse(s).map_err(|e| e.to_string())
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = ConfigManager::new(args.config);
    if let Err(e) = config.load() {
        log::warn!("{}; using default settings", e);
    }
    let settings = config.settings().clone();

    let frame_rate = match args.fps {
        Some(rate) => rate,
        None => config.frame_rate()?,
    };

    if let Some(expression) = args.eval {
        let result = evaluate(frame_rate, &expression)?;
        if args.frames || settings.show_frame_count {
            println!("{} ({} frames)", result, result.total_frames());
        } else {
            println!("{}", result);
        }
        return Ok(());
    }

    let mut shell = shell::Shell::new(
        frame_rate,
        args.frames || settings.show_frame_count,
        settings.show_wall_clock,
    );
    shell.run()?;

    Ok(())
}
