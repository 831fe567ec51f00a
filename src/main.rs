mod headless;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use nib8_core::{Config, Interpreter, PixelGrid, UnknownPolicy};

use crate::headless::{parse_key, LogBeeper, ScriptedKeypad};

#[derive(Parser, Debug)]
#[command(name = "nib8")]
#[command(about = "Headless runner for 8-bit fantasy console programs", long_about = None)]
struct Args {
    /// Program image to load
    rom: PathBuf,

    /// JSON file with interpreter settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of instructions to execute
    #[arg(long, default_value_t = 10_000)]
    cycles: u64,

    /// Instructions per second
    #[arg(long)]
    clock_speed: Option<u32>,

    /// Run as fast as possible
    #[arg(long)]
    unthrottled: bool,

    /// Seed for the random instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Skip unknown instructions instead of halting
    #[arg(long)]
    skip_unknown: bool,

    /// Keys answered to key waits, in order, before asking on stdin (1-F; 0 reads as no key)
    #[arg(long, value_delimiter = ',', value_parser = parse_key)]
    keys: Vec<u8>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(clock_speed) = args.clock_speed {
        config.max_clock_speed = clock_speed;
    }
    if args.unthrottled {
        config.throttle = false;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.skip_unknown {
        config.on_unknown = UnknownPolicy::Skip;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;
    log::debug!("{config:?}");

    let mut interpreter = Interpreter::new(
        config,
        PixelGrid::default(),
        ScriptedKeypad::new(args.keys.iter().copied()),
        LogBeeper::default(),
    )
    .context("setting up the machine")?;

    interpreter
        .load_file(&args.rom)
        .with_context(|| format!("loading {}", args.rom.display()))?;

    let result = interpreter.run(Some(args.cycles));

    print!("{}", interpreter.framebuffer);

    let cycles = result.with_context(|| {
        format!(
            "execution stopped at {:#05x}",
            interpreter.machine.program_counter
        )
    })?;
    log::info!("executed {cycles} instructions");
    Ok(())
}
